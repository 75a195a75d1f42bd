use std::fmt::Write;

use crate::index::DisplayNode;

/// Renders a projected tree as an indented outline.
///
/// ```text
/// 20, city=C ...
/// ├── 10, city=A ...
/// └── 30, city=B ...
/// ```
pub fn render_outline(root: &DisplayNode) -> String {
    let mut out = String::new();
    out.push_str(&root.label);
    out.push('\n');
    render_children(&root.children, "", &mut out);
    out
}

fn render_children(children: &[DisplayNode], prefix: &str, out: &mut String) {
    for (idx, child) in children.iter().enumerate() {
        let last = idx + 1 == children.len();
        let (branch, guide) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let _ = writeln!(out, "{prefix}{branch}{}", child.label);
        render_children(&child.children, &format!("{prefix}{guide}"), out);
    }
}
