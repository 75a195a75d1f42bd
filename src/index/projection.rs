use serde::Serialize;

use super::node::{Link, Node};

/// Renderer-agnostic view of one node and its children, left before right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayNode {
    /// The node's ordering key.
    pub key: f64,
    /// `"<key>, <record summary>"`.
    pub label: String,
    /// Present children only.
    pub children: Vec<DisplayNode>,
}

pub(crate) fn project(link: &Link) -> Option<DisplayNode> {
    link.as_deref().map(project_node)
}

fn project_node(node: &Node) -> DisplayNode {
    let children = [&node.left, &node.right]
        .into_iter()
        .filter_map(project)
        .collect();
    DisplayNode {
        key: node.key,
        label: format!("{}, {}", node.key, node.record),
        children,
    }
}
