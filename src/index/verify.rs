use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;

use super::node::{Link, Node};
use crate::types::Listing;

const MAX_FINDINGS: usize = 32;

/// Kind of structural problem found by [`ListingTree::verify`](super::ListingTree::verify).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Stored height disagrees with the children's heights.
    Height,
    /// Children heights differ by more than one.
    Balance,
    /// In-order keys decrease.
    Order,
}

/// A single structural problem.
#[derive(Clone, Debug, Serialize)]
pub struct VerifyFinding {
    /// What kind of invariant was broken.
    pub kind: FindingKind,
    /// Key of the node where it was detected.
    pub key: f64,
    /// Human-readable description.
    pub message: String,
}

/// Counters gathered while walking the tree.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VerifyCounts {
    /// Nodes visited.
    pub nodes: u64,
    /// Distinct records referenced by those nodes.
    pub distinct_records: u64,
    /// Height of the root, recomputed from the leaves.
    pub height: u32,
}

/// Outcome of a full structural check.
#[derive(Clone, Debug, Serialize)]
pub struct VerifyReport {
    /// `true` when no finding was recorded.
    pub success: bool,
    /// At most 32 findings, in in-order position.
    pub findings: Vec<VerifyFinding>,
    /// Counters.
    pub counts: VerifyCounts,
}

struct Walker {
    findings: Vec<VerifyFinding>,
    nodes: u64,
    records: HashSet<*const Listing>,
    last_key: Option<f64>,
}

impl Walker {
    fn report(&mut self, kind: FindingKind, key: f64, message: String) {
        if self.findings.len() < MAX_FINDINGS {
            self.findings.push(VerifyFinding { kind, key, message });
        }
    }

    /// Returns the recomputed height of `link`.
    fn walk(&mut self, link: &Link) -> u32 {
        let Some(node) = link.as_deref() else {
            return 0;
        };
        let left = self.walk(&node.left);
        self.visit(node);
        let right = self.walk(&node.right);

        let expected = 1 + left.max(right);
        if node.height != expected {
            self.report(
                FindingKind::Height,
                node.key,
                format!("stored height {} but children imply {expected}", node.height),
            );
        }
        if left.abs_diff(right) > 1 {
            self.report(
                FindingKind::Balance,
                node.key,
                format!("left height {left} and right height {right} differ by more than one"),
            );
        }
        expected
    }

    fn visit(&mut self, node: &Node) {
        self.nodes += 1;
        self.records.insert(Arc::as_ptr(&node.record));
        if let Some(previous) = self.last_key {
            if node.key < previous {
                self.report(
                    FindingKind::Order,
                    node.key,
                    format!("key {} follows larger key {previous}", node.key),
                );
            }
        }
        self.last_key = Some(node.key);
    }
}

pub(crate) fn verify(root: &Link) -> VerifyReport {
    let mut walker = Walker {
        findings: Vec::new(),
        nodes: 0,
        records: HashSet::new(),
        last_key: None,
    };
    let height = walker.walk(root);
    VerifyReport {
        success: walker.findings.is_empty(),
        counts: VerifyCounts {
            nodes: walker.nodes,
            distinct_records: walker.records.len() as u64,
            height,
        },
        findings: walker.findings,
    }
}
