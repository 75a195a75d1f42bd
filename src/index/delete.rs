use std::cmp::Ordering;
use std::sync::Arc;

use super::node::{Link, Node};
use super::rotate::rebalance;
use crate::types::Listing;

/// Removes the first node keyed `key` on the search path.
///
/// The removed node's record is written to `removed`; a missing key leaves the
/// subtree untouched. A node with two children takes over its in-order
/// successor's key and record, and the successor is unlinked from the right
/// subtree. Returns the new subtree root.
pub(crate) fn delete(link: Link, key: f64, removed: &mut Option<Arc<Listing>>) -> Link {
    let mut node = link?;
    match key.partial_cmp(&node.key) {
        Some(Ordering::Less) => node.left = delete(node.left.take(), key, removed),
        Some(Ordering::Greater) => node.right = delete(node.right.take(), key, removed),
        Some(Ordering::Equal) => match (node.left.take(), node.right.take()) {
            (None, right) => {
                *removed = Some(Arc::clone(&node.record));
                return right;
            }
            (left, None) => {
                *removed = Some(Arc::clone(&node.record));
                return left;
            }
            (Some(left), Some(right)) => {
                let (rest, successor) = pop_min(right);
                node.left = Some(left);
                node.right = rest;
                node.key = successor.key;
                *removed = Some(std::mem::replace(
                    &mut node.record,
                    Arc::clone(&successor.record),
                ));
            }
        },
        None => return Some(node),
    }
    Some(rebalance(node))
}

/// Detaches the leftmost node of `node`'s subtree, rebalancing on the way up.
fn pop_min(mut node: Box<Node>) -> (Link, Box<Node>) {
    match node.left.take() {
        None => {
            let right = node.right.take();
            (right, node)
        }
        Some(left) => {
            let (rest, min) = pop_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
    }
}
