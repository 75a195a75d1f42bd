use std::cmp::Ordering;
use std::sync::Arc;

use tracing::trace;

use super::node::{Link, Node};
use super::rotate::rebalance_toward;
use crate::types::Listing;

/// Inserts `record` under its primary `key`.
///
/// On an exact key collision the record is placed immediately after the
/// colliding node, in its right subtree, and `collided` is set so the caller
/// can add the secondary-keyed copy. Returns the new subtree root.
pub(crate) fn insert_primary(
    link: Link,
    key: f64,
    record: &Arc<Listing>,
    collided: &mut bool,
) -> Box<Node> {
    let Some(mut node) = link else {
        return Node::leaf(key, Arc::clone(record));
    };
    match key.partial_cmp(&node.key) {
        Some(Ordering::Less) => {
            node.left = Some(insert_primary(node.left.take(), key, record, collided));
        }
        Some(Ordering::Greater) => {
            node.right = Some(insert_primary(node.right.take(), key, record, collided));
        }
        _ => {
            trace!(key, "index.insert.collision");
            *collided = true;
            node.right = Some(insert_ordered(node.right.take(), key, record));
        }
    }
    rebalance_toward(node, key)
}

/// Plain ordered insert: keys equal to a node's key descend to its right.
pub(crate) fn insert_ordered(link: Link, key: f64, record: &Arc<Listing>) -> Box<Node> {
    let Some(mut node) = link else {
        return Node::leaf(key, Arc::clone(record));
    };
    if key < node.key {
        node.left = Some(insert_ordered(node.left.take(), key, record));
    } else {
        node.right = Some(insert_ordered(node.right.take(), key, record));
    }
    rebalance_toward(node, key)
}
