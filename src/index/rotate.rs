//! Rotation primitives and the two rebalancing policies built on them.
//!
//! Insertion picks the rotation from where the new key went relative to the
//! heavy child; deletion has no such key and reads the heavy child's balance
//! factor instead.

use super::node::{balance_factor, Node};

/// Promotes `z.right` to subtree root. No-op when `z` has no right child.
pub(crate) fn rotate_left(mut z: Box<Node>) -> Box<Node> {
    let Some(mut y) = z.right.take() else {
        return z;
    };
    z.right = y.left.take();
    z.update_height();
    y.left = Some(z);
    y.update_height();
    y
}

/// Promotes `y.left` to subtree root. No-op when `y` has no left child.
pub(crate) fn rotate_right(mut y: Box<Node>) -> Box<Node> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

/// Rebalances `node` after `key` was inserted somewhere below it.
///
/// Equal keys route right on insertion, so a key equal to the heavy child's
/// key sits in that child's right subtree.
pub(crate) fn rebalance_toward(mut node: Box<Node>, key: f64) -> Box<Node> {
    node.update_height();
    let balance = node.balance_factor();
    let node = if balance > 1 {
        let Some(left_key) = node.left.as_ref().map(|left| left.key) else {
            return node;
        };
        if key >= left_key {
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if balance < -1 {
        let Some(right_key) = node.right.as_ref().map(|right| right.key) else {
            return node;
        };
        if key < right_key {
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    };
    debug_assert!(
        node.balance_factor().abs() <= 1,
        "insert rebalance left factor {}",
        node.balance_factor()
    );
    node
}

/// Rebalances `node` after a removal somewhere below it.
pub(crate) fn rebalance(mut node: Box<Node>) -> Box<Node> {
    node.update_height();
    let balance = node.balance_factor();
    let node = if balance > 1 {
        if balance_factor(&node.left) < 0 {
            node.left = node.left.take().map(rotate_left);
        }
        rotate_right(node)
    } else if balance < -1 {
        if balance_factor(&node.right) > 0 {
            node.right = node.right.take().map(rotate_right);
        }
        rotate_left(node)
    } else {
        node
    };
    debug_assert!(
        node.balance_factor().abs() <= 1,
        "delete rebalance left factor {}",
        node.balance_factor()
    );
    node
}
