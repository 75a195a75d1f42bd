use std::sync::Arc;

use crate::types::Listing;

/// Owning edge to a child subtree.
pub(crate) type Link = Option<Box<Node>>;

/// A tree node. Each node exclusively owns its children.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) key: f64,
    pub(crate) record: Arc<Listing>,
    pub(crate) height: u32,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    pub(crate) fn leaf(key: f64, record: Arc<Listing>) -> Box<Self> {
        Box::new(Self {
            key,
            record,
            height: 1,
            left: None,
            right: None,
        })
    }

    pub(crate) fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    /// `height(left) - height(right)`.
    pub(crate) fn balance_factor(&self) -> i32 {
        height(&self.left) as i32 - height(&self.right) as i32
    }
}

/// Height of a possibly empty subtree; empty subtrees have height 0.
pub(crate) fn height(link: &Link) -> u32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// Balance factor of a possibly empty subtree; empty subtrees are balanced.
pub(crate) fn balance_factor(link: &Link) -> i32 {
    link.as_ref().map_or(0, |node| node.balance_factor())
}
