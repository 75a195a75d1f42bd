#![forbid(unsafe_code)]

//! Height-balanced index of listings keyed by price per surface unit.
//!
//! [`ListingTree`] is an AVL tree over `f64` keys. Keys are derived from each
//! record by [`primary_metric`]; when a new record's key equals an existing
//! node's key the record is stored twice, once right next to the colliding
//! node under the same key and once under its [`secondary_metric`].

mod delete;
mod insert;
mod iter;
mod metric;
mod node;
mod projection;
mod query;
mod rotate;
mod stats;
mod verify;

use std::sync::Arc;

use tracing::debug;

use crate::types::{Listing, ListingError, Result};
use node::Link;
use query::Lineage;
use stats::Counters;

pub use iter::Iter;
pub use metric::{primary_metric, secondary_metric};
pub use projection::DisplayNode;
pub use query::Criteria;
pub use stats::TreeStats;
pub use verify::{FindingKind, VerifyCounts, VerifyFinding, VerifyReport};

/// AVL tree of listings.
#[derive(Debug, Clone, Default)]
pub struct ListingTree {
    root: Link,
    len: usize,
    counters: Counters,
}

impl ListingTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes, counting both nodes created for a colliding record.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root; 0 for an empty tree.
    pub fn height(&self) -> u32 {
        node::height(&self.root)
    }

    /// Key of the root node.
    pub fn root_key(&self) -> Option<f64> {
        self.root.as_ref().map(|root| root.key)
    }

    /// Drops every node.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Inserts `record` keyed by its primary metric and returns that key.
    ///
    /// Fails with [`ListingError::InvalidMetricInput`] when the metric cannot
    /// be derived; the tree is left unchanged in that case.
    pub fn insert(&mut self, record: Listing) -> Result<f64> {
        let key = primary_metric(&record)?;
        self.insert_keyed(key, record)?;
        Ok(key)
    }

    /// Inserts `record` under an explicit key.
    ///
    /// Collisions still fall back to the record's secondary metric.
    pub fn insert_with_key(&mut self, key: f64, record: Listing) -> Result<()> {
        if !key.is_finite() {
            return Err(ListingError::InvalidArgument(format!(
                "index keys must be finite, got {key}"
            )));
        }
        self.insert_keyed(key, record)
    }

    fn insert_keyed(&mut self, key: f64, record: Listing) -> Result<()> {
        // Derived up front so a failure leaves the tree untouched.
        let secondary = match query::find(&self.root, key) {
            Some(_) => Some(secondary_metric(&record)?),
            None => None,
        };
        let record = Arc::new(record);
        let mut collided = false;
        let root = insert::insert_primary(self.root.take(), key, &record, &mut collided);
        self.root = Some(root);
        self.len += 1;
        self.counters.records_inserted += 1;
        debug_assert_eq!(collided, secondary.is_some());

        if let Some(secondary) = secondary {
            // Routed from the root so the copy lands where a lookup by the
            // secondary key searches for it.
            debug!(key, secondary, "index.insert.secondary_fallback");
            let root = insert::insert_ordered(self.root.take(), secondary, &record);
            self.root = Some(root);
            self.len += 1;
            self.counters.key_collisions += 1;
        }
        Ok(())
    }

    /// Removes the first node keyed `key`, returning its record.
    ///
    /// An absent key leaves the tree as it was and returns `None`.
    pub fn delete_by_metric(&mut self, key: f64) -> Option<Arc<Listing>> {
        let mut removed = None;
        self.root = delete::delete(self.root.take(), key, &mut removed);
        if removed.is_some() {
            self.len -= 1;
            self.counters.deletes += 1;
            debug!(key, remaining = self.len, "index.delete.removed");
        } else {
            self.counters.delete_misses += 1;
            debug!(key, "index.delete.missing");
        }
        removed
    }

    /// Record stored under `key`, if any.
    pub fn find_by_metric(&self, key: f64) -> Option<&Listing> {
        query::find(&self.root, key).map(|node| node.record.as_ref())
    }

    /// Records matching `criteria`, in ascending key order.
    pub fn find_by_criteria(&self, criteria: &Criteria) -> Vec<&Listing> {
        self.find_entries_by_criteria(criteria)
            .into_iter()
            .map(|(_, record)| record)
            .collect()
    }

    /// Like [`find_by_criteria`](Self::find_by_criteria), keeping each node's key.
    pub fn find_entries_by_criteria(&self, criteria: &Criteria) -> Vec<(f64, &Listing)> {
        let mut out = Vec::new();
        query::collect_matching(&self.root, criteria, &mut out);
        out
    }

    /// Depth of the node keyed `key`; the root is level 1.
    pub fn level_of(&self, key: f64) -> Option<usize> {
        Lineage::trace(&self.root, key).map(|lineage| lineage.level())
    }

    /// `height(left) - height(right)` of the node keyed `key`.
    pub fn balance_factor_of(&self, key: f64) -> Option<i32> {
        query::find(&self.root, key).map(|node| node.balance_factor())
    }

    /// Record of the parent of the node keyed `key`.
    pub fn parent_of(&self, key: f64) -> Option<&Listing> {
        let lineage = Lineage::trace(&self.root, key)?;
        lineage.parent().map(|node| node.record.as_ref())
    }

    /// Record of the parent's parent of the node keyed `key`.
    pub fn grandparent_of(&self, key: f64) -> Option<&Listing> {
        let lineage = Lineage::trace(&self.root, key)?;
        lineage.grandparent().map(|node| node.record.as_ref())
    }

    /// Record of the other child of the parent of the node keyed `key`.
    pub fn sibling_of(&self, key: f64) -> Option<&Listing> {
        let lineage = Lineage::trace(&self.root, key)?;
        lineage.sibling().map(|node| node.record.as_ref())
    }

    /// Record of the parent's sibling of the node keyed `key`.
    pub fn uncle_of(&self, key: f64) -> Option<&Listing> {
        let lineage = Lineage::trace(&self.root, key)?;
        lineage.uncle().map(|node| node.record.as_ref())
    }

    /// In-order iteration over `(key, record)`.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.root)
    }

    /// Smallest key.
    pub fn min_key(&self) -> Option<f64> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some(node.key)
    }

    /// Largest key.
    pub fn max_key(&self) -> Option<f64> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some(node.key)
    }

    /// Hierarchical view of the whole tree for renderers; `None` when empty.
    pub fn project(&self) -> Option<DisplayNode> {
        projection::project(&self.root)
    }

    /// Walks every node checking heights, balance and key order.
    pub fn verify(&self) -> VerifyReport {
        verify::verify(&self.root)
    }

    /// Current shape and mutation counters.
    pub fn stats(&self) -> TreeStats {
        TreeStats {
            nodes: self.len as u64,
            height: self.height(),
            min_key: self.min_key(),
            max_key: self.max_key(),
            records_inserted: self.counters.records_inserted,
            key_collisions: self.counters.key_collisions,
            deletes: self.counters.deletes,
            delete_misses: self.counters.delete_misses,
        }
    }
}

impl<'a> IntoIterator for &'a ListingTree {
    type Item = (f64, &'a Listing);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
