use std::cmp::Ordering;
use std::ptr;

use serde::{Deserialize, Serialize};

use super::node::{Link, Node};
use crate::types::Listing;

/// Filter applied by [`ListingTree::find_by_criteria`](super::ListingTree::find_by_criteria).
///
/// The metric window is half-open: `min_metric <= key < max_metric`. Attribute
/// predicates left as `None` accept every listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    /// Exact city match.
    pub city: Option<String>,
    /// Minimum bedroom count (inclusive).
    pub min_bedrooms: Option<u32>,
    /// Maximum price (inclusive).
    pub max_price: Option<f64>,
    /// Lower metric bound (inclusive).
    pub min_metric: f64,
    /// Upper metric bound (exclusive).
    pub max_metric: f64,
}

impl Default for Criteria {
    fn default() -> Self {
        Self {
            city: None,
            min_bedrooms: None,
            max_price: None,
            min_metric: f64::NEG_INFINITY,
            max_metric: f64::INFINITY,
        }
    }
}

impl Criteria {
    /// Restricts results to `city`.
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    /// Requires at least `bedrooms` bedrooms.
    pub fn min_bedrooms(mut self, bedrooms: u32) -> Self {
        self.min_bedrooms = Some(bedrooms);
        self
    }

    /// Caps the price.
    pub fn max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }

    /// Sets the `[min, max)` metric window.
    pub fn metric_range(mut self, min: f64, max: f64) -> Self {
        self.min_metric = min;
        self.max_metric = max;
        self
    }

    fn in_range(&self, key: f64) -> bool {
        key >= self.min_metric && key < self.max_metric
    }

    /// Tests a node's key and record against every predicate.
    pub fn matches(&self, key: f64, record: &Listing) -> bool {
        if !self.in_range(key) {
            return false;
        }
        if let Some(city) = &self.city {
            if record.city != *city {
                return false;
            }
        }
        if let Some(min_bedrooms) = self.min_bedrooms {
            if record.bedrooms < min_bedrooms {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if record.price > max_price {
                return false;
            }
        }
        true
    }
}

/// First node keyed `key` on the search path.
pub(crate) fn find(link: &Link, key: f64) -> Option<&Node> {
    let mut cursor = link.as_deref();
    while let Some(node) = cursor {
        cursor = match key.partial_cmp(&node.key)? {
            Ordering::Less => node.left.as_deref(),
            Ordering::Greater => node.right.as_deref(),
            Ordering::Equal => return Some(node),
        };
    }
    None
}

/// Pruned walk collecting matching records in ascending key order.
pub(crate) fn collect_matching<'a>(
    link: &'a Link,
    criteria: &Criteria,
    out: &mut Vec<(f64, &'a Listing)>,
) {
    let Some(node) = link.as_deref() else {
        return;
    };
    if node.key >= criteria.min_metric {
        collect_matching(&node.left, criteria, out);
    }
    if criteria.matches(node.key, &node.record) {
        out.push((node.key, node.record.as_ref()));
    }
    if node.key < criteria.max_metric {
        collect_matching(&node.right, criteria, out);
    }
}

/// Root-to-target path for the first node keyed `key`.
///
/// Relatives are read straight off the path, so nodes placed under a
/// secondary metric resolve like any other.
#[derive(Debug)]
pub(crate) struct Lineage<'a> {
    path: Vec<&'a Node>,
}

impl<'a> Lineage<'a> {
    pub(crate) fn trace(link: &'a Link, key: f64) -> Option<Self> {
        let mut path = Vec::new();
        let mut cursor = link.as_deref();
        while let Some(node) = cursor {
            path.push(node);
            cursor = match key.partial_cmp(&node.key)? {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(Self { path }),
            };
        }
        None
    }

    /// Root is level 1.
    pub(crate) fn level(&self) -> usize {
        self.path.len()
    }

    fn ancestor(&self, generations: usize) -> Option<&'a Node> {
        let depth = self.path.len().checked_sub(generations + 1)?;
        Some(self.path[depth])
    }

    pub(crate) fn parent(&self) -> Option<&'a Node> {
        self.ancestor(1)
    }

    pub(crate) fn grandparent(&self) -> Option<&'a Node> {
        self.ancestor(2)
    }

    pub(crate) fn sibling(&self) -> Option<&'a Node> {
        other_child(self.ancestor(1)?, self.ancestor(0)?)
    }

    pub(crate) fn uncle(&self) -> Option<&'a Node> {
        other_child(self.ancestor(2)?, self.ancestor(1)?)
    }
}

fn other_child<'a>(parent: &'a Node, child: &Node) -> Option<&'a Node> {
    let is_left = parent
        .left
        .as_deref()
        .is_some_and(|left| ptr::eq(left, child));
    if is_left {
        parent.right.as_deref()
    } else {
        parent.left.as_deref()
    }
}
