use serde::Serialize;

/// Snapshot of tree shape and mutation counters at a point in time.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeStats {
    /// Nodes currently in the tree
    pub nodes: u64,
    /// Height of the root (0 when empty)
    pub height: u32,
    /// Smallest key, if any
    pub min_key: Option<f64>,
    /// Largest key, if any
    pub max_key: Option<f64>,
    /// Records inserted through the public insert operations
    pub records_inserted: u64,
    /// Inserts that collided with an existing primary key
    pub key_collisions: u64,
    /// Deletes that removed a node
    pub deletes: u64,
    /// Deletes whose key was absent
    pub delete_misses: u64,
}

/// Mutation counters owned by the tree.
#[derive(Default, Debug, Clone, Copy)]
pub(crate) struct Counters {
    pub(crate) records_inserted: u64,
    pub(crate) key_collisions: u64,
    pub(crate) deletes: u64,
    pub(crate) delete_misses: u64,
}
