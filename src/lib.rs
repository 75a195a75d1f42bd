//! Listing index: an AVL tree of real-estate listings keyed by price per
//! surface unit, with CSV ingestion and an interactive shell on top.

#![warn(missing_docs)]

pub mod cli;
pub mod index;
pub mod logging;
pub mod types;

pub use index::{Criteria, DisplayNode, ListingTree};
pub use types::{FieldValue, Listing, ListingError, Result};
