#![forbid(unsafe_code)]

//! Value types shared by the index engine and the command-line tooling.

mod error;
mod listing;

/// Crate-wide error type and result alias.
pub use error::{ListingError, Result};

/// The listing record attached to every tree node, plus its typed extra columns.
pub use listing::{FieldValue, Listing};
