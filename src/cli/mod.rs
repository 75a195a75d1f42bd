#![forbid(unsafe_code)]

//! Command-line building blocks: CSV ingestion, tree rendering and the
//! interactive shell.

/// Loading listings from CSV and writing the tree back out.
pub mod import_export;
/// Text rendering of [`DisplayNode`](crate::index::DisplayNode) trees.
pub mod render;
/// Menu-driven interactive session over any reader and writer.
pub mod shell;
