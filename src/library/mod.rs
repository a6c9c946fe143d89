//! The shared library built from every registered account's catalog.
//!
//! - `merge`: folds one account's games into the library
//! - `distribution`: label counts for the graph view

pub mod distribution;
pub mod merge;

pub use distribution::{distribution, footer, render, Bucket, GraphMode, GraphSource, UNCATEGORIZED};
pub use merge::{merge_library, merge_value, sort_by_name};
