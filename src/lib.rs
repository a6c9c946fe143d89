//! openvalve - shared game-library dashboard
//!
//! Registers several Steam accounts, fetches each one's games from the
//! OpenValve API, and merges them into one library where every game lists
//! the accounts that own it.
//!
//! # Architecture
//!
//! The shared library is derived state:
//! - Each account's raw catalog is kept as fetched
//! - The library is rebuilt by folding catalogs through a pure merge
//! - Metadata is backfilled first-writer-wins; owners accumulate
//!
//! # Modules
//!
//! - `adapters`: OpenValve API client behind the `CatalogApi` trait
//! - `core`: Dashboard state controller and the saved "my account"
//! - `domain`: Data structures (RawEntry, CatalogEntry, AccountProfile)
//! - `library`: Merge reducer and label distribution
//! - `console`: Command console
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Merge two libraries
//! openvalve library gabelogannewell 76561197960287930
//!
//! # Include friends, then chart genres
//! openvalve graph gabelogannewell --friends --source genres
//!
//! # Query the database
//! echo 'search 440' | openvalve console
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod console;
pub mod core;
pub mod domain;
pub mod library;

// Re-export main types at crate root for convenience
pub use adapters::{ApiClient, ApiError, CatalogApi};
pub use core::{Dashboard, DashboardError, FriendsOutcome, GameCount, MyAccount};
pub use domain::{AccountProfile, CatalogEntry, Classification, Price, RawEntry};
pub use library::{distribution, merge_library, merge_value, sort_by_name, GraphSource};
