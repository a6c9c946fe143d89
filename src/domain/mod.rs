//! Domain types for the shared library.
//!
//! - Entries: games as received from the API and as held in the library
//! - Accounts: profile summaries and presence formatting

pub mod account;
pub mod entry;

// Re-export commonly used types
pub use account::{format_date, AccountProfile, PersonaState, StatusClass};
pub use entry::{is_truthy, CatalogEntry, Classification, ClassificationField, Price, RawEntry};
