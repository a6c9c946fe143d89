//! Application state and persisted preferences.
//!
//! This module contains:
//! - Dashboard: registered accounts and their merged library
//! - MyAccount: the user's own account, remembered between runs

pub mod dashboard;
pub mod my_account;

// Re-export commonly used types
pub use dashboard::{Dashboard, DashboardError, FriendsOutcome, GameCount, RawCatalog};
pub use my_account::MyAccount;
