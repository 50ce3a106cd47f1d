//! # Storefront Shared Library
//!
//! Domain logic for the storefront account area: membership tiers and points,
//! outcome notifications, and the account actions that produce them.
//!
//! ## Module Organization
//!
//! - `models`: database rows and their queries
//! - `db`: connection pool and migrations
//! - `auth`: session token verification and per-request session resolution
//! - `membership`: tier progress, points history, points awards
//! - `notify`: notification sink and best-effort recording
//! - `actions`: the mutate-then-notify runner shared by every write
//! - `account`: profile, settings, support tickets, experience ratings

pub mod account;
pub mod actions;
pub mod auth;
pub mod db;
pub mod membership;
pub mod models;
pub mod notify;

/// Current version of the storefront shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
