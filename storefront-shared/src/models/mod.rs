/// Database models for the storefront
///
/// Each model owns its row type and the queries that read or write it.
///
/// # Models
///
/// - `user`: customer accounts with points balance and current tier
/// - `membership_tier`: loyalty tiers ordered by minimum points
/// - `membership_history`: append-only points log
/// - `notification`: outcome records written after every mutation
/// - `settings`: per-user account preferences
/// - `support_ticket`: customer support requests
/// - `experience`: storefront experience ratings

pub mod experience;
pub mod membership_history;
pub mod membership_tier;
pub mod notification;
pub mod settings;
pub mod support_ticket;
pub mod user;
