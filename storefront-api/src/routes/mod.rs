/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `membership`: tier ladder, progress and points history
/// - `account`: profile and settings
/// - `support`: support tickets
/// - `experiences`: experience ratings
/// - `notifications`: outcome notifications
/// - `admin`: tier management and points awards

pub mod account;
pub mod admin;
pub mod experiences;
pub mod health;
pub mod membership;
pub mod notifications;
pub mod support;
