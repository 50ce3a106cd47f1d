/// Middleware for the API server
///
/// - `security`: security and cache headers on every response

pub mod security;
