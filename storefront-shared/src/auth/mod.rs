/// Session handling
///
/// Sessions are issued by the external identity provider. This module only
/// verifies them and turns them into an explicit [`session::Session`] value.
///
/// # Modules
///
/// - [`token`]: HS256 session token verification
/// - [`session`]: per-request resolution and Axum extraction

pub mod session;
pub mod token;
