/// Session token decoding
///
/// Sessions are issued by the identity provider as HS256-signed JWTs. This
/// service only needs to verify them and read the subject and role; `issue`
/// exists so tests and local tooling can mint tokens with the shared secret.
///
/// # Example
///
/// ```
/// use storefront_shared::auth::token::{decode, issue, SessionClaims, SessionKeys};
/// use storefront_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let keys = SessionKeys::new("a-secret-that-is-at-least-32-bytes!", "storefront");
/// let user_id = Uuid::new_v4();
///
/// let token = issue(&SessionClaims::new(user_id, UserRole::Customer, &keys), &keys)?;
/// let claims = decode(&token, &keys)?;
/// assert_eq!(claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::user::UserRole;

/// Default session lifetime
pub const SESSION_LIFETIME_HOURS: i64 = 24;

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Failed to sign a token
    #[error("Failed to create token: {0}")]
    Create(String),

    /// Signature, format or claim check failed
    #[error("Invalid session token: {0}")]
    Invalid(String),

    /// Token is past its `exp`
    #[error("Session has expired")]
    Expired,

    /// Token was issued by someone else
    #[error("Unexpected token issuer")]
    WrongIssuer,
}

/// Secret and issuer shared with the identity provider
#[derive(Debug, Clone)]
pub struct SessionKeys {
    pub secret: String,
    pub issuer: String,
}

impl SessionKeys {
    pub fn new(secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
        }
    }
}

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject - user ID
    pub sub: Uuid,

    /// Account role at issue time
    pub role: UserRole,

    /// Issuer
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Claims valid for the default session lifetime
    pub fn new(user_id: Uuid, role: UserRole, keys: &SessionKeys) -> Self {
        Self::with_lifetime(user_id, role, keys, Duration::hours(SESSION_LIFETIME_HOURS))
    }

    /// Claims valid for `lifetime` from now (negative values produce expired claims)
    pub fn with_lifetime(
        user_id: Uuid,
        role: UserRole,
        keys: &SessionKeys,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id,
            role,
            iss: keys.issuer.clone(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

/// Signs claims into a token string
pub fn issue(claims: &SessionClaims, keys: &SessionKeys) -> Result<String, TokenError> {
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(keys.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Create(e.to_string()))
}

/// Verifies signature, expiry and issuer, and returns the claims
pub fn decode(token: &str, keys: &SessionKeys) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[keys.issuer.as_str()]);
    validation.validate_exp = true;

    jsonwebtoken::decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(keys.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidIssuer => TokenError::WrongIssuer,
        _ => TokenError::Invalid(e.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new("test-secret-key-at-least-32-bytes-long", "storefront")
    }

    #[test]
    fn test_issue_and_decode() {
        let user_id = Uuid::new_v4();
        let token = issue(&SessionClaims::new(user_id, UserRole::Admin, &keys()), &keys()).unwrap();

        let claims = decode(&token, &keys()).unwrap();
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.iss, "storefront");
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let token = issue(
            &SessionClaims::new(Uuid::new_v4(), UserRole::Customer, &keys()),
            &keys(),
        )
        .unwrap();

        let other = SessionKeys::new("another-secret-key-at-least-32-bytes", "storefront");
        assert!(matches!(decode(&token, &other), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn test_decode_expired() {
        let claims = SessionClaims::with_lifetime(
            Uuid::new_v4(),
            UserRole::Customer,
            &keys(),
            Duration::seconds(-3600),
        );
        let token = issue(&claims, &keys()).unwrap();

        assert!(matches!(decode(&token, &keys()), Err(TokenError::Expired)));
    }

    #[test]
    fn test_decode_wrong_issuer() {
        let foreign = SessionKeys::new(keys().secret, "someone-else");
        let token = issue(
            &SessionClaims::new(Uuid::new_v4(), UserRole::Customer, &foreign),
            &foreign,
        )
        .unwrap();

        assert!(matches!(decode(&token, &keys()), Err(TokenError::WrongIssuer)));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode("not.a.token", &keys()).is_err());
    }
}
