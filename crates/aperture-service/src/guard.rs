use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use aperture_types::{Error, Result};

/// Identity claim carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: usize,
    pub exp: usize,
}

/// Mints and checks the signed bearer credentials that stand in for a
/// caller's identity. Callers treat tokens as opaque strings; only the
/// guard can read one.
pub struct AccessGuard {
    secret: String,
    ttl: Duration,
}

impl AccessGuard {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            secret: secret.to_string(),
            ttl,
        }
    }

    /// Issues a signed credential embedding the user's identity.
    pub fn issue(&self, user_id: i64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    /// Returns the identity a well-formed, unexpired credential carries.
    pub fn authenticate(&self, credential: &str) -> Result<i64> {
        let data = decode::<Claims>(
            credential,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| Error::InvalidCredential)?;
        Ok(data.claims.sub)
    }

    /// Accepts only a credential whose embedded identity equals `claimed_id`.
    pub fn verify_actor(&self, credential: &str, claimed_id: i64) -> Result<()> {
        if self.authenticate(credential)? != claimed_id {
            return Err(Error::InvalidCredential);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_authenticate() {
        let guard = AccessGuard::new("secret", Duration::hours(1));
        let token = guard.issue(42).unwrap();
        assert_eq!(guard.authenticate(&token).unwrap(), 42);
        guard.verify_actor(&token, 42).unwrap();
    }

    #[test]
    fn mismatched_identity_is_rejected() {
        let guard = AccessGuard::new("secret", Duration::hours(1));
        let token = guard.issue(42).unwrap();
        assert!(matches!(
            guard.verify_actor(&token, 7),
            Err(Error::InvalidCredential)
        ));
    }

    #[test]
    fn foreign_and_garbage_tokens_are_rejected() {
        let guard = AccessGuard::new("secret", Duration::hours(1));
        let foreign = AccessGuard::new("other-secret", Duration::hours(1))
            .issue(42)
            .unwrap();
        assert!(matches!(
            guard.authenticate(&foreign),
            Err(Error::InvalidCredential)
        ));
        assert!(matches!(
            guard.authenticate("42"),
            Err(Error::InvalidCredential)
        ));
        assert!(matches!(
            guard.authenticate(""),
            Err(Error::InvalidCredential)
        ));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        // Expiry far enough in the past to clear the default leeway.
        let guard = AccessGuard::new("secret", Duration::hours(-2));
        let token = guard.issue(42).unwrap();
        assert!(matches!(
            guard.authenticate(&token),
            Err(Error::InvalidCredential)
        ));
    }
}
