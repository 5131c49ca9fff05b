use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub role: Role,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

/// Token rejected by the codec: malformed, bad signature, or expired.
#[derive(Debug)]
pub struct DecodeError(jsonwebtoken::errors::Error);

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token decode failed: {}", self.0)
    }
}

impl std::error::Error for DecodeError {}

impl From<jsonwebtoken::errors::Error> for DecodeError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        DecodeError(err)
    }
}

/// Decodes and validates a bearer token. Anything not produced by the
/// paired HS256 encoder, and anything expired, is rejected.
pub fn decode(token: &str, secret: &str) -> Result<Claims, DecodeError> {
    let mut validation = Validation::new(Algorithm::HS256);

    // Allow for some clock skew
    validation.leeway = 30;

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());

    let token_data = jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

    fn make_token(role: Role, exp_offset: i64, secret: &str) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            role,
            exp: (now + exp_offset) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn decodes_token_from_paired_encoder() {
        let token = make_token(Role::Teacher, 3600, SECRET);
        let claims = decode(&token, SECRET).unwrap();
        assert_eq!(claims.role, Role::Teacher);
    }

    #[test]
    fn rejects_malformed_token() {
        assert!(decode("not-a-token", SECRET).is_err());
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = make_token(Role::Admin, 3600, "some-other-secret-that-is-32-chars!!");
        assert!(decode(&token, SECRET).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let token = make_token(Role::Student, -3600, SECRET);
        assert!(decode(&token, SECRET).is_err());
    }
}
