use axum::http::{header, HeaderMap};

use crate::auth::jwt;
use crate::models::Role;

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// True iff a bearer token is present and decodable. Does not check role;
/// this is the blanket "is this caller authenticated at all" gate.
pub fn verify_presence(headers: &HeaderMap, secret: &str) -> bool {
    match bearer_token(headers) {
        Some(token) => jwt::decode(token, secret).is_ok(),
        None => false,
    }
}

/// True iff a bearer token is present, decodable, and carries exactly the
/// required role. Roles are mutually exclusive flags: an admin token does
/// not satisfy a teacher requirement. A missing or undecodable token and a
/// role mismatch all fold into `false`.
pub fn authorize(headers: &HeaderMap, secret: &str, required: Role) -> bool {
    match bearer_token(headers) {
        Some(token) => match jwt::decode(token, secret) {
            Ok(claims) => claims.role == required,
            Err(_) => false,
        },
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Claims;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

    fn headers_with_token(role: Role) -> HeaderMap {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            role,
            exp: (now + 3600) as usize,
            iat: now as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn authorizes_exactly_the_token_role() {
        let headers = headers_with_token(Role::Teacher);
        assert!(authorize(&headers, SECRET, Role::Teacher));
        assert!(!authorize(&headers, SECRET, Role::Student));
        assert!(!authorize(&headers, SECRET, Role::Admin));
    }

    #[test]
    fn admin_does_not_satisfy_teacher_requirement() {
        let headers = headers_with_token(Role::Admin);
        assert!(!authorize(&headers, SECRET, Role::Teacher));
        assert!(authorize(&headers, SECRET, Role::Admin));
    }

    #[test]
    fn denies_request_without_token() {
        let headers = HeaderMap::new();
        assert!(!authorize(&headers, SECRET, Role::Teacher));
        assert!(!verify_presence(&headers, SECRET));
    }

    #[test]
    fn denies_undecodable_token() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer garbage"),
        );
        assert!(!verify_presence(&headers, SECRET));
        assert!(!authorize(&headers, SECRET, Role::Teacher));
    }

    #[test]
    fn verify_presence_ignores_role() {
        let headers = headers_with_token(Role::Student);
        assert!(verify_presence(&headers, SECRET));
    }
}
