// ABOUTME: JWT token issuance/validation and bcrypt password hashing
// ABOUTME: Provides bearer-token authentication for route handlers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 liftlog contributors

//! Token authentication and password hashing.
//!
//! Stateless HS256 JWTs carry the user ID in `sub`. Passwords are stored as
//! bcrypt hashes and never leave the database layer in any other form.

use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID
    sub: String,
    /// Expiry, seconds since epoch
    exp: i64,
    /// Issued at, seconds since epoch
    iat: i64,
}

/// Authenticated request context
#[derive(Debug, Clone, Copy)]
pub struct AuthResult {
    pub user_id: Uuid,
}

/// Issues and validates access tokens
pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_expiry: Duration,
}

impl AuthManager {
    #[must_use]
    pub fn new(secret: &[u8], token_expiry_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            token_expiry: Duration::hours(token_expiry_hours),
        }
    }

    /// Generate a token for a user
    ///
    /// # Errors
    ///
    /// Returns an error if signing fails
    pub fn generate_token(&self, user_id: Uuid) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + self.token_expiry).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to sign token: {e}")))
    }

    /// Validate a token and extract the user ID
    ///
    /// # Errors
    ///
    /// Returns `AuthInvalid` if the token is expired, malformed or carries a
    /// bad signature
    pub fn validate_token(&self, token: &str) -> AppResult<Uuid> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| AppError::auth_invalid(format!("Invalid token: {e}")))?;

        Uuid::parse_str(&data.claims.sub)
            .map_err(|e| AppError::auth_invalid(format!("Invalid token subject: {e}")))
    }
}

/// Authenticate a request from its `Authorization: Bearer` header
///
/// # Errors
///
/// Returns `AuthInvalid` if the header is missing, malformed or the token
/// does not validate
pub fn authenticate(headers: &HeaderMap, auth: &AuthManager) -> AppResult<AuthResult> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::auth_invalid("Missing authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::auth_invalid("Authorization header must be a Bearer token"))?;

    let user_id = auth.validate_token(token)?;
    Ok(AuthResult { user_id })
}

/// Hash a password for storage
///
/// # Errors
///
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> AppResult<String> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

/// Check a password against its stored hash
///
/// # Errors
///
/// Returns an error if the hash is malformed
pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| AppError::internal(format!("Failed to verify password: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let auth = AuthManager::new(b"test-secret", 1);
        let user_id = Uuid::new_v4();
        let token = auth.generate_token(user_id).unwrap();
        assert_eq!(auth.validate_token(&token).unwrap(), user_id);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = AuthManager::new(b"test-secret", 1);
        assert!(auth.validate_token("not-a-token").is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let signer = AuthManager::new(b"secret-a", 1);
        let verifier = AuthManager::new(b"secret-b", 1);
        let token = signer.generate_token(Uuid::new_v4()).unwrap();
        assert!(verifier.validate_token(&token).is_err());
    }

    #[test]
    fn bearer_header_is_required() {
        let auth = AuthManager::new(b"test-secret", 1);
        let mut headers = HeaderMap::new();
        assert!(authenticate(&headers, &auth).is_err());

        headers.insert("authorization", "Token abc".parse().unwrap());
        assert!(authenticate(&headers, &auth).is_err());
    }
}
