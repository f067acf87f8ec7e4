//! Password hashing and bearer-token handling.
//!
//! Passwords are stored as `salt$digest` using a per-user random salt and
//! iterated SHA-256. Bearer tokens are JWTs (HS256) carrying the user id in
//! `sub` and an expiry; the task routes resolve them back to an owner on
//! every request.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of SHA-256 rounds applied when hashing a password.
const HASH_ITERATIONS: u32 = 100_000;

/// Salt length in bytes.
const SALT_LEN: usize = 16;

/// Errors that can occur when issuing or verifying tokens.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token could not be signed.
    #[error("failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
    /// Token is malformed, has a bad signature, or is expired.
    #[error("invalid or expired token")]
    InvalidToken,
}

/// JWT claims: the owning user id and the expiry timestamp.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Signing and verification keys for bearer tokens, derived from the
/// configured secret.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    /// Derives token keys from a shared secret and a token lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Issues a token for the given user id, expiring after the
    /// configured lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Encode`] if signing fails.
    pub fn issue(&self, user_id: &str) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(AuthError::Encode)
    }

    /// Verifies a token and returns the user id it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidToken`] on any signature, format, or
    /// expiry failure — callers get no further detail by design.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims.sub)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Hashes a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let salt: [u8; SALT_LEN] = rand::random();
    format!("{}${}", hex(&salt), hex(&digest(&salt, password)))
}

/// Verifies a password against a stored `salt$digest` hash.
///
/// A malformed stored hash verifies as false rather than erroring.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Some(salt) = unhex(salt_hex) else {
        return false;
    };
    hex(&digest(&salt, password)) == digest_hex
}

/// Iterated salted SHA-256.
fn digest(salt: &[u8], password: &str) -> [u8; 32] {
    let mut acc: [u8; 32] = Sha256::new()
        .chain_update(salt)
        .chain_update(password.as_bytes())
        .finalize()
        .into();
    for _ in 1..HASH_ITERATIONS {
        acc = Sha256::digest(acc).into();
    }
    acc
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn unhex(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
