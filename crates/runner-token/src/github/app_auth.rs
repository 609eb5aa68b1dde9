// GitHub App Authentication
//
// An App authenticates by signing a short-lived RS256 JWT with its private
// key. The JWT is then exchanged for an installation access token.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use runner_token_common::constants::github::{JWT_BACKDATE_SECONDS, JWT_LIFETIME_SECONDS};
use serde::{Deserialize, Serialize};

/// JWT claims for GitHub App authentication
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer (GitHub App ID)
    pub iss: String,
}

impl AppClaims {
    /// Claims for `app_id` issued at `now`.
    pub fn new(app_id: i64, now: DateTime<Utc>) -> Self {
        let now = now.timestamp();
        Self {
            iat: now - JWT_BACKDATE_SECONDS,
            exp: now + JWT_LIFETIME_SECONDS,
            iss: app_id.to_string(),
        }
    }
}

/// Generate a JWT for GitHub App authentication
///
/// # Arguments
/// * `app_id` - The GitHub App ID
/// * `private_key_pem` - The private key in PEM format (PKCS#1 or PKCS#8)
/// * `now` - The current time
pub fn generate_app_jwt(app_id: i64, private_key_pem: &str, now: DateTime<Utc>) -> Result<String> {
    let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
        .context("Unable to parse GitHub App private key")?;

    let header = Header::new(Algorithm::RS256);

    encode(&header, &AppClaims::new(app_id, now), &encoding_key)
        .context("Unable to sign GitHub App JWT")
}
