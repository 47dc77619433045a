//! Access token decoding.
//!
//! The client never holds the signing key, so tokens are decoded without
//! signature verification. Structure, base64 and claim types are still
//! checked; expiry is left to the caller.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::DecodeError;
use crate::models::auth::Claims;

/// Decode an access token into its claims.
///
/// Pure: no I/O and no clock. An empty token is `DecodeError::Missing`.
pub fn decode_claims(token: &str) -> Result<Claims, DecodeError> {
    if token.trim().is_empty() {
        return Err(DecodeError::Missing);
    }
    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &unverified())?;
    Ok(data.claims)
}

/// `true` once `now` has reached the token's expiry.
pub fn is_expired(claims: &Claims, now: i64) -> bool {
    claims.exp <= now
}

/// Sign claims with an HS256 secret. The server is the real issuer; this
/// exists for fixtures and local tooling.
pub fn sign_claims(claims: &Claims, secret: &[u8]) -> Result<String, DecodeError> {
    Ok(encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(secret),
    )?)
}

fn unverified() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}
