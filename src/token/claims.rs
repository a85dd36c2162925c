//! Claims Decoding
//!
//! Expiry extraction from the self-describing access token.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::CacheError;

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    exp: i64,
}

/// Extract the expiry instant from a JWT access token's `exp` claim.
///
/// The signature is deliberately NOT verified: tokens handled here were just
/// received from the authorization server over TLS, so the issuer is trusted
/// at the transport level and the payload is read as-is. Do not reuse this
/// for tokens arriving from any other party.
pub fn token_expiry(token: &str) -> Result<DateTime<Utc>, CacheError> {
    // The algorithm is irrelevant here: signature validation is disabled, so
    // no key or algorithm check runs.
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    let data = jsonwebtoken::decode::<ExpiryClaims>(
        token,
        &DecodingKey::from_secret(&[]),
        &validation,
    )
    .map_err(|e| CacheError::ClaimParse {
        message: e.to_string(),
    })?;

    DateTime::from_timestamp(data.claims.exp, 0).ok_or_else(|| CacheError::ClaimParse {
        message: format!("exp claim out of range: {}", data.claims.exp),
    })
}
