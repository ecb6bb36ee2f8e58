use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use crate::cache::JwksCache;
use crate::claims::ExternalClaims;
use crate::errors::JwksError;

pub use crate::claims::check_scopes;

/// Verifies an externally-issued RS256 JWT against the JWKS document
/// cached by `cache`, enforcing the given expected audience and issuer.
///
/// Non-RS256 tokens, tokens without a `kid`, and `kid`s absent from the
/// key set are all rejected before any signature work is attempted.
pub async fn verify_external_jwt(
    cache: &JwksCache,
    token: &str,
    expected_audience: &str,
    expected_issuer: &str,
) -> Result<ExternalClaims, JwksError> {
    let header = decode_header(token)
        .map_err(|e| JwksError::malformed(&format!("unparsable jwt header: {e}")))?;

    if header.alg != Algorithm::RS256 {
        return Err(JwksError::alg_unsupported(&format!(
            "unsupported jwt alg {:?}, only RS256 is accepted",
            header.alg
        )));
    }

    let kid = header
        .kid
        .ok_or_else(|| JwksError::kid_missing("jwt header carries no kid"))?;

    let jwks = cache.get_keys().await?;
    let jwk = jwks
        .find(&kid)
        .ok_or_else(|| JwksError::kid_unknown(&format!("kid {kid} not present in jwks")))?;

    let decoding_key = DecodingKey::from_jwk(jwk)
        .map_err(|e| JwksError::malformed(&format!("jwk {kid} could not be decoded: {e}")))?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_audience(&[expected_audience]);
    validation.set_issuer(&[expected_issuer]);
    // The library default leaves nbf unenforced; a token presented before
    // its nbf must be rejected, not silently accepted.
    validation.validate_nbf = true;

    let data = decode::<ExternalClaims>(token, &decoding_key, &validation)
        .map_err(|e| map_jsonwebtoken_error(e.kind()))?;

    Ok(data.claims)
}

fn map_jsonwebtoken_error(kind: &jsonwebtoken::errors::ErrorKind) -> JwksError {
    use jsonwebtoken::errors::ErrorKind;

    match kind {
        ErrorKind::ExpiredSignature => JwksError::token_expired("jwt exp claim is in the past"),
        ErrorKind::ImmatureSignature => {
            JwksError::token_not_yet_valid("jwt nbf claim is in the future")
        }
        ErrorKind::InvalidAudience => {
            JwksError::audience_mismatch("jwt aud claim does not match expected audience")
        }
        ErrorKind::InvalidIssuer => {
            JwksError::issuer_mismatch("jwt iss claim does not match expected issuer")
        }
        ErrorKind::InvalidSignature => {
            JwksError::bad_signature("jwt signature did not verify against the matched key")
        }
        other => JwksError::malformed(&format!("jwt validation failed: {other:?}")),
    }
}
