//! HMAC signing for service-to-service event deliveries.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

pub const EVENT_TIMESTAMP_HEADER: &str = "x-event-timestamp";
pub const EVENT_SIGNATURE_HEADER: &str = "x-event-signature";

/// Deliveries older (or newer) than this many seconds are rejected.
pub const MAX_EVENT_SKEW_SECONDS: i64 = 300;

/// Generate HMAC-SHA256 signature
///
/// Format: HMAC-SHA256(timestamp|body_hash, secret)
pub fn generate_signature(
    secret: &str,
    timestamp: i64,
    body: &[u8],
) -> Result<String, anyhow::Error> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| anyhow::anyhow!("Invalid key length: {}", e))?;

    let body_hash = hex::encode(Sha256::digest(body));
    let payload = format!("{}|{}", timestamp, body_hash);

    mac.update(payload.as_bytes());
    let result = mac.finalize();

    Ok(hex::encode(result.into_bytes()))
}

/// Verify HMAC-SHA256 signature using constant-time comparison
pub fn verify_signature(
    secret: &str,
    timestamp: i64,
    body: &[u8],
    signature: &str,
) -> Result<bool, anyhow::Error> {
    let expected_signature = generate_signature(secret, timestamp, body)?;

    let expected_bytes = expected_signature.as_bytes();
    let signature_bytes = signature.as_bytes();

    if expected_bytes.len() != signature_bytes.len() {
        return Ok(false);
    }

    Ok(expected_bytes.ct_eq(signature_bytes).into())
}

pub fn is_fresh(timestamp: i64, now: i64) -> bool {
    (now - timestamp).abs() <= MAX_EVENT_SKEW_SECONDS
}
