//! HMAC-SHA256 webhook signature verification.
//!
//! All comparisons are constant-time; a mismatch and a malformed signature
//! are indistinguishable to the sender.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the lowercase hex HMAC-SHA256 of `body` under `secret`.
pub fn hmac_sha256_hex(secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a bare lowercase-hex HMAC-SHA256 signature against the raw body.
///
/// This is the Nango form: the `x-nango-hmac-sha256` header carries the hex
/// digest with no prefix.
pub fn verify_hex_digest(secret: &str, body: &[u8], signature: &str) -> bool {
    let expected = hmac_sha256_hex(secret, body);
    constant_time_eq(expected.as_bytes(), signature.trim().as_bytes())
}

/// Verifies a GitHub-style `sha256=<hex>` signature against the raw body.
///
/// The `x-hub-signature-256` header carries the digest with a `sha256=`
/// prefix; anything without the prefix fails.
pub fn verify_github_digest(secret: &str, body: &[u8], signature: &str) -> bool {
    let Some(digest) = signature.trim().strip_prefix("sha256=") else {
        return false;
    };
    let expected = hmac_sha256_hex(secret, body);
    constant_time_eq(expected.as_bytes(), digest.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "shh-very-secret";
    const BODY: &[u8] = br#"{"connectionId":"conn-1","payload":{"id":"LIN-9"}}"#;

    #[test]
    fn hex_digest_roundtrip() {
        let signature = hmac_sha256_hex(SECRET, BODY);
        assert!(verify_hex_digest(SECRET, BODY, &signature));
        assert!(verify_hex_digest(SECRET, BODY, &format!("  {signature} ")));
    }

    #[test]
    fn hex_digest_rejects_tampering() {
        let signature = hmac_sha256_hex(SECRET, BODY);
        assert!(!verify_hex_digest(SECRET, b"{}", &signature));
        assert!(!verify_hex_digest("other-secret", BODY, &signature));
        assert!(!verify_hex_digest(SECRET, BODY, "deadbeef"));
    }

    #[test]
    fn github_digest_requires_prefix() {
        let digest = hmac_sha256_hex(SECRET, BODY);
        assert!(verify_github_digest(SECRET, BODY, &format!("sha256={digest}")));
        assert!(!verify_github_digest(SECRET, BODY, &digest));
        assert!(!verify_github_digest(SECRET, BODY, &format!("sha1={digest}")));
    }
}
