//! Static API key check for machine-to-machine endpoints.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compare a presented key against the configured one in constant time.
///
/// Both values are reduced to HMAC-SHA256 tags under a fixed key and the tags
/// are compared with `verify_slice`, so neither content nor length leaks
/// through timing. A missing configured key rejects every caller.
pub fn api_key_matches(presented: &str, configured: Option<&str>) -> bool {
    let Some(configured) = configured else {
        return false;
    };
    if presented.is_empty() {
        return false;
    }

    let Ok(mut expected) = HmacSha256::new_from_slice(b"myorder-api-key") else {
        return false;
    };
    expected.update(configured.as_bytes());
    let expected = expected.finalize().into_bytes();

    let Ok(mut actual) = HmacSha256::new_from_slice(b"myorder-api-key") else {
        return false;
    };
    actual.update(presented.as_bytes());
    actual.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_key_is_accepted() {
        assert!(api_key_matches("k-123", Some("k-123")));
    }

    #[test]
    fn wrong_key_is_rejected() {
        assert!(!api_key_matches("k-124", Some("k-123")));
        assert!(!api_key_matches("k-123-extra", Some("k-123")));
    }

    #[test]
    fn unconfigured_key_rejects_everything() {
        assert!(!api_key_matches("anything", None));
    }

    #[test]
    fn empty_presented_key_is_rejected() {
        assert!(!api_key_matches("", Some("")));
    }
}
