//! Request signing for the AliExpress open-platform gateway.

use std::collections::BTreeMap;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Value sent as `sign_method` alongside every signed request.
pub(crate) const SIGN_METHOD: &str = "sha256";

/// Computes the `sign` parameter for a request.
///
/// Parameters are concatenated as `key1value1key2value2...` in ascending key
/// order (guaranteed by the `BTreeMap`), then authenticated with HMAC-SHA256
/// keyed by the app secret. The digest is rendered as uppercase hex.
pub(crate) fn sign_params(app_secret: &str, params: &BTreeMap<String, String>) -> String {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes())
        .expect("HMAC-SHA256 accepts keys of any length");
    for (key, value) in params {
        mac.update(key.as_bytes());
        mac.update(value.as_bytes());
    }
    hex::encode_upper(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn signature_is_uppercase_hex_sha256() {
        let sig = sign_params("secret", &params(&[("app_key", "123"), ("v", "2.0")]));
        assert_eq!(sig.len(), 64);
        assert!(sig
            .chars()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn signature_is_deterministic() {
        let p = params(&[("method", "aliexpress.affiliate.link.generate"), ("timestamp", "1")]);
        assert_eq!(sign_params("s", &p), sign_params("s", &p));
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = params(&[("b", "2"), ("a", "1"), ("c", "3")]);
        let b = params(&[("c", "3"), ("a", "1"), ("b", "2")]);
        assert_eq!(sign_params("s", &a), sign_params("s", &b));
    }

    #[test]
    fn different_secret_changes_signature() {
        let p = params(&[("a", "1")]);
        assert_ne!(sign_params("one", &p), sign_params("two", &p));
    }

    #[test]
    fn matches_hmac_of_sorted_concatenation() {
        let p = params(&[("z", "last"), ("a", "first")]);
        let mut mac = HmacSha256::new_from_slice(b"key").unwrap();
        mac.update(b"afirstzlast");
        let expected = hex::encode_upper(mac.finalize().into_bytes());
        assert_eq!(sign_params("key", &p), expected);
    }
}
