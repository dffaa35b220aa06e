//! Secret comparison for login.
//!
//! Both sides are SHA-256 digested before the constant-time comparison, so
//! the running time depends neither on where the inputs first differ nor on
//! their lengths.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// True only when `stored` is present, non-empty and equal to `provided`.
pub fn secrets_match(provided: &str, stored: Option<&str>) -> bool {
    let stored = stored.unwrap_or_default();
    let lhs = Sha256::digest(provided.as_bytes());
    let rhs = Sha256::digest(stored.as_bytes());
    let equal: bool = lhs.as_slice().ct_eq(rhs.as_slice()).into();
    equal & !stored.is_empty()
}

/// Burn one comparison when there is no candidate to compare against.
pub fn dummy_compare(provided: &str) {
    std::hint::black_box(secrets_match(provided, None));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_secrets_match() {
        assert!(secrets_match("pw1", Some("pw1")));
    }

    #[test]
    fn different_secrets_do_not_match() {
        assert!(!secrets_match("wrong", Some("pw1")));
        assert!(!secrets_match("pw1x", Some("pw1")));
        assert!(!secrets_match("PW1", Some("pw1")));
    }

    #[test]
    fn missing_or_empty_stored_secret_never_matches() {
        assert!(!secrets_match("", None));
        assert!(!secrets_match("", Some("")));
        assert!(!secrets_match("anything", None));
    }
}
