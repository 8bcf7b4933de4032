// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SHA-256 fingerprint of the cleartext secret.

use sha2::{Digest, Sha256};

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Lowercase hex SHA-256 of the UTF-8 bytes of `secret`.
pub fn digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Whether `secret` hashes to `expected`.
pub fn verify(secret: &str, expected: &str) -> bool {
    digest(secret) == expected
}

/// Whether `value` looks like a digest produced by [`digest`].
pub fn is_well_formed(value: &str) -> bool {
    value.len() == DIGEST_HEX_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vector() {
        assert_eq!(
            digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn verify_matches_only_same_secret() {
        let d = digest("sk-test");
        assert!(verify("sk-test", &d));
        assert!(!verify("sk-tesT", &d));
    }

    #[test]
    fn well_formed_checks() {
        assert!(is_well_formed(&digest("x")));
        assert!(!is_well_formed("abc"));
        assert!(!is_well_formed(&digest("x").to_uppercase()));
        assert!(!is_well_formed(&"g".repeat(DIGEST_HEX_LEN)));
    }
}
