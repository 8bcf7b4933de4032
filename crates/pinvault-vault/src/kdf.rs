// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from a PIN.
//!
//! The derived 32-byte key is wrapped in [`Zeroizing`] and only ever handed
//! to the cipher; it is never persisted or returned to callers outside this
//! crate's crypto module.

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use zeroize::Zeroizing;

use crate::error::VaultError;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;

/// Derived key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Derive a 32-byte AES key from `pin` and `salt`.
pub fn derive_key(
    pin: &[u8],
    salt: &[u8; SALT_LEN],
    iterations: u32,
) -> Result<Zeroizing<[u8; KEY_LEN]>, VaultError> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| VaultError::Crypto("KDF iteration count must be non-zero".to_string()))?;

    let mut output = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        pin,
        output.as_mut(),
    );
    Ok(output)
}

/// Generate a random 16-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], VaultError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| VaultError::Crypto("failed to generate random salt".to_string()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low iteration count for fast tests.
    const ITERS: u32 = 1_000;

    #[test]
    fn derive_key_is_deterministic() {
        let salt = [1u8; SALT_LEN];
        let key1 = derive_key(b"1234", &salt, ITERS).unwrap();
        let key2 = derive_key(b"1234", &salt, ITERS).unwrap();
        assert_eq!(*key1, *key2);
    }

    #[test]
    fn different_pin_gives_different_key() {
        let salt = [2u8; SALT_LEN];
        let key1 = derive_key(b"1234", &salt, ITERS).unwrap();
        let key2 = derive_key(b"4321", &salt, ITERS).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn different_salt_gives_different_key() {
        let key1 = derive_key(b"1234", &[1u8; SALT_LEN], ITERS).unwrap();
        let key2 = derive_key(b"1234", &[2u8; SALT_LEN], ITERS).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn iteration_count_changes_key() {
        let salt = [3u8; SALT_LEN];
        let key1 = derive_key(b"1234", &salt, ITERS).unwrap();
        let key2 = derive_key(b"1234", &salt, ITERS + 1).unwrap();
        assert_ne!(*key1, *key2);
    }

    #[test]
    fn zero_iterations_rejected() {
        let err = derive_key(b"1234", &[0u8; SALT_LEN], 0).unwrap_err();
        assert!(matches!(err, VaultError::Crypto(_)));
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
