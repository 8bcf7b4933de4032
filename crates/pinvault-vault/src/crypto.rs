// SPDX-FileCopyrightText: 2026 Pinvault Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PIN-based encryption of the stored secret.
//!
//! Payload layout, base64 (standard alphabet, padded):
//!
//! ```text
//! salt (16) || nonce (12) || AES-256-GCM ciphertext with 16-byte tag
//! ```
//!
//! The plaintext is `hex(random 16 bytes) ++ ':' ++ secret`, so even an
//! empty secret produces non-empty, non-repeating plaintext.
//!
//! Every call to [`seal`] generates a fresh random 96-bit nonce via the system
//! CSPRNG. Nonce reuse would be catastrophic for GCM security.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use secrecy::SecretString;
use tracing::debug;
use zeroize::Zeroizing;

use crate::error::VaultError;
use crate::kdf::{self, KEY_LEN, SALT_LEN};

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Random prefix length in bytes (before hex encoding).
pub const PREFIX_LEN: usize = 16;

/// Separates the random prefix from the secret inside the plaintext.
pub const SEPARATOR: char = ':';

/// Smallest decoded payload: salt, nonce and a bare tag.
pub const MIN_PAYLOAD_LEN: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Encrypt plaintext with AES-256-GCM using a random 96-bit nonce.
///
/// Returns `(ciphertext_with_tag, nonce_bytes)`.
pub fn seal(
    key: &[u8; KEY_LEN],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; NONCE_LEN]), VaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| VaultError::Crypto("failed to create AES-256-GCM key".to_string()))?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce_bytes: [u8; NONCE_LEN] = random_bytes()?;
    let nonce = Nonce::assume_unique_for_key(nonce_bytes);

    // Seal in place: plaintext buffer is extended with the authentication tag.
    let mut in_out = plaintext.to_vec();
    less_safe
        .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| VaultError::Crypto("AES-256-GCM encryption failed".to_string()))?;

    Ok((in_out, nonce_bytes))
}

/// Decrypt ciphertext with AES-256-GCM.
///
/// Any failure (wrong key, tampered data) is reported as
/// [`VaultError::InvalidPin`].
pub fn open(
    key: &[u8; KEY_LEN],
    nonce_bytes: &[u8; NONCE_LEN],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, VaultError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key).map_err(|_| VaultError::InvalidPin)?;
    let less_safe = LessSafeKey::new(unbound);

    let nonce = Nonce::assume_unique_for_key(*nonce_bytes);

    let mut in_out = Zeroizing::new(ciphertext.to_vec());
    let plaintext = less_safe
        .open_in_place(nonce, Aad::empty(), &mut in_out)
        .map_err(|_| VaultError::InvalidPin)?;

    Ok(Zeroizing::new(plaintext.to_vec()))
}

/// Encrypt `secret` under a key derived from `pin`, returning the encoded
/// payload.
pub fn encrypt_secret(secret: &str, pin: &str, iterations: u32) -> Result<String, VaultError> {
    let prefix: [u8; PREFIX_LEN] = random_bytes()?;
    let mut plaintext = Zeroizing::new(String::with_capacity(
        PREFIX_LEN * 2 + SEPARATOR.len_utf8() + secret.len(),
    ));
    plaintext.push_str(&hex::encode(prefix));
    plaintext.push(SEPARATOR);
    plaintext.push_str(secret);

    let salt = kdf::generate_salt()?;
    let key = kdf::derive_key(pin.as_bytes(), &salt, iterations)?;
    let (ciphertext, nonce) = seal(&key, plaintext.as_bytes())?;

    let mut payload = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    payload.extend_from_slice(&salt);
    payload.extend_from_slice(&nonce);
    payload.extend_from_slice(&ciphertext);
    Ok(STANDARD.encode(payload))
}

/// Decrypt a payload produced by [`encrypt_secret`].
///
/// Every failure collapses to [`VaultError::InvalidPin`]; the concrete
/// reason is only logged in debug builds.
pub fn decrypt_secret(payload: &str, pin: &str, iterations: u32) -> Result<SecretString, VaultError> {
    let decoded = STANDARD
        .decode(payload)
        .map_err(|_| rejected("payload is not valid base64"))?;
    if decoded.len() < MIN_PAYLOAD_LEN {
        return Err(rejected("payload too short"));
    }

    let (salt, rest) = decoded.split_at(SALT_LEN);
    let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
    let salt: &[u8; SALT_LEN] = salt
        .try_into()
        .map_err(|_| rejected("malformed salt"))?;
    let nonce: &[u8; NONCE_LEN] = nonce
        .try_into()
        .map_err(|_| rejected("malformed nonce"))?;

    let key = kdf::derive_key(pin.as_bytes(), salt, iterations)?;
    let plaintext = open(&key, nonce, ciphertext).map_err(|_| rejected("authentication failed"))?;
    let plaintext =
        std::str::from_utf8(&plaintext).map_err(|_| rejected("plaintext is not UTF-8"))?;

    let secret = match plaintext.split_once(SEPARATOR) {
        Some((_prefix, secret)) => secret,
        None => plaintext,
    };
    Ok(SecretString::from(secret.to_string()))
}

/// Whether `payload` decodes to something long enough to be a sealed secret.
pub fn is_well_formed_payload(payload: &str) -> bool {
    STANDARD
        .decode(payload)
        .map(|bytes| bytes.len() >= MIN_PAYLOAD_LEN)
        .unwrap_or(false)
}

fn random_bytes<const N: usize>() -> Result<[u8; N], VaultError> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; N];
    rng.fill(&mut bytes)
        .map_err(|_| VaultError::Crypto("failed to generate random bytes".to_string()))?;
    Ok(bytes)
}

fn rejected(reason: &'static str) -> VaultError {
    if cfg!(debug_assertions) {
        debug!(reason, "secret decryption rejected");
    }
    VaultError::InvalidPin
}
