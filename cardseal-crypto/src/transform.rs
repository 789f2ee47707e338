//! RSA PKCS#1 v1.5 encrypt/decrypt over byte buffers.
//!
//! Both operations are pure functions of (key, bytes) apart from the
//! random padding drawn from the OS generator, so two encryptions of the
//! same payload yield different ciphertexts that decrypt identically.

use crate::error::{CryptoError, CryptoResult};
use rsa::traits::PublicKeyParts;
use rsa::{Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};

/// PKCS#1 v1.5 padding overhead in bytes.
const PKCS1_OVERHEAD: usize = 11;

/// Largest plaintext a single RSA block can carry under this key.
pub fn max_payload_len(key: &RsaPublicKey) -> usize {
    key.size().saturating_sub(PKCS1_OVERHEAD)
}

/// Encrypts `plaintext` for the holder of the private key matching `key`.
///
/// Oversized payloads are rejected up front rather than truncated or left
/// to surface as an opaque cipher fault.
pub fn encrypt(key: &RsaPublicKey, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let max = max_payload_len(key);
    if plaintext.len() > max {
        return Err(CryptoError::PayloadTooLarge {
            max,
            actual: plaintext.len(),
        });
    }

    key.encrypt(&mut rand::rngs::OsRng, Pkcs1v15Encrypt, plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))
}

/// Decrypts a ciphertext produced by [`encrypt`] with the matching public key.
pub fn decrypt(key: &RsaPrivateKey, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    key.decrypt(Pkcs1v15Encrypt, ciphertext)
        .map_err(|e| CryptoError::Decryption(e.to_string()))
}
