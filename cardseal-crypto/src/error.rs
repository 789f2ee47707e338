//! Crypto layer error types.

use thiserror::Error;

/// Result type for transform operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors from the asymmetric transform layer.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The plaintext does not fit in a single RSA block for this key.
    #[error("payload of {actual} bytes exceeds the key's {max}-byte limit")]
    PayloadTooLarge { max: usize, actual: usize },

    /// The cipher rejected the encryption input or failed internally.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// The cipher rejected the ciphertext (malformed, truncated, or
    /// produced for a different key).
    #[error("decryption failed: {0}")]
    Decryption(String),
}
