//! Interceptor error taxonomy.
//!
//! Nothing here is recovered locally: every error aborts the current
//! message exchange only and surfaces to the invoking pipeline as a fault
//! for that exchange. Non-matching operations and absent target fields are
//! silent pass-throughs, never errors.

use thiserror::Error;

/// Result type for interceptor passes.
pub type InterceptResult<T> = Result<T, InterceptError>;

/// Errors that abort a message exchange.
#[derive(Debug, Error)]
pub enum InterceptError {
    /// The pass lacks structure the pipeline contract promises (missing
    /// operation metadata, non-base64 field text).
    #[error("pipeline contract violated: {0}")]
    Protocol(String),

    /// Key material for the current peer identity could not be resolved.
    #[error("key configuration error: {0}")]
    Config(#[from] cardseal_keys::ConfigError),

    /// The cipher rejected the payload.
    #[error("crypto error: {0}")]
    Crypto(#[from] cardseal_crypto::CryptoError),
}
