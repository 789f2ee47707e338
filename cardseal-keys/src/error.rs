//! Key resolution error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for key resolution.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while resolving identity key material.
///
/// Every variant is a configuration or provisioning problem: the exchange
/// that triggered the lookup is aborted, nothing is retried here.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The certificate resource is absent or unreadable.
    #[error("cannot read certificate resource {path}")]
    CertificateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The certificate resource is not a parseable X.509 certificate with
    /// an RSA public key.
    #[error("certificate resource {path} is malformed: {reason}")]
    CertificateParse { path: PathBuf, reason: String },

    /// The keystore resource is absent or unreadable.
    #[error("cannot read keystore resource {path}")]
    KeystoreRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The keystore bytes do not follow the JKS layout.
    #[error("keystore layout is invalid: {0}")]
    KeystoreFormat(String),

    /// The store or entry digest does not verify under the given secret.
    #[error("keystore tampered with, or secret incorrect")]
    KeystoreIntegrity,

    /// No private key entry exists under the requested alias.
    #[error("keystore has no private key under alias {alias:?}")]
    AliasNotFound { alias: String },

    /// The recovered key bytes are not a valid PKCS#8 RSA private key.
    #[error("recovered private key is malformed: {0}")]
    PrivateKeyParse(String),
}
