//! Key material resolution for cardseal.
//!
//! Maps peer identity names to cryptographic key material under a
//! convention-based, pre-provisioned resource layout:
//!
//! - `<identity>.cer` — X.509 certificate; its public key encrypts payloads
//!   addressed *to* that peer
//! - `<identity>.jks` — keystore protected by a secret; the private key for
//!   payloads addressed to the local node lives under the lowercase
//!   identity alias
//!
//! All file access is blocking and confined to this crate. Resolved key
//! material is cached per identity behind a concurrency-safe cache; the
//! cache is never invalidated (key rotation is a deployment concern).

pub mod certs;
pub mod error;
pub mod identity;
pub mod jks;
pub mod resolver;
#[cfg(any(test, feature = "test-util"))]
pub mod test_support;

pub use error::{ConfigError, ConfigResult};
pub use identity::Identity;
pub use resolver::KeyResolver;

pub use rsa::{RsaPrivateKey, RsaPublicKey};
