//! Interceptor configuration.
//!
//! An explicit immutable value passed to the interceptor at construction —
//! identity and secret management stays testable without process-wide
//! mutable state.

use cardseal_keys::Identity;
use serde::{Deserialize, Serialize};

/// The single (operation, field) pair subject to transformation.
///
/// Fixed at interceptor construction, not per-message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub operation: String,
    pub field: String,
}

impl Default for TargetSpec {
    /// The payment-card parameter of the cart purchase call.
    fn default() -> Self {
        Self {
            operation: "buyCart".to_string(),
            field: "creditCardNr".to_string(),
        }
    }
}

/// Identity and secret configuration for one deployed node.
///
/// Outbound payloads are encrypted for `destination`'s public key; inbound
/// payloads are decrypted with `local`'s private key. The key choice is
/// driven by direction alone, which assumes the interceptor is deployed
/// symmetrically at both ends with consistent identity naming.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Remote peer whose certificate encrypts outbound payloads.
    pub destination: Identity,
    /// Local node whose keystore decrypts inbound payloads.
    pub local: Identity,
    /// Secret protecting the local keystore and its key entries.
    pub secret: String,
    /// The one field subject to transformation.
    pub target: TargetSpec,
}

impl SecurityConfig {
    pub fn new(
        destination: impl Into<Identity>,
        local: impl Into<Identity>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            destination: destination.into(),
            local: local.into(),
            secret: secret.into(),
            target: TargetSpec::default(),
        }
    }

    /// Overrides the default target pair.
    pub fn with_target(mut self, target: TargetSpec) -> Self {
        self.target = target;
        self
    }
}
