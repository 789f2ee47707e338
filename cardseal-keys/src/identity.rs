//! Peer identity naming conventions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named peer whose key material is resolvable by convention-based
/// resource naming.
///
/// The identity string doubles as the certificate and keystore filename
/// stem; the keystore alias is always its lowercase form.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Certificate resource name, e.g. `supplierA.cer`.
    pub fn cert_resource(&self) -> String {
        format!("{}.cer", self.0)
    }

    /// Keystore resource name, e.g. `supplierA.jks`.
    pub fn keystore_resource(&self) -> String {
        format!("{}.jks", self.0)
    }

    /// Keystore alias for this identity.
    pub fn alias(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Identity {
    fn from(name: String) -> Self {
        Self(name)
    }
}
