//! Identity-to-key-material resolution with per-identity caching.
//!
//! Which identity drives which lookup is correctness-critical, not
//! incidental: encryption always targets the *recipient's* public identity
//! (so only that recipient can decrypt), decryption always uses the local
//! node's own private identity. Getting the two backwards silently breaks
//! confidentiality rather than failing loudly, so they are deliberately
//! separate entry points.

use crate::certs;
use crate::error::{ConfigError, ConfigResult};
use crate::identity::Identity;
use crate::jks::Keystore;
use rsa::pkcs8::DecodePrivateKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::debug;
use zeroize::Zeroize;

/// Resolves peer identities to key material from a directory of
/// pre-provisioned resources (`<identity>.cer`, `<identity>.jks`).
///
/// Successful lookups are cached per identity and shared across concurrent
/// exchanges; failed lookups are never cached. The cache has no
/// invalidation — key rotation means restarting the node.
pub struct KeyResolver {
    resource_dir: PathBuf,
    public_keys: RwLock<HashMap<Identity, Arc<RsaPublicKey>>>,
    private_keys: RwLock<HashMap<Identity, Arc<RsaPrivateKey>>>,
}

impl KeyResolver {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            public_keys: RwLock::new(HashMap::new()),
            private_keys: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves the public key used to encrypt payloads *for* `identity`,
    /// from its `<identity>.cer` certificate resource.
    pub fn resolve_public_key(&self, identity: &Identity) -> ConfigResult<Arc<RsaPublicKey>> {
        // Fast path: already resolved.
        {
            let cache = self.public_keys.read().unwrap_or_else(|e| e.into_inner());
            if let Some(key) = cache.get(identity) {
                return Ok(Arc::clone(key));
            }
        }

        // Slow path: load and parse the certificate resource.
        let path = self.resource_dir.join(identity.cert_resource());
        let key = Arc::new(certs::load_public_key(&path)?);
        debug!("loaded public key for {identity} from {}", path.display());

        let mut cache = self.public_keys.write().unwrap_or_else(|e| e.into_inner());
        Ok(Arc::clone(cache.entry(identity.clone()).or_insert(key)))
    }

    /// Resolves the local node's private key from its `<identity>.jks`
    /// keystore resource, under the lowercase identity alias, both store
    /// and key protected by `secret`.
    pub fn resolve_private_key(
        &self,
        identity: &Identity,
        secret: &str,
    ) -> ConfigResult<Arc<RsaPrivateKey>> {
        // Fast path: the first successful resolution pins the key for the
        // process lifetime; the secret is not re-validated on cache hits.
        {
            let cache = self.private_keys.read().unwrap_or_else(|e| e.into_inner());
            if let Some(key) = cache.get(identity) {
                return Ok(Arc::clone(key));
            }
        }

        // Slow path: read, integrity-check, and unwrap the keystore entry.
        let path = self.resource_dir.join(identity.keystore_resource());
        let bytes = std::fs::read(&path).map_err(|source| ConfigError::KeystoreRead {
            path: path.clone(),
            source,
        })?;
        let store = Keystore::parse(&bytes, secret)?;
        let mut key_der = store.private_key_der(&identity.alias(), secret)?;

        let parsed = RsaPrivateKey::from_pkcs8_der(&key_der)
            .map_err(|e| ConfigError::PrivateKeyParse(e.to_string()));
        key_der.zeroize();
        let key = Arc::new(parsed?);
        debug!(
            "loaded private key for {identity} (alias {:?}) from {}",
            identity.alias(),
            path.display()
        );

        let mut cache = self.private_keys.write().unwrap_or_else(|e| e.into_inner());
        Ok(Arc::clone(cache.entry(identity.clone()).or_insert(key)))
    }
}
