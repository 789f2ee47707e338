//! The selective encryption interceptor.
//!
//! Per pass: detect direction, match the operation, locate the target
//! field, resolve key material for the current peer identity, transform
//! the payload, rewrite the field in place. Any non-match is a silent
//! pass-through; any failure aborts the current exchange only.

use crate::config::SecurityConfig;
use crate::error::{InterceptError, InterceptResult};
use crate::handler::MessageHandler;
use crate::locator;
use crate::message::{Direction, Message, OperationMetadata};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use cardseal_keys::KeyResolver;
use tracing::{debug, warn};

/// Encrypts the target field outbound and decrypts it inbound, passing
/// everything else through untouched.
///
/// Stateless across passes: mutation is confined to the message under
/// transformation, so one instance serves concurrent exchanges.
pub struct EncryptionInterceptor {
    config: SecurityConfig,
    keys: KeyResolver,
}

impl EncryptionInterceptor {
    /// `keys` must be able to resolve the configured destination and local
    /// identities from its resource directory.
    pub fn new(config: SecurityConfig, keys: KeyResolver) -> Self {
        Self { config, keys }
    }

    pub fn config(&self) -> &SecurityConfig {
        &self.config
    }

    /// Key resolution comes first: a misconfigured node must abort before
    /// the field text is even touched.
    fn transform(
        &self,
        direction: Direction,
        field_name: &str,
        value: &str,
    ) -> InterceptResult<Vec<u8>> {
        match direction {
            Direction::Outbound => {
                // Encrypt for the recipient: only the destination peer's
                // private key can recover the payload.
                let key = self.keys.resolve_public_key(&self.config.destination)?;
                let payload = decode_field(field_name, value)?;
                Ok(cardseal_crypto::encrypt(&key, &payload)?)
            }
            Direction::Inbound => {
                // Decrypt with the local node's own private key.
                let key = self
                    .keys
                    .resolve_private_key(&self.config.local, &self.config.secret)?;
                let payload = decode_field(field_name, value)?;
                Ok(cardseal_crypto::decrypt(&key, &payload)?)
            }
        }
    }
}

fn decode_field(field_name: &str, value: &str) -> InterceptResult<Vec<u8>> {
    BASE64.decode(value).map_err(|e| {
        InterceptError::Protocol(format!("field {field_name:?} is not valid base64: {e}"))
    })
}

impl MessageHandler for EncryptionInterceptor {
    fn on_message(
        &self,
        direction: Direction,
        mut message: Message,
        metadata: Option<&OperationMetadata>,
    ) -> InterceptResult<Message> {
        if message.is_fault() {
            return Ok(message);
        }

        let metadata = metadata.ok_or_else(|| {
            InterceptError::Protocol("message pass carries no operation metadata".to_string())
        })?;

        let Some(field) = locator::locate(&mut message, metadata, &self.config.target) else {
            // Not the targeted operation, or the optional field is absent:
            // pass through unmodified.
            return Ok(message);
        };

        debug!(
            "transforming field {:?} of operation {:?} ({direction:?})",
            field.name, metadata.operation
        );
        let rewritten = self
            .transform(direction, &field.name, &field.value)
            .map_err(|e| {
                warn!("aborting exchange: {e}");
                e
            })?;
        field.value = BASE64.encode(rewritten);

        Ok(message)
    }
}
