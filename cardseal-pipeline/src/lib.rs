//! Selective field-level encryption for the mediator message pipeline.
//!
//! Most of a message passes through the pipeline untouched; exactly one
//! operation (`buyCart`) carries one parameter (`creditCardNr`) that must
//! travel encrypted end-to-end. The interceptor here detects direction,
//! locates that single field inside an otherwise generic body, resolves
//! key material for the current peer identity (`cardseal-keys`), applies
//! the asymmetric transform (`cardseal-crypto`), and rewrites the field in
//! place — every sibling stays byte-for-byte intact.
//!
//! # Architecture
//!
//! - [`message`] — the generic message tree the pipeline moves around
//! - [`locator`] — pure query for the one targeted field
//! - [`config`] — immutable per-node identity/secret/target configuration
//! - [`interceptor`] — the orchestrating [`MessageHandler`] implementation

pub mod config;
pub mod error;
pub mod handler;
pub mod interceptor;
pub mod locator;
pub mod message;

pub use config::{SecurityConfig, TargetSpec};
pub use error::{InterceptError, InterceptResult};
pub use handler::{MessageHandler, PassthroughHandler};
pub use interceptor::EncryptionInterceptor;
pub use message::{Body, Direction, Field, Message, MessageKind, OperationMetadata};
