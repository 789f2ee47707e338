//! Pipeline hook contract.

use crate::error::InterceptResult;
use crate::message::{Direction, Message, OperationMetadata};

/// A per-message hook invoked by the pipeline for both directions and for
/// fault passes.
///
/// Implementations are shared across concurrent exchanges as
/// `Arc<dyn MessageHandler>` and must not keep per-message state. An `Err`
/// aborts the current exchange only; the message is not returned.
pub trait MessageHandler: Send + Sync {
    /// Processes one message pass, returning the (possibly rewritten)
    /// message.
    fn on_message(
        &self,
        direction: Direction,
        message: Message,
        metadata: Option<&OperationMetadata>,
    ) -> InterceptResult<Message>;

    /// Processes a fault pass. Faults are never transformed.
    fn on_fault(&self, message: Message) -> Message {
        message
    }
}

/// No-op handler: every pass comes back unchanged. A pipeline baseline for
/// tests.
pub struct PassthroughHandler;

impl MessageHandler for PassthroughHandler {
    fn on_message(
        &self,
        _direction: Direction,
        message: Message,
        _metadata: Option<&OperationMetadata>,
    ) -> InterceptResult<Message> {
        Ok(message)
    }
}
