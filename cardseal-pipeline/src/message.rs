//! Pipeline message model.
//!
//! Messages are a deliberately generic tree: one body root holding an
//! ordered sequence of named fields whose values are base64 text. The
//! interceptor assumes no richer shape — whatever it does not transform
//! passes through untouched.

use serde::{Deserialize, Serialize};

/// Direction of a message pass.
///
/// Supplied by the invoking pipeline once per pass; never derivable from
/// message content alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Outbound,
    Inbound,
}

/// Whether a pass carries a normal call or a fault raised by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Call,
    Fault,
}

/// A named field node carrying base64 text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The body root: an ordered sequence of field nodes.
///
/// Field names are not guaranteed unique within one operation's parameter
/// list; document order is significant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    pub fields: Vec<Field>,
}

/// One message moving through the pipeline.
///
/// Transient: created per exchange by the pipeline and discarded after.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub kind: MessageKind,
    pub body: Body,
}

impl Message {
    /// A normal call message with the given parameter fields.
    pub fn call(fields: Vec<Field>) -> Self {
        Self {
            kind: MessageKind::Call,
            body: Body { fields },
        }
    }

    /// A fault message. Faults are never transformed.
    pub fn fault() -> Self {
        Self {
            kind: MessageKind::Fault,
            body: Body::default(),
        }
    }

    pub fn is_fault(&self) -> bool {
        self.kind == MessageKind::Fault
    }
}

/// Operation name the pipeline attaches to a pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationMetadata {
    pub operation: String,
}

impl OperationMetadata {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_serialization_roundtrip() {
        let message = Message::call(vec![
            Field::new("cartId", "Y2FydC0x"),
            Field::new("creditCardNr", "NDExMTExMTExMTExMTExMQ=="),
        ]);

        let json = serde_json::to_string(&message).unwrap();
        let back: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(back, message);
    }
}
