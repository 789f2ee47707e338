//! Target field location inside a generic message body.

use crate::config::TargetSpec;
use crate::message::{Field, Message, OperationMetadata};

/// Finds the one field subject to transformation, if present.
///
/// The operation name comes from pipeline metadata, never from the body.
/// Returns `None` when the operation does not match, or when the field is
/// absent under a matching operation — both are pass-through conditions,
/// not errors. With duplicate field names, the first in document order
/// wins.
pub fn locate<'a>(
    message: &'a mut Message,
    metadata: &OperationMetadata,
    target: &TargetSpec,
) -> Option<&'a mut Field> {
    if metadata.operation != target.operation {
        return None;
    }
    message
        .body
        .fields
        .iter_mut()
        .find(|field| field.name == target.field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Field;

    fn target() -> TargetSpec {
        TargetSpec::default()
    }

    #[test]
    fn mismatched_operation_finds_nothing() {
        let mut message = Message::call(vec![Field::new("creditCardNr", "Li4u")]);
        let metadata = OperationMetadata::new("searchItems");

        assert!(locate(&mut message, &metadata, &target()).is_none());
    }

    #[test]
    fn absent_field_finds_nothing() {
        let mut message = Message::call(vec![Field::new("cartId", "Li4u")]);
        let metadata = OperationMetadata::new("buyCart");

        assert!(locate(&mut message, &metadata, &target()).is_none());
    }

    #[test]
    fn first_duplicate_wins() {
        let mut message = Message::call(vec![
            Field::new("creditCardNr", "Zmlyc3Q="),
            Field::new("creditCardNr", "c2Vjb25k"),
        ]);
        let metadata = OperationMetadata::new("buyCart");

        let field = locate(&mut message, &metadata, &target()).unwrap();
        field.value = "cmV3cml0dGVu".to_string();

        assert_eq!(message.body.fields[0].value, "cmV3cml0dGVu");
        assert_eq!(message.body.fields[1].value, "c2Vjb25k");
    }
}
