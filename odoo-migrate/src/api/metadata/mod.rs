//! Field metadata: models and `fields_get` parsing

pub mod models;

pub use models::{FieldDescriptor, FieldType};

use serde_json::Value;

use super::xmlrpc::RpcError;

/// Parse a `fields_get` response (`{name: {type: ..., ...}}`) in server order
pub fn parse_fields_get(response: &Value) -> Result<Vec<FieldDescriptor>, RpcError> {
    let fields = response.as_object().ok_or_else(|| {
        RpcError::UnexpectedResponse(format!("fields_get returned {} instead of a struct", kind_of(response)))
    })?;

    fields
        .iter()
        .map(|(name, attributes)| -> Result<FieldDescriptor, RpcError> {
            let tag = attributes
                .get("type")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    RpcError::UnexpectedResponse(format!("field '{}' has no type attribute", name))
                })?;
            Ok(FieldDescriptor {
                name: name.clone(),
                field_type: FieldType::from_tag(tag),
            })
        })
        .collect()
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "nil",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a struct",
    }
}
