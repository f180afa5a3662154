//! Create payload construction
//!
//! Maps a declaration's attribute bag onto the wire shape the remote create
//! endpoint expects, following the kind's payload field list. Attributes not
//! listed for the kind are stripped; listed attributes that were not
//! declared are omitted unless the field has a default.

use crate::catalog::{FieldShape, Missing, ResourceDescriptor, display_path, lookup};
use crate::error::{Error, Result};
use serde_json::{Map, Value};

/// Build the create payload for a declaration
///
/// Pure function of the descriptor and the declared attributes. A `null`
/// attribute counts as not declared.
pub fn build_create_payload(descriptor: &ResourceDescriptor, declared: &Value) -> Result<Value> {
    let mut payload = Map::new();

    for field in descriptor.payload {
        let value = match lookup(declared, field.source) {
            Some(Value::Null) | None => match field.missing {
                Missing::Omit => continue,
                Missing::EmptyList => Value::Array(Vec::new()),
            },
            Some(value) => reshape(descriptor, field.source, field.shape, value)?,
        };
        payload.insert(field.name.to_string(), value);
    }

    Ok(Value::Object(payload))
}

fn reshape(
    descriptor: &ResourceDescriptor,
    source: &[&str],
    shape: FieldShape,
    value: &Value,
) -> Result<Value> {
    match shape {
        FieldShape::AsIs => Ok(value.clone()),
        FieldShape::WrapEach(key) => {
            let elements = value.as_array().ok_or_else(|| {
                Error::declaration(format!(
                    "{} attribute '{}' must be a list, got: {}",
                    descriptor.name,
                    display_path(source),
                    value
                ))
            })?;
            Ok(wrap_each(elements, key))
        }
    }
}

/// Wrap every element as a single-key record, preserving order
///
/// `["10.0.0.0/24"]` with key `network` becomes `[{"network": "10.0.0.0/24"}]`.
pub fn wrap_each(elements: &[Value], key: &str) -> Value {
    Value::Array(
        elements
            .iter()
            .map(|element| {
                let mut record = Map::new();
                record.insert(key.to_string(), element.clone());
                Value::Object(record)
            })
            .collect(),
    )
}
