//! Per-field conversion strategies.
//!
//! Every compiled rule runs exactly one [`Conversion`]. The strategy is picked
//! once, from the declared field types, with a fixed precedence:
//!
//! 1. text -> binary: base64 decode
//! 2. binary -> text: base64 encode
//! 3. `T` -> `Option<T>`: wrap
//! 4. `Option<T>` -> `T`: unwrap, absent becomes `T::default()`
//! 5. identical types: copy
//!
//! Anything else has no conversion and is rejected when the mapping is built.

use std::fmt;
use std::sync::Arc;

use base64::{engine::general_purpose, Engine as _};
use mapwright_schema::{downcast, AnyValue, FieldDescriptor, FieldType};
use serde::Serialize;

use crate::error::ConversionError;

/// A resolved conversion, applied to one field value per call.
pub type ValueConverter = Arc<dyn Fn(AnyValue) -> ConversionResult + Send + Sync>;

type ConversionResult = Result<AnyValue, ConversionError>;

/// The strategy used to move a value from a source field into a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Conversion {
    Base64Decode,
    Base64Encode,
    WrapNullable,
    UnwrapNullable,
    Identity,
}

impl Conversion {
    /// Pick the conversion for `source` => `target`, `None` when there is none.
    pub fn resolve(source: &FieldType, target: &FieldType) -> Option<Conversion> {
        match (source, target) {
            (FieldType::Text, FieldType::Binary) => Some(Conversion::Base64Decode),
            (FieldType::Binary, FieldType::Text) => Some(Conversion::Base64Encode),
            (source, FieldType::Nullable(inner))
                if source.is_value_type() && inner.as_ref() == source =>
            {
                Some(Conversion::WrapNullable)
            }
            (FieldType::Nullable(inner), target)
                if target.is_value_type() && inner.as_ref() == target =>
            {
                Some(Conversion::UnwrapNullable)
            }
            (source, target) if source == target => Some(Conversion::Identity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Conversion::Base64Decode => "base64_decode",
            Conversion::Base64Encode => "base64_encode",
            Conversion::WrapNullable => "wrap_nullable",
            Conversion::UnwrapNullable => "unwrap_nullable",
            Conversion::Identity => "identity",
        }
    }

    /// Build the converter closure for this strategy. Nullable conversions use the
    /// typed helpers of the source field.
    pub fn converter<S: 'static>(&self, source_field: &FieldDescriptor<S>) -> ValueConverter {
        match self {
            Conversion::Base64Decode => Arc::new(|value: AnyValue| -> ConversionResult {
                let text = downcast::<String>(value)?;
                let bytes: AnyValue = Box::new(decode_base64(&text)?);
                Ok(bytes)
            }),
            Conversion::Base64Encode => Arc::new(|value: AnyValue| -> ConversionResult {
                let bytes = downcast::<Vec<u8>>(value)?;
                let text: AnyValue = Box::new(encode_base64(&bytes));
                Ok(text)
            }),
            Conversion::WrapNullable => {
                let wrap = source_field.wrap_fn();
                Arc::new(move |value: AnyValue| -> ConversionResult { Ok(wrap(value)?) })
            }
            Conversion::UnwrapNullable => {
                let unwrap = source_field.unwrap_fn();
                Arc::new(move |value: AnyValue| -> ConversionResult { Ok(unwrap(value)?) })
            }
            Conversion::Identity => Arc::new(|value: AnyValue| -> ConversionResult { Ok(value) }),
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Encode bytes as standard, padded base64.
pub fn encode_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode standard, padded base64 text.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(text)
}
