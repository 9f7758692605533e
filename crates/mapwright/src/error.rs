//! Mapping errors.
//!
//! [`MapperError`] is the base every failure converts into; callers match on
//! the variant when they care which stage failed.

use std::fmt;

use mapwright_schema::{BoxError, FieldType, ValueError};
use serde::Serialize;
use thiserror::Error;

pub use mapwright_schema::IntrospectionError;

/// Any failure raised while building or running a mapping.
#[derive(Debug, Error)]
pub enum MapperError {
    #[error(transparent)]
    Introspection(#[from] IntrospectionError),

    #[error(transparent)]
    Unmapped(#[from] MappingError),

    #[error(transparent)]
    Invalid(#[from] InvalidMappingError),
}

/// Fields left unaccounted for after auto-matching, explicit rules and exclusions.
///
/// Both lists are reported in full (introspection order) so a configuration can
/// be fixed in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error(
    "all fields need to be handled (mapping: {source_shape} => {target_shape}; \
     unmapped source fields: [{}]; unmapped target fields: [{}])",
    .unmapped_source.join(", "),
    .unmapped_target.join(", ")
)]
pub struct MappingError {
    pub source_shape: String,
    pub unmapped_source: Vec<String>,
    pub target_shape: String,
    pub unmapped_target: Vec<String>,
}

/// Which side of a mapping a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Source,
    Target,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// A rule that cannot be compiled, or a compiled rule that failed on a value.
#[derive(Debug, Error)]
pub enum InvalidMappingError {
    #[error("{side} shape '{shape}' has no field named '{field}'")]
    UnknownField {
        side: Side,
        shape: String,
        field: String,
    },

    #[error(
        "invalid mapping of '{source_shape}.{source_field}' ({source_type}) to \
         '{target_shape}.{target_field}' ({target_type}): no conversion between these types"
    )]
    IncompatibleTypes {
        source_shape: String,
        source_field: String,
        source_type: FieldType,
        target_shape: String,
        target_field: String,
        target_type: FieldType,
    },

    #[error("invalid mapping into '{shape}.{field}': field is read-only")]
    NotWritable { shape: String, field: String },

    #[error("invalid mapping of '{source_shape}.{source_field}' to '{target_shape}.{target_field}'")]
    Field {
        source_shape: String,
        source_field: String,
        target_shape: String,
        target_field: String,
        #[source]
        cause: ConversionError,
    },

    #[error("invalid mapping of '{source_shape}' to '{target_shape}': target construction failed")]
    Construction {
        source_shape: String,
        target_shape: String,
        #[source]
        cause: BoxError,
    },
}

/// A per-field conversion that failed at execution time.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("text is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error(transparent)]
    Value(#[from] ValueError),
}

pub type MapperResult<T> = std::result::Result<T, MapperError>;
