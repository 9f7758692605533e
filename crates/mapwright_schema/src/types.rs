//! Field type tags.
//!
//! Every field of a shape carries a [`FieldType`]. The mapper only ever looks at
//! these tags when it pairs fields and picks conversions; the actual values stay
//! behind type-erased accessors.

use std::any::TypeId;
use std::fmt;

// ============================================================================
// Field Types (Canonical Definition)
// ============================================================================

/// Semantic type of a field.
///
/// Two fields hold the same Rust type if and only if their tags compare equal:
/// primitives, text and binary map to exactly one Rust type each, nullable tags
/// wrap their inner tag, and opaque tags compare by `TypeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Plain value type (integers, floats, bool, char, uuid, dates)
    Primitive(Primitive),

    /// UTF-8 text (`String`)
    Text,

    /// Binary blob (`Vec<u8>`)
    Binary,

    /// Nullable value (`Option<T>`)
    Nullable(Box<FieldType>),

    /// Any other value (nested records, collections). Only copied verbatim.
    Opaque(OpaqueType),
}

impl FieldType {
    /// Nullable tag wrapping `inner`.
    pub fn nullable(inner: FieldType) -> Self {
        FieldType::Nullable(Box::new(inner))
    }

    /// Opaque tag for the Rust type `T`.
    pub fn opaque<T: 'static>() -> Self {
        FieldType::Opaque(OpaqueType::of::<T>())
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, FieldType::Nullable(_))
    }

    /// The wrapped tag of a nullable, `None` for everything else.
    pub fn nullable_inner(&self) -> Option<&FieldType> {
        match self {
            FieldType::Nullable(inner) => Some(inner),
            _ => None,
        }
    }

    /// True for tags that can be wrapped into (or unwrapped from) a nullable.
    pub fn is_value_type(&self) -> bool {
        matches!(
            self,
            FieldType::Primitive(_) | FieldType::Text | FieldType::Binary
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Primitive(primitive) => write!(f, "{}", primitive),
            FieldType::Text => write!(f, "text"),
            FieldType::Binary => write!(f, "binary"),
            FieldType::Nullable(inner) => write!(f, "nullable<{}>", inner),
            FieldType::Opaque(opaque) => write!(f, "opaque({})", opaque.type_name()),
        }
    }
}

/// Primitive value types with first-class field support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Char,
    /// `uuid::Uuid`
    Uuid,
    /// `chrono::NaiveDate`
    Date,
    /// `chrono::DateTime<Utc>`
    Timestamp,
}

impl Primitive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::I8 => "i8",
            Primitive::I16 => "i16",
            Primitive::I32 => "i32",
            Primitive::I64 => "i64",
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::F32 => "f32",
            Primitive::F64 => "f64",
            Primitive::Char => "char",
            Primitive::Uuid => "uuid",
            Primitive::Date => "date",
            Primitive::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identity of an opaque field type.
#[derive(Debug, Clone, Copy)]
pub struct OpaqueType {
    id: TypeId,
    type_name: &'static str,
}

impl OpaqueType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// Names are diagnostics only; identity is the TypeId.
impl PartialEq for OpaqueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for OpaqueType {}

impl std::hash::Hash for OpaqueType {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Child;
    struct Kid;

    #[test]
    fn test_nullable_inner() {
        let tag = FieldType::nullable(FieldType::Primitive(Primitive::I64));
        assert!(tag.is_nullable());
        assert_eq!(
            tag.nullable_inner(),
            Some(&FieldType::Primitive(Primitive::I64))
        );
        assert_eq!(FieldType::Text.nullable_inner(), None);
    }

    #[test]
    fn test_opaque_identity_is_type_id() {
        assert_eq!(FieldType::opaque::<Child>(), FieldType::opaque::<Child>());
        assert_ne!(FieldType::opaque::<Child>(), FieldType::opaque::<Kid>());
        assert!(!FieldType::opaque::<Child>().is_value_type());
    }

    #[test]
    fn test_display() {
        assert_eq!(FieldType::Primitive(Primitive::Uuid).to_string(), "uuid");
        assert_eq!(
            FieldType::nullable(FieldType::Primitive(Primitive::I32)).to_string(),
            "nullable<i32>"
        );
        assert_eq!(FieldType::Binary.to_string(), "binary");
        assert!(FieldType::opaque::<Child>().to_string().contains("Child"));
    }
}
