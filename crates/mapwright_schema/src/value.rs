//! Type-erased field values.
//!
//! Accessors move values in and out of shapes as [`AnyValue`]. The typed side of
//! a field is described by [`FieldValue`], which also supplies the nullable
//! wrap/unwrap helpers for the field's concrete type.

use std::any::{type_name, Any};

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::types::{FieldType, Primitive};

/// A field value with its concrete type erased.
pub type AnyValue = Box<dyn Any + Send>;

/// Converts one erased value into another.
pub type ConvertFn = fn(AnyValue) -> Result<AnyValue, ValueError>;

/// Errors raised while moving erased values between fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("expected a value of type '{expected}'")]
    TypeMismatch { expected: &'static str },

    #[error("type '{type_name}' cannot be converted {direction} a nullable")]
    NotConvertible {
        type_name: &'static str,
        direction: &'static str,
    },

    #[error("field is read-only")]
    ReadOnly,
}

/// Recover the concrete value from an erased one.
pub fn downcast<T: 'static>(value: AnyValue) -> Result<T, ValueError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| ValueError::TypeMismatch {
            expected: type_name::<T>(),
        })
}

/// A Rust type with a non-opaque [`FieldType`].
pub trait FieldValue: Clone + Send + Sync + 'static {
    fn field_type() -> FieldType;

    /// Box a `Self` into a present `Option<Self>`.
    fn wrap_nullable(value: AnyValue) -> Result<AnyValue, ValueError> {
        let value = downcast::<Self>(value)?;
        let wrapped: AnyValue = Box::new(Some(value));
        Ok(wrapped)
    }

    /// Take the contained value of a nullable, substituting the default when absent.
    ///
    /// Only nullable types support this.
    fn unwrap_nullable(_value: AnyValue) -> Result<AnyValue, ValueError> {
        Err(ValueError::NotConvertible {
            type_name: type_name::<Self>(),
            direction: "from",
        })
    }
}

macro_rules! primitive_field_value {
    ($($ty:ty => $primitive:ident),* $(,)?) => {
        $(
            impl FieldValue for $ty {
                fn field_type() -> FieldType {
                    FieldType::Primitive(Primitive::$primitive)
                }
            }
        )*
    };
}

primitive_field_value!(
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    char => Char,
    Uuid => Uuid,
    NaiveDate => Date,
    DateTime<Utc> => Timestamp,
);

impl FieldValue for String {
    fn field_type() -> FieldType {
        FieldType::Text
    }
}

impl FieldValue for Vec<u8> {
    fn field_type() -> FieldType {
        FieldType::Binary
    }
}

impl<T: FieldValue + Default> FieldValue for Option<T> {
    fn field_type() -> FieldType {
        FieldType::nullable(T::field_type())
    }

    fn unwrap_nullable(value: AnyValue) -> Result<AnyValue, ValueError> {
        let value = downcast::<Option<T>>(value)?;
        let unwrapped: AnyValue = Box::new(value.unwrap_or_default());
        Ok(unwrapped)
    }
}

/// Nullable conversions for types without a [`FieldValue`] impl.
pub(crate) fn not_wrappable<T: 'static>(_value: AnyValue) -> Result<AnyValue, ValueError> {
    Err(ValueError::NotConvertible {
        type_name: type_name::<T>(),
        direction: "into",
    })
}

pub(crate) fn not_unwrappable<T: 'static>(_value: AnyValue) -> Result<AnyValue, ValueError> {
    Err(ValueError::NotConvertible {
        type_name: type_name::<T>(),
        direction: "from",
    })
}
