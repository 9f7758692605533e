//! Shape Schemas
//!
//! # Philosophy: Shapes describe themselves
//!
//! A mapper needs to know, for every record type it touches, which fields exist,
//! what they hold, and how to read and write them. Rather than discovering this
//! at runtime, each type hands out an explicit, ordered [`ShapeSchema`]:
//!
//! 1. **Declare**: implement [`Shape`] with [`impl_shape!`] or a [`SchemaBuilder`]
//! 2. **Introspect**: [`introspect`] returns the validated field list
//! 3. **Access**: each [`FieldDescriptor`] reads and writes type-erased values
//!
//! Field identity is the name (unique within a shape). Field types are the
//! semantic tags in [`FieldType`]; two fields share a Rust type exactly when
//! their tags are equal.
//!
//! # Modules
//!
//! - [`types`]: Field type tags (FieldType, Primitive, OpaqueType)
//! - [`value`]: Type-erased values and the FieldValue trait
//! - [`shape`]: Shape trait, schemas, descriptors and the schema builder

pub mod shape;
pub mod types;
pub mod value;

pub use shape::{
    introspect, BoxError, FieldAccess, FieldDescriptor, IntrospectionError, SchemaBuilder, Shape,
    ShapeSchema,
};
pub use types::{FieldType, OpaqueType, Primitive};
pub use value::{downcast, AnyValue, ConvertFn, FieldValue, ValueError};

/// Implement [`Shape`] for a struct from a list of its fields.
///
/// ```rust
/// use mapwright_schema::{impl_shape, Shape};
///
/// #[derive(Debug, Clone, Default)]
/// pub struct Child {
///     pub id: i64,
/// }
///
/// #[derive(Debug, Clone, Default)]
/// pub struct Audit {
///     pub created_by: String,
/// }
///
/// #[derive(Debug, Clone, Default)]
/// pub struct Order {
///     pub name: String,
///     pub amount: Option<i64>,
///     pub child: Child,
///     pub audit: Audit,
/// }
///
/// impl_shape!(Audit { created_by: String });
/// impl_shape!(Order {
///     name: String,
///     amount: Option<i64>,
///     #[opaque] child: Child,
///     #[inherit] audit: Audit,
/// });
///
/// let names: Vec<String> = Order::schema().field_names().map(String::from).collect();
/// assert_eq!(names, ["name", "amount", "child", "created_by"]);
/// ```
///
/// - plain fields need a [`FieldValue`] type
/// - `#[opaque]` fields hold any `Clone` type and are only copied verbatim
/// - `#[inherit]` splices in the fields of an embedded shape
///
/// The generated schema constructs instances through `Default`. Use
/// `impl_shape!(no_default Type { .. })` for source-only shapes.
#[macro_export]
macro_rules! impl_shape {
    (no_default $ty:ident { $($body:tt)* }) => {
        impl $crate::Shape for $ty {
            fn schema() -> $crate::ShapeSchema<Self> {
                let builder = $crate::SchemaBuilder::<$ty>::new(stringify!($ty));
                $crate::__shape_fields!(builder, $ty; $($body)*).build()
            }
        }
    };
    ($ty:ident { $($body:tt)* }) => {
        impl $crate::Shape for $ty {
            fn schema() -> $crate::ShapeSchema<Self> {
                let builder = $crate::SchemaBuilder::<$ty>::new(stringify!($ty))
                    .constructor(<$ty as ::core::default::Default>::default);
                $crate::__shape_fields!(builder, $ty; $($body)*).build()
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __shape_fields {
    ($builder:expr, $ty:ident;) => {
        $builder
    };
    ($builder:expr, $ty:ident; #[opaque] $field:ident : $fty:ty $(, $($rest:tt)*)?) => {
        $crate::__shape_fields!(
            $builder.opaque::<$fty, _, _>(
                stringify!($field),
                |s: &$ty| -> $fty { s.$field.clone() },
                |s: &mut $ty, v: $fty| s.$field = v,
            ),
            $ty; $($($rest)*)?
        )
    };
    ($builder:expr, $ty:ident; #[inherit] $field:ident : $fty:ty $(, $($rest:tt)*)?) => {
        $crate::__shape_fields!(
            $builder.inherit::<$fty, _, _>(
                |s: &$ty| &s.$field,
                |s: &mut $ty| &mut s.$field,
            ),
            $ty; $($($rest)*)?
        )
    };
    ($builder:expr, $ty:ident; $field:ident : $fty:ty $(, $($rest:tt)*)?) => {
        $crate::__shape_fields!(
            $builder.field::<$fty, _, _>(
                stringify!($field),
                |s: &$ty| -> $fty { s.$field.clone() },
                |s: &mut $ty, v: $fty| s.$field = v,
            ),
            $ty; $($($rest)*)?
        )
    };
}
