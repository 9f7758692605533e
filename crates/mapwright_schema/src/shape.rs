//! Shape schemas.
//!
//! A shape is a record type with a fixed, ordered set of named and typed fields.
//! Instead of reflecting over types at runtime, every shape hands out an explicit
//! [`ShapeSchema`] through the [`Shape`] trait. Schemas are written with the
//! [`SchemaBuilder`] or generated by [`impl_shape!`](crate::impl_shape).

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::types::FieldType;
use crate::value::{
    downcast, not_unwrappable, not_wrappable, AnyValue, ConvertFn, FieldValue, ValueError,
};

/// Boxed error returned by fallible constructors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

type Getter<S> = Arc<dyn Fn(&S) -> AnyValue + Send + Sync>;
type Setter<S> = Arc<dyn Fn(&mut S, AnyValue) -> Result<(), ValueError> + Send + Sync>;
type Constructor<S> = Arc<dyn Fn() -> Result<S, BoxError> + Send + Sync>;

/// A type that can describe its own fields.
pub trait Shape: Sized + 'static {
    fn schema() -> ShapeSchema<Self>;
}

/// Introspect `S` and check its schema is well formed.
pub fn introspect<S: Shape>() -> Result<ShapeSchema<S>, IntrospectionError> {
    let schema = S::schema();
    schema.validate()?;
    Ok(schema)
}

/// Errors raised while describing a shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntrospectionError {
    #[error("shape '{shape}' has no zero-argument construction path")]
    NotConstructible { shape: String },

    #[error("shape '{shape}' declares an invalid field name '{name}'")]
    InvalidFieldName { shape: String, name: String },
}

/// Whether a field can be written as well as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    ReadWrite,
    ReadOnly,
}

/// One named, typed field of a shape `S`.
pub struct FieldDescriptor<S> {
    name: String,
    field_type: FieldType,
    getter: Getter<S>,
    setter: Option<Setter<S>>,
    wrap: ConvertFn,
    unwrap: ConvertFn,
}

impl<S: 'static> FieldDescriptor<S> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn access(&self) -> FieldAccess {
        if self.setter.is_some() {
            FieldAccess::ReadWrite
        } else {
            FieldAccess::ReadOnly
        }
    }

    pub fn is_writable(&self) -> bool {
        self.setter.is_some()
    }

    /// Clone the field's current value out of `shape`.
    pub fn get(&self, shape: &S) -> AnyValue {
        (self.getter)(shape)
    }

    /// Store `value` into the field. Fails if the value has the wrong type or the
    /// field is read-only.
    pub fn set(&self, shape: &mut S, value: AnyValue) -> Result<(), ValueError> {
        match &self.setter {
            Some(setter) => setter(shape, value),
            None => Err(ValueError::ReadOnly),
        }
    }

    /// Shared handle to the getter, for callers that outlive this descriptor.
    pub fn getter(&self) -> Arc<dyn Fn(&S) -> AnyValue + Send + Sync> {
        Arc::clone(&self.getter)
    }

    pub fn setter(&self) -> Option<Arc<dyn Fn(&mut S, AnyValue) -> Result<(), ValueError> + Send + Sync>> {
        self.setter.as_ref().map(Arc::clone)
    }

    /// Converts a value of this field into a present nullable of the same type.
    pub fn wrap_fn(&self) -> ConvertFn {
        self.wrap
    }

    /// Converts a value of this (nullable) field into its inner type.
    pub fn unwrap_fn(&self) -> ConvertFn {
        self.unwrap
    }

    /// Re-target this descriptor at an outer shape that embeds `S`.
    fn lift<D, P, M>(&self, project: Arc<P>, project_mut: Arc<M>) -> FieldDescriptor<D>
    where
        D: 'static,
        P: Fn(&D) -> &S + Send + Sync + 'static,
        M: Fn(&mut D) -> &mut S + Send + Sync + 'static,
    {
        let getter = Arc::clone(&self.getter);
        let setter = self.setter.as_ref().map(|setter| {
            let setter = Arc::clone(setter);
            let lifted: Setter<D> =
                Arc::new(move |outer: &mut D, value| setter(project_mut(outer), value));
            lifted
        });

        FieldDescriptor {
            name: self.name.clone(),
            field_type: self.field_type.clone(),
            getter: Arc::new(move |outer: &D| getter(project(outer))),
            setter,
            wrap: self.wrap,
            unwrap: self.unwrap,
        }
    }
}

impl<S> Clone for FieldDescriptor<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            field_type: self.field_type.clone(),
            getter: Arc::clone(&self.getter),
            setter: self.setter.clone(),
            wrap: self.wrap,
            unwrap: self.unwrap,
        }
    }
}

impl<S> fmt::Debug for FieldDescriptor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("field_type", &self.field_type)
            .field("writable", &self.setter.is_some())
            .finish()
    }
}

/// The ordered field list of a shape plus its construction path.
pub struct ShapeSchema<S> {
    name: String,
    fields: Vec<FieldDescriptor<S>>,
    constructor: Option<Constructor<S>>,
}

impl<S: 'static> ShapeSchema<S> {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder<S> {
        SchemaBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order, inherited fields included exactly once.
    pub fn fields(&self) -> &[FieldDescriptor<S>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<S>> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|field| field.name.as_str())
    }

    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }

    /// Build a fresh instance through the zero-argument construction path.
    pub fn instantiate(&self) -> Result<S, BoxError> {
        match &self.constructor {
            Some(constructor) => constructor(),
            None => Err(Box::new(IntrospectionError::NotConstructible {
                shape: self.name.clone(),
            })),
        }
    }

    /// Shared handle to the constructor, if the shape has one.
    pub fn constructor(&self) -> Option<Arc<dyn Fn() -> Result<S, BoxError> + Send + Sync>> {
        self.constructor.as_ref().map(Arc::clone)
    }

    pub fn validate(&self) -> Result<(), IntrospectionError> {
        for field in &self.fields {
            if field.name.trim().is_empty() || field.name.trim() != field.name {
                return Err(IntrospectionError::InvalidFieldName {
                    shape: self.name.clone(),
                    name: field.name.clone(),
                });
            }
        }
        Ok(())
    }
}

impl<S> Clone for ShapeSchema<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            fields: self.fields.clone(),
            constructor: self.constructor.clone(),
        }
    }
}

impl<S> fmt::Debug for ShapeSchema<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("constructible", &self.constructor.is_some())
            .finish()
    }
}

/// Typed builder for a [`ShapeSchema`].
pub struct SchemaBuilder<S> {
    name: String,
    fields: Vec<FieldDescriptor<S>>,
    constructor: Option<Constructor<S>>,
}

impl<S: 'static> SchemaBuilder<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            constructor: None,
        }
    }

    /// Declare a read/write field.
    pub fn field<T, G, W>(self, name: impl Into<String>, get: G, set: W) -> Self
    where
        T: FieldValue,
        G: Fn(&S) -> T + Send + Sync + 'static,
        W: Fn(&mut S, T) + Send + Sync + 'static,
    {
        let descriptor = FieldDescriptor {
            name: name.into(),
            field_type: T::field_type(),
            getter: erase_getter(get),
            setter: Some(erase_setter(set)),
            wrap: T::wrap_nullable,
            unwrap: T::unwrap_nullable,
        };
        self.declare(descriptor)
    }

    /// Declare a read-only field. It can feed target fields but is never written.
    pub fn computed<T, G>(self, name: impl Into<String>, get: G) -> Self
    where
        T: FieldValue,
        G: Fn(&S) -> T + Send + Sync + 'static,
    {
        let descriptor = FieldDescriptor {
            name: name.into(),
            field_type: T::field_type(),
            getter: erase_getter(get),
            setter: None,
            wrap: T::wrap_nullable,
            unwrap: T::unwrap_nullable,
        };
        self.declare(descriptor)
    }

    /// Declare an opaque field (nested record, collection, ...). Opaque fields
    /// are only ever copied verbatim into a field of the very same type.
    pub fn opaque<T, G, W>(self, name: impl Into<String>, get: G, set: W) -> Self
    where
        T: Clone + Send + Sync + 'static,
        G: Fn(&S) -> T + Send + Sync + 'static,
        W: Fn(&mut S, T) + Send + Sync + 'static,
    {
        let descriptor = FieldDescriptor {
            name: name.into(),
            field_type: FieldType::opaque::<T>(),
            getter: erase_getter(get),
            setter: Some(erase_setter(set)),
            wrap: not_wrappable::<T>,
            unwrap: not_unwrappable::<T>,
        };
        self.declare(descriptor)
    }

    /// Splice in the fields of an embedded base shape `B`.
    ///
    /// Base fields whose names are already declared are skipped.
    pub fn inherit<B, P, M>(mut self, project: P, project_mut: M) -> Self
    where
        B: Shape,
        P: Fn(&S) -> &B + Send + Sync + 'static,
        M: Fn(&mut S) -> &mut B + Send + Sync + 'static,
    {
        let project = Arc::new(project);
        let project_mut = Arc::new(project_mut);
        for field in B::schema().fields {
            if self.fields.iter().any(|existing| existing.name == field.name) {
                continue;
            }
            let lifted = field.lift(Arc::clone(&project), Arc::clone(&project_mut));
            self.fields.push(lifted);
        }
        self
    }

    /// Use an infallible zero-argument constructor.
    pub fn constructor<F>(mut self, construct: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move || Ok(construct())));
        self
    }

    /// Use a zero-argument constructor that may fail.
    pub fn try_constructor<F>(mut self, construct: F) -> Self
    where
        F: Fn() -> Result<S, BoxError> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(construct));
        self
    }

    pub fn build(self) -> ShapeSchema<S> {
        ShapeSchema {
            name: self.name,
            fields: self.fields,
            constructor: self.constructor,
        }
    }

    // A redeclared name replaces the earlier descriptor in place.
    fn declare(mut self, descriptor: FieldDescriptor<S>) -> Self {
        match self
            .fields
            .iter_mut()
            .find(|existing| existing.name == descriptor.name)
        {
            Some(existing) => *existing = descriptor,
            None => self.fields.push(descriptor),
        }
        self
    }
}

fn erase_getter<S, T, G>(get: G) -> Getter<S>
where
    T: Send + 'static,
    G: Fn(&S) -> T + Send + Sync + 'static,
{
    Arc::new(move |shape: &S| {
        let value: AnyValue = Box::new(get(shape));
        value
    })
}

fn erase_setter<S, T, W>(set: W) -> Setter<S>
where
    T: 'static,
    W: Fn(&mut S, T) + Send + Sync + 'static,
{
    Arc::new(move |shape: &mut S, value: AnyValue| {
        set(shape, downcast::<T>(value)?);
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Primitive;
    use crate::value::downcast;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Base {
        base_string: String,
        shared: i32,
    }

    impl Shape for Base {
        fn schema() -> ShapeSchema<Self> {
            ShapeSchema::builder("Base")
                .field("base_string", |s: &Base| s.base_string.clone(), |s: &mut Base, v| s.base_string = v)
                .field("shared", |s: &Base| s.shared, |s: &mut Base, v| s.shared = v)
                .constructor(Base::default)
                .build()
        }
    }

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Derived {
        name: String,
        shared: i32,
        base: Base,
    }

    impl Shape for Derived {
        fn schema() -> ShapeSchema<Self> {
            ShapeSchema::builder("Derived")
                .field("name", |s: &Derived| s.name.clone(), |s: &mut Derived, v| s.name = v)
                .field("shared", |s: &Derived| s.shared, |s: &mut Derived, v| s.shared = v)
                .inherit::<Base, _, _>(|s: &Derived| &s.base, |s: &mut Derived| &mut s.base)
                .computed("name_len", |s: &Derived| s.name.len() as u64)
                .constructor(Derived::default)
                .build()
        }
    }

    #[test]
    fn test_fields_in_declaration_order() {
        let schema = Derived::schema();
        let names: Vec<&str> = schema.field_names().collect();
        assert_eq!(names, vec!["name", "shared", "base_string", "name_len"]);
    }

    #[test]
    fn test_redeclared_field_appears_once() {
        let schema = Derived::schema();
        assert_eq!(schema.field_names().filter(|n| *n == "shared").count(), 1);

        // The derived declaration wins over the base one.
        let mut value = Derived::default();
        schema.field("shared").unwrap().set(&mut value, Box::new(5i32)).unwrap();
        assert_eq!(value.shared, 5);
        assert_eq!(value.base.shared, 0);
    }

    #[test]
    fn test_inherited_field_reads_and_writes_through_projection() {
        let schema = Derived::schema();
        let field = schema.field("base_string").unwrap();
        assert_eq!(field.field_type(), &FieldType::Text);

        let mut value = Derived::default();
        field.set(&mut value, Box::new("inner".to_string())).unwrap();
        assert_eq!(value.base.base_string, "inner");
        assert_eq!(downcast::<String>(field.get(&value)).unwrap(), "inner");
    }

    #[test]
    fn test_computed_field_is_read_only() {
        let schema = Derived::schema();
        let field = schema.field("name_len").unwrap();
        assert_eq!(field.access(), FieldAccess::ReadOnly);
        assert_eq!(field.field_type(), &FieldType::Primitive(Primitive::U64));

        let mut value = Derived::default();
        assert_eq!(
            field.set(&mut value, Box::new(1u64)).unwrap_err(),
            ValueError::ReadOnly
        );
    }

    #[test]
    fn test_setter_rejects_wrong_type() {
        let schema = Base::schema();
        let mut value = Base::default();
        let err = schema
            .field("shared")
            .unwrap()
            .set(&mut value, Box::new("x".to_string()))
            .unwrap_err();
        assert_eq!(err, ValueError::TypeMismatch { expected: "i32" });
    }

    #[test]
    fn test_instantiate_without_constructor() {
        let schema: ShapeSchema<Base> = ShapeSchema::builder("Bare").build();
        assert!(!schema.is_constructible());
        let err = schema.instantiate().unwrap_err();
        assert!(err.to_string().contains("Bare"));
    }

    #[test]
    fn test_validate_rejects_blank_names() {
        let schema = ShapeSchema::builder("Blank")
            .field(" ", |s: &Base| s.shared, |s: &mut Base, v| s.shared = v)
            .build();
        assert_eq!(
            schema.validate(),
            Err(IntrospectionError::InvalidFieldName {
                shape: "Blank".to_string(),
                name: " ".to_string(),
            })
        );
    }
}
