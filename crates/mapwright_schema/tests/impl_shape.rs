//! Tests for schemas generated by `impl_shape!`.

use mapwright_schema::{
    downcast, impl_shape, introspect, FieldAccess, FieldType, IntrospectionError, Primitive,
    Shape, ShapeSchema,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Child {
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceBase {
    pub base_string: String,
    pub source_base_string: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Source {
    pub name: String,
    pub id: Option<Uuid>,
    pub payload: Vec<u8>,
    pub children: Vec<Child>,
    pub base: SourceBase,
}

impl_shape!(SourceBase {
    base_string: String,
    source_base_string: String,
});

impl_shape!(Source {
    name: String,
    id: Option<Uuid>,
    payload: Vec<u8>,
    #[opaque] children: Vec<Child>,
    #[inherit] base: SourceBase,
});

#[derive(Debug)]
pub struct Handle {
    pub token: String,
}

impl_shape!(no_default Handle { token: String });

#[test]
fn test_macro_field_order_and_types() {
    let schema = introspect::<Source>().unwrap();
    assert_eq!(schema.name(), "Source");

    let described: Vec<(&str, FieldType)> = schema
        .fields()
        .iter()
        .map(|f| (f.name(), f.field_type().clone()))
        .collect();

    assert_eq!(
        described,
        vec![
            ("name", FieldType::Text),
            ("id", FieldType::nullable(FieldType::Primitive(Primitive::Uuid))),
            ("payload", FieldType::Binary),
            ("children", FieldType::opaque::<Vec<Child>>()),
            ("base_string", FieldType::Text),
            ("source_base_string", FieldType::Text),
        ]
    );
    assert!(schema
        .fields()
        .iter()
        .all(|f| f.access() == FieldAccess::ReadWrite));
}

#[test]
fn test_macro_accessors_round_trip_through_instance() {
    let schema = Source::schema();
    let mut value = schema.instantiate().unwrap();
    assert_eq!(value, Source::default());

    let children = vec![Child { label: "a".into() }];
    schema
        .field("children")
        .unwrap()
        .set(&mut value, Box::new(children.clone()))
        .unwrap();
    schema
        .field("source_base_string")
        .unwrap()
        .set(&mut value, Box::new("inherited".to_string()))
        .unwrap();

    assert_eq!(value.children, children);
    assert_eq!(value.base.source_base_string, "inherited");

    let read = schema.field("children").unwrap().get(&value);
    assert_eq!(downcast::<Vec<Child>>(read).unwrap(), children);
}

#[test]
fn test_no_default_shape_is_not_constructible() {
    let schema: ShapeSchema<Handle> = Handle::schema();
    assert!(!schema.is_constructible());

    let err = schema.instantiate().unwrap_err();
    let err = err.downcast::<IntrospectionError>().unwrap();
    assert_eq!(
        *err,
        IntrospectionError::NotConstructible {
            shape: "Handle".to_string()
        }
    );

    let handle = Handle {
        token: "abc".to_string(),
    };
    let token = schema.field("token").unwrap().get(&handle);
    assert_eq!(downcast::<String>(token).unwrap(), "abc");
}
