//! Mapping shapes that embed a base shape.
//!
//! Inherited fields take part in matching like declared ones: same-named base
//! fields auto-match, and explicit rules may cross between base and derived.

use mapwright::{Mapper, MapperError};
use mapwright_test_utils::fixtures::inheritance::{sample_source, Source, Target};
use mapwright_test_utils::init_test_tracing;

/// Explicit rules move values between derived and base fields in both directions.
#[test]
fn test_base_class_property_mapping() {
    init_test_tracing();
    let mapping = Mapper::default()
        .from::<Source>()
        .to::<Target>()
        .using("source_string")
        .to_set("target_base_string")
        .using("source_base_string")
        .to_set("target_string")
        .create()
        .unwrap();

    let source = sample_source();
    let target = mapping.map(&source).unwrap();

    assert_eq!(target.name, source.name);
    assert_eq!(target.base.base_string, source.base.base_string);
    assert_eq!(target.base.target_base_string, source.source_string);
    assert_eq!(target.target_string, source.base.source_base_string);
}

/// Ignoring the leftover base fields completes the mapping.
#[test]
fn test_base_class_ignoring() {
    init_test_tracing();
    let mapping = Mapper::default()
        .from::<Source>()
        .to::<Target>()
        .using("source_string")
        .to_set("target_string")
        .ignore_source("source_base_string")
        .ignore_target("target_base_string")
        .create()
        .unwrap();

    let source = sample_source();
    let target = mapping.map(&source).unwrap();

    assert_eq!(target.target_string, source.source_string);
    assert_eq!(target.base.base_string, "BASESTRING");
    assert_eq!(target.base.target_base_string, "");
}

/// Unmatched base fields are reported like any other field.
#[test]
fn test_base_class_missing_mapping() {
    init_test_tracing();
    let err = Mapper::default()
        .from::<Source>()
        .to::<Target>()
        .using("source_string")
        .to_set("target_string")
        .create()
        .unwrap_err();

    match err {
        MapperError::Unmapped(err) => {
            assert_eq!(err.unmapped_source, vec!["source_base_string"]);
            assert_eq!(err.unmapped_target, vec!["target_base_string"]);
        }
        other => panic!("unexpected error: {}", other),
    }
}

/// Inherited fields follow the declared ones, each exactly once.
#[test]
fn test_inherited_fields_listed_once() {
    let builder = Mapper::default().from::<Source>().to::<Target>();
    let names: Vec<&str> = builder.source_schema().field_names().collect();
    assert_eq!(
        names,
        vec!["name", "source_string", "base_string", "source_base_string"]
    );
    assert!(builder.rules().contains_pair("base_string", "base_string"));
}
