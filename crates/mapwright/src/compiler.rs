//! Compiling a validated rule set into a reusable mapping.
//!
//! The compiled form is a flat list of field writes. Each write holds the
//! source getter, the converter picked for the rule, and the target setter;
//! running the mapping constructs a fresh target and applies every write once.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use mapwright_schema::{AnyValue, BoxError, IntrospectionError, ShapeSchema, ValueError};
use serde::Serialize;
use tracing::{debug, trace};

use crate::conversion::{Conversion, ValueConverter};
use crate::error::{InvalidMappingError, MapperError, MapperResult, Side};
use crate::rules::{Exclusion, RuleSet};

type Getter<S> = Arc<dyn Fn(&S) -> AnyValue + Send + Sync>;
type Setter<T> = Arc<dyn Fn(&mut T, AnyValue) -> Result<(), ValueError> + Send + Sync>;
type Constructor<T> = Arc<dyn Fn() -> Result<T, BoxError> + Send + Sync>;

/// Maps a source object to a new instance of the target type.
pub trait ObjectMapping<S, T>: Send + Sync {
    fn map(&self, source: &S) -> Result<T, InvalidMappingError>;
}

/// One field write of a compiled mapping, as reported by [`CompiledMapping::plan`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedWrite {
    pub source_field: String,
    pub target_field: String,
    pub conversion: Conversion,
}

struct FieldWrite<S, T> {
    plan: PlannedWrite,
    read: Getter<S>,
    convert: ValueConverter,
    write: Setter<T>,
}

struct CompiledInner<S, T> {
    source_shape: String,
    target_shape: String,
    construct: Constructor<T>,
    writes: Vec<FieldWrite<S, T>>,
    deferred_source: Vec<String>,
    deferred_target: Vec<String>,
}

/// A finalized mapping from `S` to `T`.
///
/// Immutable and cheap to clone. Each call to [`map`](Self::map) builds its own
/// target, so one instance can be shared across threads without coordination.
pub struct CompiledMapping<S, T> {
    inner: Arc<CompiledInner<S, T>>,
    _shapes: PhantomData<fn(&S) -> T>,
}

impl<S: 'static, T: 'static> CompiledMapping<S, T> {
    /// Map `source` into a newly constructed `T`.
    pub fn map(&self, source: &S) -> Result<T, InvalidMappingError> {
        let inner = &self.inner;
        let mut target = (inner.construct)().map_err(|cause| InvalidMappingError::Construction {
            source_shape: inner.source_shape.clone(),
            target_shape: inner.target_shape.clone(),
            cause,
        })?;

        for write in &inner.writes {
            let value = (write.read)(source);
            let result = (write.convert)(value).and_then(|converted| {
                (write.write)(&mut target, converted).map_err(Into::into)
            });
            if let Err(cause) = result {
                trace!(
                    "Field write {}.{} => {}.{} failed: {}",
                    inner.source_shape,
                    write.plan.source_field,
                    inner.target_shape,
                    write.plan.target_field,
                    cause
                );
                return Err(InvalidMappingError::Field {
                    source_shape: inner.source_shape.clone(),
                    source_field: write.plan.source_field.clone(),
                    target_shape: inner.target_shape.clone(),
                    target_field: write.plan.target_field.clone(),
                    cause,
                });
            }
        }

        Ok(target)
    }

    pub fn source_shape(&self) -> &str {
        &self.inner.source_shape
    }

    pub fn target_shape(&self) -> &str {
        &self.inner.target_shape
    }

    /// The field writes performed by every call, in rule order.
    pub fn plan(&self) -> Vec<PlannedWrite> {
        self.inner.writes.iter().map(|w| w.plan.clone()).collect()
    }

    /// Source fields marked as deferred: another process reads them.
    pub fn deferred_source_fields(&self) -> &[String] {
        &self.inner.deferred_source
    }

    /// Target fields marked as deferred: the caller populates them after `map`.
    pub fn deferred_target_fields(&self) -> &[String] {
        &self.inner.deferred_target
    }
}

impl<S: 'static, T: 'static> ObjectMapping<S, T> for CompiledMapping<S, T> {
    fn map(&self, source: &S) -> Result<T, InvalidMappingError> {
        CompiledMapping::map(self, source)
    }
}

impl<S, T> Clone for CompiledMapping<S, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _shapes: PhantomData,
        }
    }
}

impl<S, T> fmt::Debug for CompiledMapping<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plan: Vec<&PlannedWrite> = self.inner.writes.iter().map(|w| &w.plan).collect();
        f.debug_struct("CompiledMapping")
            .field("source_shape", &self.inner.source_shape)
            .field("target_shape", &self.inner.target_shape)
            .field("plan", &plan)
            .finish()
    }
}

/// Compile an exhaustive rule set.
///
/// Checks that the target can be constructed, that every active rule writes a
/// writable field, and that each rule has a conversion. Any failure here is a
/// configuration bug and is reported before a single value is mapped.
pub fn compile<S: 'static, T: 'static>(
    source: &ShapeSchema<S>,
    target: &ShapeSchema<T>,
    rules: &RuleSet,
) -> MapperResult<CompiledMapping<S, T>> {
    let construct = target
        .constructor()
        .ok_or_else(|| IntrospectionError::NotConstructible {
            shape: target.name().to_string(),
        })?;

    let mut writes = Vec::new();
    for rule in rules.active_rules() {
        let source_field = source.field(&rule.source_field).ok_or_else(|| {
            unknown_field(Side::Source, source.name(), &rule.source_field)
        })?;
        let target_field = target.field(&rule.target_field).ok_or_else(|| {
            unknown_field(Side::Target, target.name(), &rule.target_field)
        })?;

        let write = target_field
            .setter()
            .ok_or_else(|| InvalidMappingError::NotWritable {
                shape: target.name().to_string(),
                field: target_field.name().to_string(),
            })?;

        let conversion =
            Conversion::resolve(source_field.field_type(), target_field.field_type())
                .ok_or_else(|| InvalidMappingError::IncompatibleTypes {
                    source_shape: source.name().to_string(),
                    source_field: source_field.name().to_string(),
                    source_type: source_field.field_type().clone(),
                    target_shape: target.name().to_string(),
                    target_field: target_field.name().to_string(),
                    target_type: target_field.field_type().clone(),
                })?;

        writes.push(FieldWrite {
            plan: PlannedWrite {
                source_field: rule.source_field.clone(),
                target_field: rule.target_field.clone(),
                conversion,
            },
            read: source_field.getter(),
            convert: conversion.converter(source_field),
            write,
        });
    }

    let deferred_source = deferred(source.field_names(), |name| rules.source_exclusion(name));
    let deferred_target = deferred(target.field_names(), |name| rules.target_exclusion(name));

    debug!(
        "Compiled mapping {} => {} with {} field writes ({} deferred source, {} deferred target)",
        source.name(),
        target.name(),
        writes.len(),
        deferred_source.len(),
        deferred_target.len()
    );

    Ok(CompiledMapping {
        inner: Arc::new(CompiledInner {
            source_shape: source.name().to_string(),
            target_shape: target.name().to_string(),
            construct,
            writes,
            deferred_source,
            deferred_target,
        }),
        _shapes: PhantomData,
    })
}

fn unknown_field(side: Side, shape: &str, field: &str) -> MapperError {
    InvalidMappingError::UnknownField {
        side,
        shape: shape.to_string(),
        field: field.to_string(),
    }
    .into()
}

fn deferred<'a>(
    names: impl Iterator<Item = &'a str>,
    exclusion: impl Fn(&str) -> Option<Exclusion>,
) -> Vec<String> {
    names
        .filter(|name| exclusion(name) == Some(Exclusion::Deferred))
        .map(String::from)
        .collect()
}
