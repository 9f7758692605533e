//! The fluent mapping builder.
//!
//! ```text
//! Mapper::default()
//!     .from::<Source>()
//!     .to::<Target>()          // introspect + auto-match
//!     .using("a").to_set("b")  // explicit rules
//!     .ignore_source("c")      // exclusions
//!     .create()?               // exhaustiveness + compile
//! ```
//!
//! The builder is a plain value passed through every call and consumed by
//! [`MappingBuilder::create`]. Configuration mistakes (unknown field names) are
//! recorded along the way and reported by `create`, so the chain itself never fails.

use std::marker::PhantomData;

use mapwright_schema::{introspect, IntrospectionError, Shape, ShapeSchema};
use tracing::{debug, warn};

use crate::compiler::{compile, CompiledMapping};
use crate::config::MapperConfig;
use crate::error::{InvalidMappingError, MapperResult, MappingError, Side};
use crate::matcher::auto_match;
use crate::rules::{Exclusion, RuleOrigin, RuleSet};

/// Entry point for building mappings.
#[derive(Debug, Clone, Default)]
pub struct Mapper {
    config: MapperConfig,
}

impl Mapper {
    pub fn new(config: MapperConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// Start a mapping from `S`.
    pub fn from<S: Shape>(&self) -> SourceStage<S> {
        SourceStage {
            config: self.config.clone(),
            _source: PhantomData,
        }
    }
}

/// A mapping with a chosen source shape and no target yet.
#[derive(Debug)]
pub struct SourceStage<S> {
    config: MapperConfig,
    _source: PhantomData<fn() -> S>,
}

impl<S: Shape> SourceStage<S> {
    /// Pick the target shape. Both shapes are introspected and the rule set is
    /// seeded with the auto-matched pairs.
    pub fn to<T: Shape>(self) -> MappingBuilder<S, T> {
        let mut introspection_error = None;
        let source = introspect_or_record::<S>(&mut introspection_error);
        let target = introspect_or_record::<T>(&mut introspection_error);
        let rules = auto_match(&source, &target, &self.config);

        MappingBuilder {
            source,
            target,
            rules,
            introspection_error,
            config_errors: Vec::new(),
        }
    }
}

fn introspect_or_record<X: Shape>(slot: &mut Option<IntrospectionError>) -> ShapeSchema<X> {
    match introspect::<X>() {
        Ok(schema) => schema,
        Err(err) => {
            if slot.is_none() {
                *slot = Some(err);
            }
            X::schema()
        }
    }
}

/// The mapping being configured for `S` => `T`.
pub struct MappingBuilder<S, T> {
    source: ShapeSchema<S>,
    target: ShapeSchema<T>,
    rules: RuleSet,
    introspection_error: Option<IntrospectionError>,
    config_errors: Vec<InvalidMappingError>,
}

impl<S: Shape, T: Shape> MappingBuilder<S, T> {
    /// Begin an explicit rule reading `source_field`.
    pub fn using(self, source_field: &str) -> RuleBuilder<S, T> {
        RuleBuilder {
            builder: self,
            source_field: source_field.to_string(),
        }
    }

    /// Exclude a source field from mapping.
    pub fn ignore_source(self, field: &str) -> Self {
        self.exclude(Side::Source, field, Exclusion::Ignored)
    }

    /// Exclude a target field from mapping; it keeps its constructed value.
    pub fn ignore_target(self, field: &str) -> Self {
        self.exclude(Side::Target, field, Exclusion::Ignored)
    }

    /// Like [`ignore_source`](Self::ignore_source), for a field another process reads.
    pub fn defer_source(self, field: &str) -> Self {
        self.exclude(Side::Source, field, Exclusion::Deferred)
    }

    /// Like [`ignore_target`](Self::ignore_target), for a field the caller populates
    /// after mapping (nested records, collections).
    pub fn defer_target(self, field: &str) -> Self {
        self.exclude(Side::Target, field, Exclusion::Deferred)
    }

    /// The rule set assembled so far.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn source_schema(&self) -> &ShapeSchema<S> {
        &self.source
    }

    pub fn target_schema(&self) -> &ShapeSchema<T> {
        &self.target
    }

    /// Validate the configuration and compile it.
    ///
    /// Fails with the first introspection or configuration error, then with a
    /// [`MappingError`] listing every unaccounted field, then with whatever the
    /// compiler rejects.
    pub fn create(self) -> MapperResult<CompiledMapping<S, T>> {
        if let Some(err) = self.introspection_error {
            return Err(err.into());
        }
        if let Some(err) = self.config_errors.into_iter().next() {
            return Err(err.into());
        }

        let unmapped_source = self.rules.uncovered_source(self.source.field_names());
        let unmapped_target = self.rules.uncovered_target(self.target.field_names());
        if !unmapped_source.is_empty() || !unmapped_target.is_empty() {
            debug!(
                "Mapping {} => {} is not exhaustive: {} source, {} target fields unmapped",
                self.source.name(),
                self.target.name(),
                unmapped_source.len(),
                unmapped_target.len()
            );
            return Err(MappingError {
                source_shape: self.source.name().to_string(),
                unmapped_source,
                target_shape: self.target.name().to_string(),
                unmapped_target,
            }
            .into());
        }

        compile(&self.source, &self.target, &self.rules)
    }

    fn exclude(mut self, side: Side, field: &str, reason: Exclusion) -> Self {
        if !self.check_field(side, field) {
            return self;
        }
        match side {
            Side::Source => self.rules.exclude_source(field, reason),
            Side::Target => self.rules.exclude_target(field, reason),
        }
        self
    }

    // Records an UnknownField error and returns false when the name is not declared.
    fn check_field(&mut self, side: Side, field: &str) -> bool {
        let (known, shape) = match side {
            Side::Source => (self.source.field(field).is_some(), self.source.name()),
            Side::Target => (self.target.field(field).is_some(), self.target.name()),
        };
        if !known {
            self.config_errors.push(InvalidMappingError::UnknownField {
                side,
                shape: shape.to_string(),
                field: field.to_string(),
            });
        }
        known
    }
}

/// An explicit rule waiting for its target field.
pub struct RuleBuilder<S, T> {
    builder: MappingBuilder<S, T>,
    source_field: String,
}

impl<S: Shape, T: Shape> RuleBuilder<S, T> {
    /// Write the chosen source field into `target_field`.
    ///
    /// Takes over the write of any rule already targeting `target_field`; the
    /// replaced rule's source field still counts as handled. Types are checked
    /// when the mapping is created.
    pub fn to_set(self, target_field: &str) -> MappingBuilder<S, T> {
        let mut builder = self.builder;
        let source_known = builder.check_field(Side::Source, &self.source_field);
        let target_known = builder.check_field(Side::Target, target_field);
        if !(source_known && target_known) {
            return builder;
        }

        let displaced = builder.rules.insert_explicit(&self.source_field, target_field);
        for rule in displaced {
            match rule.origin {
                RuleOrigin::AutoMatched => warn!(
                    "Explicit rule {}.{} => {}.{} replaces auto-matched rule from '{}'",
                    builder.source.name(),
                    self.source_field,
                    builder.target.name(),
                    target_field,
                    rule.source_field
                ),
                RuleOrigin::Explicit => debug!(
                    "Explicit rule {}.{} => {}.{} replaces earlier rule from '{}'",
                    builder.source.name(),
                    self.source_field,
                    builder.target.name(),
                    target_field,
                    rule.source_field
                ),
            }
        }
        builder
    }
}
