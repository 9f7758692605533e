//! Mapwright - declarative object-to-object mapping
//!
//! # Philosophy: Fail at build time, not at map time
//!
//! Copying fields between two record types is repetitive and easy to get
//! silently wrong: a field is added on one side and nobody maps it. A mapping
//! here is built once and checked before it is ever used:
//!
//! 1. **Auto-match**: same-named, type-compatible fields are paired
//! 2. **Configure**: explicit rules, ignores and deferrals adjust the pairs
//! 3. **Create**: every field on both sides must be accounted for
//! 4. **Map**: the compiled mapping runs any number of times, from any thread
//!
//! ```rust
//! use mapwright::{impl_shape, Mapper};
//!
//! #[derive(Debug, Clone, Default)]
//! pub struct Order {
//!     pub name: String,
//!     pub amount: i64,
//!     pub secret: String,
//! }
//!
//! #[derive(Debug, Clone, Default)]
//! pub struct OrderView {
//!     pub name: String,
//!     pub amount: Option<i64>,
//! }
//!
//! impl_shape!(Order { name: String, amount: i64, secret: String });
//! impl_shape!(OrderView { name: String, amount: Option<i64> });
//!
//! let mapping = Mapper::default()
//!     .from::<Order>()
//!     .to::<OrderView>()
//!     .ignore_source("secret")
//!     .create()
//!     .unwrap();
//!
//! let view = mapping
//!     .map(&Order { name: "A".into(), amount: 42, secret: "x".into() })
//!     .unwrap();
//! assert_eq!(view.amount, Some(42));
//! ```
//!
//! # Modules
//!
//! - [`builder`]: Mapper entry point and the fluent MappingBuilder
//! - [`matcher`]: Auto-matching of same-named fields
//! - [`rules`]: Rules and exclusions being assembled
//! - [`conversion`]: Per-field conversions (base64, nullable wrap/unwrap, identity)
//! - [`compiler`]: CompiledMapping and the ObjectMapping trait
//! - [`config`]: MapperConfig
//! - [`error`]: Error taxonomy

pub mod builder;
pub mod compiler;
pub mod config;
pub mod conversion;
pub mod defaults;
pub mod error;
pub mod matcher;
pub mod rules;

pub use builder::{Mapper, MappingBuilder, RuleBuilder, SourceStage};
pub use compiler::{compile, CompiledMapping, ObjectMapping, PlannedWrite};
pub use config::MapperConfig;
pub use conversion::Conversion;
pub use error::{
    ConversionError, InvalidMappingError, MapperError, MapperResult, MappingError, Side,
};
pub use matcher::{auto_match, is_auto_compatible};
pub use rules::{Exclusion, MappingRule, RuleOrigin, RuleSet};

pub use mapwright_schema::{
    impl_shape, introspect, FieldAccess, FieldDescriptor, FieldType, FieldValue,
    IntrospectionError, Primitive, SchemaBuilder, Shape, ShapeSchema,
};
