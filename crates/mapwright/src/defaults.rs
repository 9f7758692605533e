//! Canonical default values for mapper configuration.

/// Pair same-named, type-compatible fields before explicit rules are applied.
pub const DEFAULT_AUTO_MATCH: bool = true;

/// Treat `T` and `Option<T>` as compatible while auto-matching.
pub const DEFAULT_MATCH_NULLABLE: bool = true;
