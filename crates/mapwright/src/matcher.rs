//! Auto-matching of same-named fields.

use mapwright_schema::{FieldType, ShapeSchema};
use tracing::debug;

use crate::config::MapperConfig;
use crate::rules::{MappingRule, RuleSet};

/// Whether a same-named pair may be matched without an explicit rule.
///
/// Exact type equality always matches. With `match_nullable`, a value type `T`
/// also matches `Option<T>` in either direction; nested nullables do not.
/// Binary and text never auto-match.
pub fn is_auto_compatible(source: &FieldType, target: &FieldType, match_nullable: bool) -> bool {
    if source == target {
        return true;
    }
    if !match_nullable {
        return false;
    }
    (source.is_value_type() && target.nullable_inner() == Some(source))
        || (target.is_value_type() && source.nullable_inner() == Some(target))
}

/// Propose the initial rule set for `source` => `target`.
///
/// Names are unique within a shape, so every source field has at most one
/// same-named candidate. Pairs that are type-incompatible, unreadable or
/// unwritable produce no rule and surface later as unmapped fields.
pub fn auto_match<S: 'static, T: 'static>(
    source: &ShapeSchema<S>,
    target: &ShapeSchema<T>,
    config: &MapperConfig,
) -> RuleSet {
    let mut rules = RuleSet::new();
    if !config.auto_match {
        return rules;
    }

    for source_field in source.fields() {
        let Some(target_field) = target.field(source_field.name()) else {
            continue;
        };
        if !target_field.is_writable() {
            continue;
        }
        if is_auto_compatible(
            source_field.field_type(),
            target_field.field_type(),
            config.match_nullable,
        ) {
            rules.push(MappingRule::auto_matched(
                source_field.name(),
                target_field.name(),
            ));
        }
    }

    debug!(
        "Auto-matched {} of {} source fields ({} => {})",
        rules.len(),
        source.fields().len(),
        source.name(),
        target.name()
    );
    rules
}
