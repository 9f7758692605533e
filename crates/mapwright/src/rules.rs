//! Rule sets - the mapping being assembled.

use std::collections::HashMap;

use serde::Serialize;

/// How a rule entered the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOrigin {
    AutoMatched,
    Explicit,
}

/// A declared correspondence between one source field and one target field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingRule {
    pub source_field: String,
    pub target_field: String,
    pub origin: RuleOrigin,
}

impl MappingRule {
    pub fn auto_matched(source_field: impl Into<String>, target_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: target_field.into(),
            origin: RuleOrigin::AutoMatched,
        }
    }

    pub fn explicit(source_field: impl Into<String>, target_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: target_field.into(),
            origin: RuleOrigin::Explicit,
        }
    }
}

/// Why a field is excluded from mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Exclusion {
    /// Not mapped at all.
    Ignored,
    /// Populated by another process (nested or collection mapping).
    Deferred,
}

/// Ordered rules plus the source and target exclusion sets.
///
/// Rules replaced by an explicit rule are kept aside: they no longer write
/// anything, but their source field still counts as handled.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<MappingRule>,
    displaced: Vec<MappingRule>,
    excluded_source: HashMap<String, Exclusion>,
    excluded_target: HashMap<String, Exclusion>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules(&self) -> &[MappingRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append a rule, skipping exact duplicates of an existing pair.
    pub fn push(&mut self, rule: MappingRule) {
        if !self.contains_pair(&rule.source_field, &rule.target_field) {
            self.rules.push(rule);
        }
    }

    /// Insert an explicit rule. It takes over the write of every other rule on the
    /// same target field and returns the rules it displaced. Displaced rules keep
    /// covering their source field.
    pub fn insert_explicit(
        &mut self,
        source_field: &str,
        target_field: &str,
    ) -> Vec<MappingRule> {
        if let Some(existing) = self
            .rules
            .iter_mut()
            .find(|r| r.source_field == source_field && r.target_field == target_field)
        {
            existing.origin = RuleOrigin::Explicit;
            return Vec::new();
        }

        let (displaced, kept): (Vec<_>, Vec<_>) = self
            .rules
            .drain(..)
            .partition(|r| r.target_field == target_field);
        self.rules = kept;
        self.rules
            .push(MappingRule::explicit(source_field, target_field));

        self.displaced
            .retain(|r| !(r.source_field == source_field && r.target_field == target_field));
        self.displaced.extend(displaced.iter().cloned());
        displaced
    }

    /// Rules replaced by a later explicit rule on the same target.
    pub fn displaced_rules(&self) -> &[MappingRule] {
        &self.displaced
    }

    pub fn exclude_source(&mut self, field: impl Into<String>, reason: Exclusion) {
        self.excluded_source.insert(field.into(), reason);
    }

    pub fn exclude_target(&mut self, field: impl Into<String>, reason: Exclusion) {
        self.excluded_target.insert(field.into(), reason);
    }

    pub fn source_exclusion(&self, field: &str) -> Option<Exclusion> {
        self.excluded_source.get(field).copied()
    }

    pub fn target_exclusion(&self, field: &str) -> Option<Exclusion> {
        self.excluded_target.get(field).copied()
    }

    pub fn contains_pair(&self, source_field: &str, target_field: &str) -> bool {
        self.rules
            .iter()
            .any(|r| r.source_field == source_field && r.target_field == target_field)
    }

    /// True when a rule (displaced ones included) reads the field or it is excluded.
    pub fn covers_source(&self, field: &str) -> bool {
        self.excluded_source.contains_key(field)
            || self.rules.iter().any(|r| r.source_field == field)
            || self.displaced.iter().any(|r| r.source_field == field)
    }

    /// True when a rule writes the field or it is excluded.
    pub fn covers_target(&self, field: &str) -> bool {
        self.excluded_target.contains_key(field)
            || self.rules.iter().any(|r| r.target_field == field)
    }

    /// Rules that end up as writes: neither side is excluded.
    pub fn active_rules(&self) -> impl Iterator<Item = &MappingRule> + '_ {
        self.rules.iter().filter(|r| {
            !self.excluded_source.contains_key(&r.source_field)
                && !self.excluded_target.contains_key(&r.target_field)
        })
    }

    /// Fields of `names` not covered on the source side, in the given order.
    pub fn uncovered_source<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| !self.covers_source(name))
            .map(String::from)
            .collect()
    }

    /// Fields of `names` not covered on the target side, in the given order.
    pub fn uncovered_target<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        names
            .into_iter()
            .filter(|name| !self.covers_target(name))
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> RuleSet {
        let mut rules = RuleSet::new();
        rules.push(MappingRule::auto_matched("name", "name"));
        rules.push(MappingRule::auto_matched("amount", "amount"));
        rules
    }

    #[test]
    fn test_push_skips_duplicate_pairs() {
        let mut rules = seeded();
        rules.push(MappingRule::auto_matched("name", "name"));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_explicit_rule_displaces_same_target() {
        let mut rules = seeded();
        let displaced = rules.insert_explicit("nickname", "name");

        assert_eq!(displaced, vec![MappingRule::auto_matched("name", "name")]);
        assert!(rules.contains_pair("nickname", "name"));
        assert!(!rules.contains_pair("name", "name"));
        assert_eq!(rules.displaced_rules(), displaced.as_slice());

        // The displaced source stays handled but no longer writes.
        assert!(rules.covers_source("name"));
        assert!(rules.covers_target("name"));
        let writers: Vec<&str> = rules
            .active_rules()
            .filter(|r| r.target_field == "name")
            .map(|r| r.source_field.as_str())
            .collect();
        assert_eq!(writers, vec!["nickname"]);
    }

    #[test]
    fn test_restoring_displaced_pair() {
        let mut rules = seeded();
        rules.insert_explicit("nickname", "name");
        rules.insert_explicit("name", "name");

        assert!(rules.contains_pair("name", "name"));
        assert!(!rules.contains_pair("nickname", "name"));
        assert_eq!(
            rules.displaced_rules(),
            [MappingRule::explicit("nickname", "name")].as_slice()
        );
        assert!(rules.covers_source("nickname"));
    }

    #[test]
    fn test_explicit_rule_over_identical_pair_is_kept_once() {
        let mut rules = seeded();
        let displaced = rules.insert_explicit("name", "name");

        assert!(displaced.is_empty());
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.rules()[0].origin, RuleOrigin::Explicit);
    }

    #[test]
    fn test_source_may_feed_several_targets() {
        let mut rules = seeded();
        rules.insert_explicit("name", "display_name");
        assert!(rules.contains_pair("name", "name"));
        assert!(rules.contains_pair("name", "display_name"));
    }

    #[test]
    fn test_exclusions_cover_and_deactivate() {
        let mut rules = seeded();
        rules.exclude_target("amount", Exclusion::Deferred);

        assert!(rules.covers_source("amount"));
        assert_eq!(rules.target_exclusion("amount"), Some(Exclusion::Deferred));
        let active: Vec<&str> = rules
            .active_rules()
            .map(|r| r.target_field.as_str())
            .collect();
        assert_eq!(active, vec!["name"]);
    }

    #[test]
    fn test_uncovered_keeps_given_order() {
        let mut rules = seeded();
        rules.exclude_source("secret", Exclusion::Ignored);

        let uncovered = rules.uncovered_source(["zeta", "name", "secret", "alpha"]);
        assert_eq!(uncovered, vec!["zeta".to_string(), "alpha".to_string()]);
    }
}
