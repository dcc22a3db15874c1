//! The immutable collection of configured rules and symbol lookup over it.

use crate::rule::{DisallowedCall, RuleKind};
use crate::symbol::{Symbol, SymbolKind, SymbolPattern};

/// A rule whose pattern matched a candidate symbol.
#[derive(Debug, Clone, Copy)]
pub struct RuleMatch<'a> {
    /// Position of the rule in its [`RuleSet`].
    pub index: usize,
    /// The matched rule.
    pub rule: &'a DisallowedCall,
    /// The pattern of the rule that matched.
    pub pattern: &'a SymbolPattern,
}

/// All configured rules, in configuration order.
///
/// Built once at load time and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<DisallowedCall>,
}

impl RuleSet {
    /// Creates a rule set.
    #[must_use]
    pub fn new(rules: Vec<DisallowedCall>) -> Self {
        Self { rules }
    }

    /// Returns the number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if there are no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns all rules.
    #[must_use]
    pub fn rules(&self) -> &[DisallowedCall] {
        &self.rules
    }

    /// Iterates over the rules of one kind.
    pub fn of_kind(&self, kind: RuleKind) -> impl Iterator<Item = &DisallowedCall> {
        self.rules.iter().filter(move |r| r.kind() == kind)
    }

    /// Finds every rule applying to call sites of `kind` whose patterns
    /// match `symbol` and whose exclusions do not.
    pub fn matches_for<'a>(
        &'a self,
        kind: SymbolKind,
        symbol: &'a Symbol,
    ) -> impl Iterator<Item = RuleMatch<'a>> + 'a {
        self.rules
            .iter()
            .enumerate()
            .filter(move |(_, rule)| rule.kind().applies_to(kind))
            .filter_map(move |(index, rule)| {
                rule.matching_pattern(symbol).map(|pattern| RuleMatch {
                    index,
                    rule,
                    pattern,
                })
            })
    }
}

impl FromIterator<DisallowedCall> for RuleSet {
    fn from_iter<I: IntoIterator<Item = DisallowedCall>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(kind: RuleKind, pattern: &str) -> DisallowedCall {
        DisallowedCall::builder(kind)
            .call(SymbolPattern::new(pattern).unwrap())
            .build()
            .unwrap()
    }

    fn rule_set() -> RuleSet {
        let runner = DisallowedCall::builder(RuleKind::Method)
            .call(SymbolPattern::new("Waldo\\Quux\\Blade::run*()").unwrap())
            .exclude(SymbolPattern::new("Waldo\\Quux\\Blade::runway()").unwrap())
            .build()
            .unwrap();
        vec![
            runner,
            rule(RuleKind::Method, "Waldo\\Quux\\Blade::movie()"),
            rule(RuleKind::Function, "movie()"),
            rule(RuleKind::Method, "Waldo\\Quux\\Blade::*"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn matches_in_configuration_order() {
        let set = rule_set();
        let runner = Symbol::method("Waldo\\Quux\\Blade::runner").unwrap();
        let found: Vec<_> = set
            .matches_for(SymbolKind::InstanceMethod, &runner)
            .map(|m| (m.index, m.pattern.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![(0, "Waldo\\Quux\\Blade::run*"), (3, "Waldo\\Quux\\Blade::*")]
        );
    }

    #[test]
    fn exclusion_only_skips_its_own_rule() {
        let set = rule_set();
        let runway = Symbol::static_method("Waldo\\Quux\\Blade::runway").unwrap();
        let found: Vec<_> = set
            .matches_for(SymbolKind::StaticMethod, &runway)
            .map(|m| m.index)
            .collect();
        assert_eq!(found, vec![3]);
    }

    #[test]
    fn rule_kind_filters_call_kind() {
        let set = rule_set();
        let movie = Symbol::function("movie").unwrap();
        let m = set.matches_for(SymbolKind::Function, &movie).next().unwrap();
        assert_eq!(m.index, 2);
        assert!(set
            .matches_for(SymbolKind::InstanceMethod, &movie)
            .next()
            .is_none());
    }

    #[test]
    fn of_kind_and_len() {
        let set = rule_set();
        assert_eq!(set.len(), 4);
        assert_eq!(set.of_kind(RuleKind::Function).count(), 1);
        assert!(RuleSet::default().is_empty());
    }
}
