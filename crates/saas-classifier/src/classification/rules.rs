use super::editor::{check_drafts, RuleDraft};
use super::scope::{ScopeKind, ScopeRegistry, ScopeValue};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Productivity assertion a rule makes about an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductivityLevel {
    Productive,
    NonProductive,
    Neutral,
}

impl ProductivityLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::Productive, Self::NonProductive, Self::Neutral]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Productive => "Productive",
            Self::NonProductive => "Non-Productive",
            Self::Neutral => "Neutral",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "productive" => Some(Self::Productive),
            "non_productive" | "nonproductive" | "unproductive" => Some(Self::NonProductive),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for ProductivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single productivity rule scoped to an organizational unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    level: ProductivityLevel,
    scope: ScopeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope_value: Option<ScopeValue>,
}

impl Rule {
    pub fn new(level: ProductivityLevel, scope: ScopeKind, scope_value: Option<ScopeValue>) -> Self {
        Self {
            level,
            scope,
            scope_value,
        }
    }

    /// Organization-wide default rule.
    pub fn organization(level: ProductivityLevel) -> Self {
        Self::new(level, ScopeKind::Organization, None)
    }

    pub fn scoped(level: ProductivityLevel, scope: ScopeKind, value: impl Into<ScopeValue>) -> Self {
        Self::new(level, scope, Some(value.into()))
    }

    pub fn level(&self) -> ProductivityLevel {
        self.level
    }

    pub fn scope(&self) -> ScopeKind {
        self.scope
    }

    pub fn scope_value(&self) -> Option<&ScopeValue> {
        self.scope_value.as_ref()
    }

    pub fn is_organization(&self) -> bool {
        self.scope == ScopeKind::Organization
    }

    pub fn badge(&self) -> RuleBadge {
        let text = match &self.scope_value {
            Some(value) => format!("{} for {} {}", self.level.label(), self.scope.label(), value),
            None => format!("{} for {}", self.level.label(), self.scope.label()),
        };

        RuleBadge {
            level: self.level,
            level_label: self.level.label(),
            scope: self.scope,
            scope_label: self.scope.label(),
            scope_value: self.scope_value.clone(),
            text,
        }
    }
}

/// Ordered, validated rules attached to one classification record.
///
/// Holds at most one organization rule and only registry-valid scope values.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate `rules` against the registry, preserving their order.
    pub fn try_new(rules: Vec<Rule>, registry: &ScopeRegistry) -> Result<Self, Vec<RuleViolation>> {
        let drafts: Vec<RuleDraft> = rules.iter().map(RuleDraft::from).collect();
        let violations = check_drafts(registry, &drafts);
        if violations.is_empty() {
            Ok(Self { rules })
        } else {
            Err(violations)
        }
    }

    pub(crate) fn from_checked(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn organization_rule(&self) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.is_organization())
    }

    /// Every rule rendered for the badge list, in insertion order and without resolution.
    pub fn badges(&self) -> Vec<RuleBadge> {
        self.rules.iter().map(Rule::badge).collect()
    }
}

/// Display payload for a single rule badge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleBadge {
    pub level: ProductivityLevel,
    pub level_label: &'static str,
    pub scope: ScopeKind,
    pub scope_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_value: Option<ScopeValue>,
    pub text: String,
}

/// Field a draft rule is still missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Level,
    Scope,
    ScopeValue,
}

impl MissingField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Level => "level",
            Self::Scope => "scope",
            Self::ScopeValue => "scope value",
        }
    }
}

/// Validation failure reported back to the rule editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleViolation {
    #[error("rule {index}: '{value}' is not a registered {scope} value")]
    InvalidScopeValue {
        index: usize,
        scope: ScopeKind,
        value: ScopeValue,
    },
    #[error("rule {index}: missing {}", .missing.label())]
    IncompleteRule { index: usize, missing: MissingField },
    #[error("rule {index}: only one organization rule is allowed")]
    DuplicateOrganizationRule { index: usize },
}

impl RuleViolation {
    pub fn index(&self) -> usize {
        match self {
            Self::InvalidScopeValue { index, .. }
            | Self::IncompleteRule { index, .. }
            | Self::DuplicateOrganizationRule { index } => *index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ProductivityLevel::*;

    #[test]
    fn try_new_accepts_one_organization_rule_and_scoped_rules() {
        let registry = ScopeRegistry::standard();
        let rules = RuleSet::try_new(
            vec![
                Rule::organization(NonProductive),
                Rule::scoped(Productive, ScopeKind::Sector, "Marketing"),
                Rule::scoped(Neutral, ScopeKind::CostCenter, "CC2"),
            ],
            &registry,
        )
        .expect("valid rule set");

        assert_eq!(rules.len(), 3);
        assert_eq!(
            rules.organization_rule().map(Rule::level),
            Some(NonProductive)
        );
    }

    #[test]
    fn try_new_rejects_second_organization_rule() {
        let registry = ScopeRegistry::standard();
        let violations = RuleSet::try_new(
            vec![Rule::organization(Productive), Rule::organization(Neutral)],
            &registry,
        )
        .expect_err("duplicate organization rule");

        assert_eq!(
            violations,
            vec![RuleViolation::DuplicateOrganizationRule { index: 1 }]
        );
    }

    #[test]
    fn try_new_rejects_unregistered_and_missing_values() {
        let registry = ScopeRegistry::standard();
        let violations = RuleSet::try_new(
            vec![
                Rule::scoped(Productive, ScopeKind::Department, "Finance"),
                Rule::new(Neutral, ScopeKind::Sector, None),
            ],
            &registry,
        )
        .expect_err("invalid rules");

        assert!(matches!(
            violations[0],
            RuleViolation::InvalidScopeValue { index: 0, scope: ScopeKind::Department, .. }
        ));
        assert_eq!(
            violations[1],
            RuleViolation::IncompleteRule {
                index: 1,
                missing: MissingField::ScopeValue
            }
        );
    }

    #[test]
    fn badges_list_every_rule_in_order() {
        let rules = RuleSet::from_checked(vec![
            Rule::organization(NonProductive),
            Rule::scoped(Productive, ScopeKind::Sector, "Marketing"),
            Rule::scoped(Neutral, ScopeKind::Sector, "Marketing"),
        ]);

        let badges = rules.badges();
        let texts: Vec<&str> = badges.iter().map(|badge| badge.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Non-Productive for Organization",
                "Productive for Sector Marketing",
                "Neutral for Sector Marketing",
            ]
        );
    }

    #[test]
    fn violation_messages_name_the_rule() {
        let violation = RuleViolation::IncompleteRule {
            index: 2,
            missing: MissingField::Scope,
        };
        assert_eq!(violation.to_string(), "rule 2: missing scope");
        assert_eq!(violation.index(), 2);
    }
}
