use super::rules::{ProductivityLevel, Rule, RuleSet};
use super::scope::{ScopeKind, ScopeValue};
use serde::{Deserialize, Serialize};

/// Organizational membership a verdict is resolved for. Every field is optional;
/// the organization itself is always implied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationContext {
    #[serde(default)]
    pub sector: Option<ScopeValue>,
    #[serde(default)]
    pub department: Option<ScopeValue>,
    #[serde(default)]
    pub cost_center: Option<ScopeValue>,
}

impl EvaluationContext {
    pub fn organization() -> Self {
        Self::default()
    }

    pub fn with_sector(mut self, value: impl Into<ScopeValue>) -> Self {
        self.sector = Some(value.into());
        self
    }

    pub fn with_department(mut self, value: impl Into<ScopeValue>) -> Self {
        self.department = Some(value.into());
        self
    }

    pub fn with_cost_center(mut self, value: impl Into<ScopeValue>) -> Self {
        self.cost_center = Some(value.into());
        self
    }

    pub fn value_for(&self, scope: ScopeKind) -> Option<&ScopeValue> {
        match scope {
            ScopeKind::Organization => None,
            ScopeKind::Sector => self.sector.as_ref(),
            ScopeKind::Department => self.department.as_ref(),
            ScopeKind::CostCenter => self.cost_center.as_ref(),
        }
    }

    fn matches(&self, rule: &Rule) -> bool {
        match (self.value_for(rule.scope()), rule.scope_value()) {
            (Some(member_of), Some(target)) => member_of == target,
            _ => false,
        }
    }
}

/// Effective productivity for a context. `Unclassified` means no rule applied,
/// which is not the same as a declared `Neutral`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "level")]
pub enum Verdict {
    Classified(ProductivityLevel),
    Unclassified,
}

impl Verdict {
    pub fn level(self) -> Option<ProductivityLevel> {
        match self {
            Self::Classified(level) => Some(level),
            Self::Unclassified => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Classified(level) => level.label(),
            Self::Unclassified => "Unclassified",
        }
    }
}

/// How a verdict was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSource {
    ScopedRule,
    OrganizationFallback,
    NoApplicableRule,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub verdict: Verdict,
    pub source: VerdictSource,
    /// Position of the deciding rule within the rule set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_index: Option<usize>,
}

/// Collapse a rule set into the effective verdict for `context`.
///
/// The last matching scoped rule wins, then the organization rule, then
/// `Unclassified`.
pub fn resolve(rules: &RuleSet, context: &EvaluationContext) -> Verdict {
    explain(rules, context).verdict
}

pub fn explain(rules: &RuleSet, context: &EvaluationContext) -> Resolution {
    let scoped = rules
        .rules()
        .iter()
        .enumerate()
        .rev()
        .find(|(_, rule)| !rule.is_organization() && context.matches(rule));

    if let Some((index, rule)) = scoped {
        return Resolution {
            verdict: Verdict::Classified(rule.level()),
            source: VerdictSource::ScopedRule,
            rule_index: Some(index),
        };
    }

    let fallback = rules
        .rules()
        .iter()
        .enumerate()
        .find(|(_, rule)| rule.is_organization());

    match fallback {
        Some((index, rule)) => Resolution {
            verdict: Verdict::Classified(rule.level()),
            source: VerdictSource::OrganizationFallback,
            rule_index: Some(index),
        },
        None => Resolution {
            verdict: Verdict::Unclassified,
            source: VerdictSource::NoApplicableRule,
            rule_index: None,
        },
    }
}
