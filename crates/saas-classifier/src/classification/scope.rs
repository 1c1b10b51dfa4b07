use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Organizational unit a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Organization,
    Sector,
    Department,
    CostCenter,
}

impl ScopeKind {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Organization,
            Self::Sector,
            Self::Department,
            Self::CostCenter,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Organization => "Organization",
            Self::Sector => "Sector",
            Self::Department => "Department",
            Self::CostCenter => "Cost Center",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Sector => "sector",
            Self::Department => "department",
            Self::CostCenter => "cost_center",
        }
    }

    /// Whether rules at this scope must name a specific unit.
    pub const fn requires_value(self) -> bool {
        !matches!(self, Self::Organization)
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "organization" | "org" => Some(Self::Organization),
            "sector" => Some(Self::Sector),
            "department" => Some(Self::Department),
            "cost_center" | "costcenter" => Some(Self::CostCenter),
            _ => None,
        }
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Named unit within a scope, e.g. the `Marketing` sector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeValue(pub String);

impl ScopeValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScopeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScopeValue {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Catalog of the scope values a rule may target, keyed by scope kind.
///
/// `Organization` never has values: it is the catch-all scope.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScopeRegistry {
    values: BTreeMap<ScopeKind, BTreeSet<ScopeValue>>,
}

impl ScopeRegistry {
    /// Registry backing the settings dashboard pickers.
    pub fn standard() -> Self {
        const STANDARD: &[(ScopeKind, &[&str])] = &[
            (ScopeKind::Sector, &["Marketing", "Sales", "Engineering"]),
            (ScopeKind::Department, &["IT", "HR"]),
            (ScopeKind::CostCenter, &["CC1", "CC2"]),
        ];

        STANDARD
            .iter()
            .fold(Self::default(), |registry, (kind, values)| {
                values
                    .iter()
                    .fold(registry, |registry, value| registry.with_value(*kind, *value))
            })
    }

    /// Register an additional unit. Values for `Organization` are ignored.
    pub fn with_value(mut self, kind: ScopeKind, value: impl Into<ScopeValue>) -> Self {
        if kind.requires_value() {
            self.values.entry(kind).or_default().insert(value.into());
        }
        self
    }

    pub fn valid_values_for(&self, kind: ScopeKind) -> BTreeSet<ScopeValue> {
        self.values.get(&kind).cloned().unwrap_or_default()
    }

    pub fn is_valid(&self, kind: ScopeKind, value: &ScopeValue) -> bool {
        self.values
            .get(&kind)
            .map(|values| values.contains(value))
            .unwrap_or(false)
    }

    /// Picker payload: every scope kind in display order with its choices.
    pub fn entries(&self) -> Vec<ScopeEntry> {
        ScopeKind::ordered()
            .into_iter()
            .map(|kind| ScopeEntry {
                kind,
                label: kind.label(),
                values: self.valid_values_for(kind).into_iter().collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScopeEntry {
    pub kind: ScopeKind,
    pub label: &'static str,
    pub values: Vec<ScopeValue>,
}
