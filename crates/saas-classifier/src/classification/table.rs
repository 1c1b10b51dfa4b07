use super::domain::{ApprovalStatus, ClassificationRecord, RiskLevel};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Url,
    AccessCount,
    RiskLevel,
    AppType,
    ApprovalStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Filters and ordering for the classification table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    /// Case-insensitive URL substring.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub risk: Option<RiskLevel>,
    #[serde(default)]
    pub approval: Option<ApprovalStatus>,
    #[serde(default)]
    pub saas_only: bool,
    #[serde(default)]
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub direction: SortDirection,
}

impl RecordQuery {
    pub fn matches(&self, record: &ClassificationRecord) -> bool {
        if self.saas_only && !record.is_saas {
            return false;
        }
        if self.risk.is_some_and(|risk| risk != record.risk_level) {
            return false;
        }
        if self
            .approval
            .is_some_and(|approval| approval != record.approval_status)
        {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => record
                .url
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }

    /// Filter then sort. Sorting is stable so ties keep catalog order.
    pub fn apply(&self, records: Vec<ClassificationRecord>) -> Vec<ClassificationRecord> {
        let mut rows: Vec<ClassificationRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();

        if let Some(key) = self.sort {
            rows.sort_by(|left, right| {
                let ordering = compare(key, left, right);
                match self.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        rows
    }
}

fn compare(key: SortKey, left: &ClassificationRecord, right: &ClassificationRecord) -> Ordering {
    match key {
        SortKey::Url => left
            .url
            .to_lowercase()
            .cmp(&right.url.to_lowercase()),
        SortKey::AccessCount => left.access_count.cmp(&right.access_count),
        // ascending puts the riskiest rows first
        SortKey::RiskLevel => right
            .risk_level
            .severity()
            .cmp(&left.risk_level.severity()),
        SortKey::AppType => left.app_type.label().cmp(right.app_type.label()),
        SortKey::ApprovalStatus => left
            .approval_status
            .label()
            .cmp(right.approval_status.label()),
    }
}
