use super::rules::{RuleBadge, RuleSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for classified URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u32);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Application category shown in the table and offered by the edit modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppType {
    Productivity,
    Crm,
    Erp,
    SearchEngine,
    SocialMedia,
    MessagingAndCommunication,
    Entertainment,
    Education,
    HealthAndFitness,
    Finance,
    Shopping,
    Games,
    NavigationAndMaps,
    PhotographyAndVideo,
}

impl AppType {
    pub const fn ordered() -> [Self; 14] {
        [
            Self::Productivity,
            Self::Crm,
            Self::Erp,
            Self::SearchEngine,
            Self::SocialMedia,
            Self::MessagingAndCommunication,
            Self::Entertainment,
            Self::Education,
            Self::HealthAndFitness,
            Self::Finance,
            Self::Shopping,
            Self::Games,
            Self::NavigationAndMaps,
            Self::PhotographyAndVideo,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Productivity => "Productivity",
            Self::Crm => "CRM",
            Self::Erp => "ERP",
            Self::SearchEngine => "Search Engine",
            Self::SocialMedia => "Social Media",
            Self::MessagingAndCommunication => "Messaging and Communication",
            Self::Entertainment => "Entertainment",
            Self::Education => "Education",
            Self::HealthAndFitness => "Health and Fitness",
            Self::Finance => "Finance",
            Self::Shopping => "Shopping",
            Self::Games => "Games",
            Self::NavigationAndMaps => "Navigation and Maps",
            Self::PhotographyAndVideo => "Photography and Video",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::High, Self::Medium, Self::Low]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    /// Sort weight, highest risk first.
    pub(crate) const fn severity(self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    Sanctioned,
    Unsanctioned,
    UnderAnalysis,
}

impl ApprovalStatus {
    pub const fn ordered() -> [Self; 3] {
        [Self::Sanctioned, Self::Unsanctioned, Self::UnderAnalysis]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Sanctioned => "Sanctioned",
            Self::Unsanctioned => "Unsanctioned",
            Self::UnderAnalysis => "Under Analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManagementType {
    ItManaged,
    NonItManaged,
    EmployeePurchases,
}

impl ManagementType {
    pub const fn ordered() -> [Self; 3] {
        [Self::ItManaged, Self::NonItManaged, Self::EmployeePurchases]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ItManaged => "IT Managed Apps",
            Self::NonItManaged => "Non-IT Managed",
            Self::EmployeePurchases => "Employee Purchases",
        }
    }
}

/// Coarse ownership bucket shown in the metrics panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppBucket {
    Internal,
    External,
    Unknown,
}

/// The four single-choice attributes the edit modal offers next to the rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationFields {
    pub app_type: AppType,
    pub risk_level: RiskLevel,
    pub approval_status: ApprovalStatus,
    pub management_type: ManagementType,
}

/// Full classification state of one discovered URL.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRecord {
    pub id: RecordId,
    pub url: String,
    pub access_count: u64,
    pub is_saas: bool,
    pub app_type: AppType,
    pub risk_level: RiskLevel,
    pub approval_status: ApprovalStatus,
    pub management_type: ManagementType,
    pub rules: RuleSet,
    /// Number of committed edits since the catalog was loaded.
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClassificationRecord {
    /// Employee purchases bypass IT procurement, so their ownership is unknown.
    pub fn bucket(&self) -> AppBucket {
        match self.management_type {
            ManagementType::ItManaged => AppBucket::Internal,
            ManagementType::NonItManaged => AppBucket::External,
            ManagementType::EmployeePurchases => AppBucket::Unknown,
        }
    }

    pub fn fields(&self) -> ClassificationFields {
        ClassificationFields {
            app_type: self.app_type,
            risk_level: self.risk_level,
            approval_status: self.approval_status,
            management_type: self.management_type,
        }
    }

    pub(crate) fn set_fields(&mut self, fields: ClassificationFields) {
        self.app_type = fields.app_type;
        self.risk_level = fields.risk_level;
        self.approval_status = fields.approval_status;
        self.management_type = fields.management_type;
    }

    /// Row payload for the classification table.
    pub fn row_view(&self) -> ClassificationRowView {
        ClassificationRowView {
            id: self.id,
            url: self.url.clone(),
            access_count: self.access_count,
            is_saas: self.is_saas,
            app_type: self.app_type,
            app_type_label: self.app_type.label(),
            risk_level: self.risk_level,
            risk_label: self.risk_level.label(),
            approval_status: self.approval_status,
            approval_label: self.approval_status.label(),
            management_type: self.management_type,
            management_label: self.management_type.label(),
            rule_badges: self.rules.badges(),
            revision: self.revision,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationRowView {
    pub id: RecordId,
    pub url: String,
    pub access_count: u64,
    pub is_saas: bool,
    pub app_type: AppType,
    pub app_type_label: &'static str,
    pub risk_level: RiskLevel,
    pub risk_label: &'static str,
    pub approval_status: ApprovalStatus,
    pub approval_label: &'static str,
    pub management_type: ManagementType,
    pub management_label: &'static str,
    pub rule_badges: Vec<RuleBadge>,
    pub revision: u64,
}
