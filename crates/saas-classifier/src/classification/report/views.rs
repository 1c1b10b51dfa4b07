use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RiskDistribution {
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BucketDistribution {
    pub internal: f64,
    pub external: f64,
    pub unknown: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ApprovalDistribution {
    pub sanctioned: f64,
    pub unsanctioned: f64,
    pub under_analysis: f64,
}

/// Resolved verdict counts for one evaluation context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictDistribution {
    pub productive: usize,
    pub non_productive: usize,
    pub neutral: usize,
    pub unclassified: usize,
}

/// Metrics panel payload. Percentages range over 0-100.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationMetrics {
    pub total: usize,
    pub saas_pct: f64,
    pub risk: RiskDistribution,
    pub app_types: BucketDistribution,
    pub approval: ApprovalDistribution,
}
