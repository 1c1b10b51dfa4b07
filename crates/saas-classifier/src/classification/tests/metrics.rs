use super::common::*;
use crate::catalog::sample_catalog;
use crate::classification::domain::{AppType, ApprovalStatus, ManagementType, RiskLevel};
use crate::classification::report::views::{BucketDistribution, RiskDistribution};
use crate::classification::report::{ClassificationMetrics, VerdictDistribution};
use crate::classification::resolver::EvaluationContext;

#[test]
fn empty_catalog_reports_zero_percentages() {
    let metrics = ClassificationMetrics::from_records(&Vec::new());
    assert_eq!(metrics.total, 0);
    assert_eq!(metrics.saas_pct, 0.0);
    assert_eq!(
        metrics.risk,
        RiskDistribution {
            high: 0.0,
            medium: 0.0,
            low: 0.0
        }
    );
    assert_eq!(
        metrics.app_types,
        BucketDistribution {
            internal: 0.0,
            external: 0.0,
            unknown: 0.0
        }
    );
}

#[test]
fn metrics_split_risk_and_buckets() {
    let mut records = vec![
        record(1, "a.com", AppType::Crm, ManagementType::ItManaged, RiskLevel::High),
        record(
            2,
            "b.com",
            AppType::Shopping,
            ManagementType::EmployeePurchases,
            RiskLevel::Low,
        ),
        record(
            3,
            "c.com",
            AppType::Games,
            ManagementType::ItManaged,
            RiskLevel::Low,
        ),
        record(
            4,
            "d.com",
            AppType::Finance,
            ManagementType::NonItManaged,
            RiskLevel::Medium,
        ),
    ];
    records[3].is_saas = false;
    records[1].approval_status = ApprovalStatus::UnderAnalysis;

    let metrics = ClassificationMetrics::from_records(&records);

    assert_eq!(metrics.total, 4);
    assert_eq!(metrics.saas_pct, 75.0);
    assert_eq!(metrics.risk.high, 25.0);
    assert_eq!(metrics.risk.medium, 25.0);
    assert_eq!(metrics.risk.low, 50.0);
    // employee purchases land in the unknown bucket
    assert_eq!(metrics.app_types.internal, 50.0);
    assert_eq!(metrics.app_types.external, 25.0);
    assert_eq!(metrics.app_types.unknown, 25.0);
    assert_eq!(metrics.approval.sanctioned, 75.0);
    assert_eq!(metrics.approval.under_analysis, 25.0);
}

#[test]
fn sample_catalog_percentages_sum_to_hundred() {
    let metrics = ClassificationMetrics::from_records(&sample_catalog());
    let risk_total = metrics.risk.high + metrics.risk.medium + metrics.risk.low;
    let bucket_total =
        metrics.app_types.internal + metrics.app_types.external + metrics.app_types.unknown;

    assert!((risk_total - 100.0).abs() < 0.2);
    assert!((bucket_total - 100.0).abs() < 0.2);
    assert!(metrics.saas_pct > 0.0 && metrics.saas_pct < 100.0);
}

#[test]
fn verdict_distribution_counts_resolved_levels() {
    let mut records = vec![
        record(1, "a.com", AppType::Crm, ManagementType::ItManaged, RiskLevel::Low),
        record(2, "b.com", AppType::Crm, ManagementType::ItManaged, RiskLevel::Low),
    ];
    records[0].rules = marketing_override();

    let marketing = EvaluationContext::organization().with_sector("Marketing");
    let counts = VerdictDistribution::from_records(&records, &marketing);
    assert_eq!(counts.productive, 1);
    assert_eq!(counts.unclassified, 1);

    let everyone = VerdictDistribution::from_records(&records, &EvaluationContext::default());
    assert_eq!(everyone.non_productive, 1);
    assert_eq!(everyone.productive, 0);
}
