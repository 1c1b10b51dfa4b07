use crate::classification::{
    AppType, ApprovalStatus, ClassificationRecord, ManagementType, ProductivityLevel, RecordId,
    RiskLevel, Rule, RuleSet, ScopeKind,
};

use ApprovalStatus::{Sanctioned, UnderAnalysis, Unsanctioned};
use ManagementType::{EmployeePurchases, ItManaged, NonItManaged};
use ProductivityLevel::{Neutral, NonProductive, Productive};
use RiskLevel::{High, Low, Medium};

struct SampleApp {
    url: &'static str,
    access_count: u64,
    is_saas: bool,
    app_type: AppType,
    risk_level: RiskLevel,
    approval_status: ApprovalStatus,
    management_type: ManagementType,
    rules: fn() -> Vec<Rule>,
}

const SAMPLE_APPS: &[SampleApp] = &[
    SampleApp {
        url: "google.com",
        access_count: 55878,
        is_saas: true,
        app_type: AppType::SearchEngine,
        risk_level: Low,
        approval_status: Sanctioned,
        management_type: ItManaged,
        rules: || vec![Rule::organization(Productive)],
    },
    SampleApp {
        url: "facebook.com",
        access_count: 34521,
        is_saas: true,
        app_type: AppType::SocialMedia,
        risk_level: Medium,
        approval_status: UnderAnalysis,
        management_type: NonItManaged,
        rules: || {
            vec![
                Rule::organization(NonProductive),
                Rule::scoped(Productive, ScopeKind::Sector, "Marketing"),
            ]
        },
    },
    SampleApp {
        url: "salesforce.com",
        access_count: 1284,
        is_saas: true,
        app_type: AppType::Crm,
        risk_level: Low,
        approval_status: Sanctioned,
        management_type: ItManaged,
        rules: || {
            vec![
                Rule::organization(Neutral),
                Rule::scoped(Productive, ScopeKind::Sector, "Sales"),
                Rule::scoped(Productive, ScopeKind::Sector, "Marketing"),
            ]
        },
    },
    SampleApp {
        url: "slack.com",
        access_count: 3920,
        is_saas: true,
        app_type: AppType::MessagingAndCommunication,
        risk_level: Low,
        approval_status: Sanctioned,
        management_type: ItManaged,
        rules: || vec![Rule::organization(Productive)],
    },
    SampleApp {
        url: "hubspot.com",
        access_count: 640,
        is_saas: true,
        app_type: AppType::Crm,
        risk_level: Medium,
        approval_status: UnderAnalysis,
        management_type: NonItManaged,
        rules: || vec![Rule::scoped(Productive, ScopeKind::Sector, "Marketing")],
    },
    SampleApp {
        url: "dropbox.com",
        access_count: 512,
        is_saas: true,
        app_type: AppType::Productivity,
        risk_level: High,
        approval_status: Unsanctioned,
        management_type: EmployeePurchases,
        rules: || {
            vec![
                Rule::organization(NonProductive),
                Rule::scoped(Neutral, ScopeKind::CostCenter, "CC2"),
            ]
        },
    },
    SampleApp {
        url: "sap.com",
        access_count: 2210,
        is_saas: true,
        app_type: AppType::Erp,
        risk_level: Medium,
        approval_status: Sanctioned,
        management_type: ItManaged,
        rules: || {
            vec![
                Rule::organization(Neutral),
                Rule::scoped(Productive, ScopeKind::Sector, "Engineering"),
                Rule::scoped(Productive, ScopeKind::Department, "IT"),
            ]
        },
    },
    SampleApp {
        url: "waze.com",
        access_count: 97,
        is_saas: false,
        app_type: AppType::NavigationAndMaps,
        risk_level: Low,
        approval_status: Sanctioned,
        management_type: EmployeePurchases,
        rules: || vec![Rule::organization(Neutral)],
    },
    SampleApp {
        url: "coursera.org",
        access_count: 233,
        is_saas: true,
        app_type: AppType::Education,
        risk_level: Low,
        approval_status: UnderAnalysis,
        management_type: NonItManaged,
        rules: Vec::new,
    },
    SampleApp {
        url: "store.steampowered.com",
        access_count: 41,
        is_saas: false,
        app_type: AppType::Games,
        risk_level: High,
        approval_status: Unsanctioned,
        management_type: EmployeePurchases,
        rules: || {
            vec![
                Rule::organization(NonProductive),
                Rule::scoped(Neutral, ScopeKind::Department, "HR"),
            ]
        },
    },
];

/// Hard-coded catalog shown by the dashboard when no export is configured.
pub fn sample_catalog() -> Vec<ClassificationRecord> {
    SAMPLE_APPS
        .iter()
        .zip(1u32..)
        .map(|(app, id)| ClassificationRecord {
            id: RecordId(id),
            url: app.url.to_string(),
            access_count: app.access_count,
            is_saas: app.is_saas,
            app_type: app.app_type,
            risk_level: app.risk_level,
            approval_status: app.approval_status,
            management_type: app.management_type,
            rules: RuleSet::from_checked((app.rules)()),
            revision: 0,
            updated_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::{resolve, EvaluationContext, ScopeRegistry, Verdict};

    #[test]
    fn sample_rules_pass_registry_validation() {
        let registry = ScopeRegistry::standard();
        for record in sample_catalog() {
            let rules = record.rules.rules().to_vec();
            assert!(
                RuleSet::try_new(rules, &registry).is_ok(),
                "{} carries invalid rules",
                record.url
            );
        }
    }

    #[test]
    fn dashboard_rows_lead_the_catalog() {
        let catalog = sample_catalog();
        assert_eq!(catalog[0].url, "google.com");
        assert_eq!(catalog[0].access_count, 55878);
        assert_eq!(catalog[0].app_type, AppType::SearchEngine);
        assert_eq!(catalog[1].url, "facebook.com");
        assert_eq!(catalog[1].approval_status, UnderAnalysis);
    }

    #[test]
    fn facebook_resolves_per_sector() {
        let facebook = &sample_catalog()[1];
        let marketing = EvaluationContext::organization().with_sector("Marketing");

        assert_eq!(
            resolve(&facebook.rules, &marketing),
            Verdict::Classified(Productive)
        );
        assert_eq!(
            resolve(&facebook.rules, &EvaluationContext::default()),
            Verdict::Classified(NonProductive)
        );
    }

    #[test]
    fn sample_ids_are_sequential() {
        let ids: Vec<u32> = sample_catalog().iter().map(|record| record.id.0).collect();
        assert_eq!(ids, (1..=SAMPLE_APPS.len() as u32).collect::<Vec<_>>());
    }
}
