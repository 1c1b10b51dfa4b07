use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::sample_catalog;
use crate::classification::domain::{
    AppType, ApprovalStatus, ClassificationRecord, ManagementType, RecordId, RiskLevel,
};
use crate::classification::repository::{
    ClassificationRepository, InMemoryClassificationRepository, RepositoryError,
};
use crate::classification::rules::{ProductivityLevel, Rule, RuleSet};
use crate::classification::scope::{ScopeKind, ScopeRegistry};
use crate::classification::{classification_router, ClassificationService};

pub(super) fn registry() -> ScopeRegistry {
    ScopeRegistry::standard()
}

pub(super) fn rule_set(rules: Vec<Rule>) -> RuleSet {
    RuleSet::try_new(rules, &registry()).expect("fixture rules are valid")
}

/// Organization says non-productive, marketing overrides to productive.
pub(super) fn marketing_override() -> RuleSet {
    rule_set(vec![
        Rule::organization(ProductivityLevel::NonProductive),
        Rule::scoped(ProductivityLevel::Productive, ScopeKind::Sector, "Marketing"),
    ])
}

pub(super) fn record(
    id: u32,
    url: &str,
    app_type: AppType,
    management_type: ManagementType,
    risk_level: RiskLevel,
) -> ClassificationRecord {
    ClassificationRecord {
        id: RecordId(id),
        url: url.to_string(),
        access_count: u64::from(id) * 10,
        is_saas: true,
        app_type,
        risk_level,
        approval_status: ApprovalStatus::Sanctioned,
        management_type,
        rules: RuleSet::empty(),
        revision: 0,
        updated_at: None,
    }
}

pub(super) fn build_service() -> (
    ClassificationService<InMemoryClassificationRepository>,
    Arc<InMemoryClassificationRepository>,
) {
    let repository = Arc::new(InMemoryClassificationRepository::new(sample_catalog()));
    let service = ClassificationService::new(repository.clone(), registry());
    (service, repository)
}

pub(super) fn router_with_sample_catalog() -> axum::Router {
    let (service, _) = build_service();
    classification_router(Arc::new(service))
}

pub(super) struct UnavailableRepository;

impl ClassificationRepository for UnavailableRepository {
    fn list(&self) -> Result<Vec<ClassificationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog service offline".to_string()))
    }

    fn fetch(&self, _id: RecordId) -> Result<Option<ClassificationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog service offline".to_string()))
    }

    fn replace(&self, _record: ClassificationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("catalog service offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
