use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ClassificationRecord, ClassificationRowView, RecordId};
use super::editor::{EditError, FieldsPatch, RuleDraft};
use super::report::{ClassificationMetrics, VerdictDistribution};
use super::repository::{ClassificationRepository, RepositoryError};
use super::resolver::{EvaluationContext, Resolution};
use super::service::{ClassificationService, ClassificationServiceError};
use super::table::RecordQuery;

/// Body accepted when saving the rule editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleEditRequest {
    pub rules: Vec<RuleDraft>,
}

/// Body accepted when saving the full edit modal. Omitted attributes keep their
/// stored value; omitting `rules` keeps the stored rule set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordEditRequest {
    #[serde(flatten)]
    pub fields: FieldsPatch,
    #[serde(default)]
    pub rules: Option<Vec<RuleDraft>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerdictResponse {
    pub record_id: RecordId,
    pub url: String,
    pub verdict_label: &'static str,
    #[serde(flatten)]
    pub resolution: Resolution,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub metrics: ClassificationMetrics,
    pub verdicts: VerdictDistribution,
}

/// Router builder exposing the dashboard endpoints.
pub fn classification_router<R>(service: Arc<ClassificationService<R>>) -> Router
where
    R: ClassificationRepository + 'static,
{
    Router::new()
        .route("/api/v1/classifications", get(list_handler::<R>))
        .route(
            "/api/v1/classifications/:record_id",
            get(record_handler::<R>).patch(update_record_handler::<R>),
        )
        .route(
            "/api/v1/classifications/:record_id/verdict",
            get(verdict_handler::<R>),
        )
        .route(
            "/api/v1/classifications/:record_id/rules",
            put(update_rules_handler::<R>),
        )
        .route("/api/v1/metrics/classifications", get(metrics_handler::<R>))
        .route("/api/v1/scopes", get(scopes_handler::<R>))
        .with_state(service)
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<ClassificationService<R>>>,
    Query(query): Query<RecordQuery>,
) -> Response
where
    R: ClassificationRepository + 'static,
{
    match service.list_records(&query) {
        Ok(records) => {
            let rows: Vec<ClassificationRowView> =
                records.iter().map(ClassificationRecord::row_view).collect();
            (StatusCode::OK, axum::Json(rows)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn record_handler<R>(
    State(service): State<Arc<ClassificationService<R>>>,
    Path(record_id): Path<u32>,
) -> Response
where
    R: ClassificationRepository + 'static,
{
    match service.get_record(RecordId(record_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record.row_view())).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn verdict_handler<R>(
    State(service): State<Arc<ClassificationService<R>>>,
    Path(record_id): Path<u32>,
    Query(context): Query<EvaluationContext>,
) -> Response
where
    R: ClassificationRepository + 'static,
{
    let id = RecordId(record_id);
    let record = match service.get_record(id) {
        Ok(record) => record,
        Err(other) => return error_response(other),
    };

    match service.resolve_verdict(id, &context) {
        Ok(resolution) => {
            let view = VerdictResponse {
                record_id: id,
                url: record.url,
                verdict_label: resolution.verdict.label(),
                resolution,
            };
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn update_rules_handler<R>(
    State(service): State<Arc<ClassificationService<R>>>,
    Path(record_id): Path<u32>,
    axum::Json(request): axum::Json<RuleEditRequest>,
) -> Response
where
    R: ClassificationRepository + 'static,
{
    match service.apply_rule_drafts(RecordId(record_id), request.rules) {
        Ok(record) => (StatusCode::OK, axum::Json(record.row_view())).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn update_record_handler<R>(
    State(service): State<Arc<ClassificationService<R>>>,
    Path(record_id): Path<u32>,
    axum::Json(request): axum::Json<RecordEditRequest>,
) -> Response
where
    R: ClassificationRepository + 'static,
{
    match service.apply_record_edit(RecordId(record_id), request.fields, request.rules) {
        Ok(record) => (StatusCode::OK, axum::Json(record.row_view())).into_response(),
        Err(other) => error_response(other),
    }
}

pub(crate) async fn metrics_handler<R>(
    State(service): State<Arc<ClassificationService<R>>>,
    Query(context): Query<EvaluationContext>,
) -> Response
where
    R: ClassificationRepository + 'static,
{
    let metrics = match service.aggregate_metrics() {
        Ok(metrics) => metrics,
        Err(other) => return error_response(other),
    };

    match service.verdict_distribution(&context) {
        Ok(verdicts) => {
            let payload = MetricsResponse { metrics, verdicts };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(other) => error_response(other),
    }
}

pub(crate) async fn scopes_handler<R>(
    State(service): State<Arc<ClassificationService<R>>>,
) -> Response
where
    R: ClassificationRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.registry().entries())).into_response()
}

fn error_response(error: ClassificationServiceError) -> Response {
    match error {
        ClassificationServiceError::Repository(RepositoryError::NotFound) => {
            let payload = json!({ "error": "classification record not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ClassificationServiceError::Edit(EditError::NotReady { violations }) => {
            let payload = json!({
                "error": "rule set failed validation",
                "violations": violations,
                "messages": violations.iter().map(ToString::to_string).collect::<Vec<_>>(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        ClassificationServiceError::Edit(error @ EditError::UnknownRule { .. }) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
