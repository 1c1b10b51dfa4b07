//! Rule model, edit sessions, precedence resolution, and dashboard metrics for
//! classified application URLs.
//!
//! Display (`RuleSet::badges`) and resolution (`resolve`) are separate paths:
//! the table shows every rule as configured, while the resolver collapses a
//! rule set into one verdict only when a single answer is needed.

pub mod domain;
pub mod editor;
pub mod report;
pub mod repository;
pub mod resolver;
pub mod router;
pub mod rules;
pub mod scope;
pub mod service;
pub mod table;

#[cfg(test)]
mod tests;

pub use domain::{
    AppBucket, AppType, ApprovalStatus, ClassificationFields, ClassificationRecord,
    ClassificationRowView, ManagementType, RecordId, RiskLevel,
};
pub use editor::{EditError, EditState, FieldsPatch, RecordEdit, RuleDraft, RuleSetBuilder};
pub use report::{ClassificationMetrics, VerdictDistribution};
pub use repository::{ClassificationRepository, InMemoryClassificationRepository, RepositoryError};
pub use resolver::{explain, resolve, EvaluationContext, Resolution, Verdict, VerdictSource};
pub use router::{classification_router, RecordEditRequest, RuleEditRequest};
pub use rules::{MissingField, ProductivityLevel, Rule, RuleBadge, RuleSet, RuleViolation};
pub use scope::{ScopeEntry, ScopeKind, ScopeRegistry, ScopeValue};
pub use service::{ClassificationService, ClassificationServiceError};
pub use table::{RecordQuery, SortDirection, SortKey};
