use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::domain::{ClassificationRecord, RecordId};
use super::editor::{EditError, FieldsPatch, RecordEdit, RuleDraft, RuleSetBuilder};
use super::report::{ClassificationMetrics, VerdictDistribution};
use super::repository::{ClassificationRepository, RepositoryError};
use super::resolver::{explain, EvaluationContext, Resolution};
use super::rules::RuleSet;
use super::scope::ScopeRegistry;
use super::table::RecordQuery;

/// Read accessors and the single rule-commit entry point used by the view layer.
pub struct ClassificationService<R> {
    registry: ScopeRegistry,
    repository: Arc<R>,
}

impl<R> ClassificationService<R>
where
    R: ClassificationRepository + 'static,
{
    pub fn new(repository: Arc<R>, registry: ScopeRegistry) -> Self {
        Self {
            registry,
            repository,
        }
    }

    pub fn registry(&self) -> &ScopeRegistry {
        &self.registry
    }

    pub fn list_records(
        &self,
        query: &RecordQuery,
    ) -> Result<Vec<ClassificationRecord>, ClassificationServiceError> {
        let records = self.repository.list()?;
        Ok(query.apply(records))
    }

    pub fn get_record(
        &self,
        id: RecordId,
    ) -> Result<ClassificationRecord, ClassificationServiceError> {
        let record = self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Effective verdict for one record, with the rule that decided it.
    pub fn resolve_verdict(
        &self,
        id: RecordId,
        context: &EvaluationContext,
    ) -> Result<Resolution, ClassificationServiceError> {
        let record = self.get_record(id)?;
        Ok(explain(&record.rules, context))
    }

    pub fn aggregate_metrics(&self) -> Result<ClassificationMetrics, ClassificationServiceError> {
        let records = self.repository.list()?;
        Ok(ClassificationMetrics::from_records(&records))
    }

    pub fn verdict_distribution(
        &self,
        context: &EvaluationContext,
    ) -> Result<VerdictDistribution, ClassificationServiceError> {
        let records = self.repository.list()?;
        Ok(VerdictDistribution::from_records(&records, context))
    }

    /// Open an edit session seeded with the record's current rules.
    pub fn begin_edit(&self, id: RecordId) -> Result<RuleSetBuilder, ClassificationServiceError> {
        let record = self.get_record(id)?;
        Ok(RuleSetBuilder::from_rule_set(
            self.registry.clone(),
            &record.rules,
        ))
    }

    /// Replace the record's rule set with the session's result.
    ///
    /// The builder must have been validated; otherwise the stored record is untouched.
    pub fn commit_rule_set(
        &self,
        id: RecordId,
        builder: &RuleSetBuilder,
    ) -> Result<ClassificationRecord, ClassificationServiceError> {
        let rules = self.checked_rules(id, builder)?;
        let mut record = self.get_record(id)?;

        record.rules = rules;
        self.store_edit(record)
    }

    /// Open a whole-record session: attribute pickers seeded from the record
    /// plus a rule editor seeded with its current rules.
    pub fn begin_record_edit(&self, id: RecordId) -> Result<RecordEdit, ClassificationServiceError> {
        let record = self.get_record(id)?;
        Ok(RecordEdit::new(
            record.fields(),
            RuleSetBuilder::from_rule_set(self.registry.clone(), &record.rules),
        ))
    }

    /// Save a whole-record session. Attributes and rules land together or not at all.
    pub fn commit_record_edit(
        &self,
        id: RecordId,
        edit: &RecordEdit,
    ) -> Result<ClassificationRecord, ClassificationServiceError> {
        let rules = self.checked_rules(id, edit.rules())?;
        let mut record = self.get_record(id)?;

        record.set_fields(edit.fields());
        record.rules = rules;
        self.store_edit(record)
    }

    /// Apply submitted attribute changes and, when given, a replacement rule list.
    pub fn apply_record_edit(
        &self,
        id: RecordId,
        patch: FieldsPatch,
        drafts: Option<Vec<RuleDraft>>,
    ) -> Result<ClassificationRecord, ClassificationServiceError> {
        let mut edit = self.begin_record_edit(id)?;
        edit.apply_patch(patch);
        if let Some(drafts) = drafts {
            *edit.rules_mut() = RuleSetBuilder::from_drafts(self.registry.clone(), drafts);
        }

        if let Err(violations) = edit.validate() {
            warn!(
                record = %id,
                issues = violations.len(),
                "rejected classification record edit"
            );
            return Err(EditError::NotReady { violations }.into());
        }

        self.commit_record_edit(id, &edit)
    }

    /// Validate and commit a full set of drafts in one step.
    pub fn apply_rule_drafts(
        &self,
        id: RecordId,
        drafts: Vec<RuleDraft>,
    ) -> Result<ClassificationRecord, ClassificationServiceError> {
        // surface NotFound before validation issues
        self.get_record(id)?;

        let mut builder = RuleSetBuilder::from_drafts(self.registry.clone(), drafts);
        if let Err(violations) = builder.validate() {
            warn!(
                record = %id,
                issues = violations.len(),
                "rejected classification rule edit"
            );
            return Err(EditError::NotReady { violations }.into());
        }

        debug!(record = %id, rules = builder.drafts().len(), "rule drafts validated");
        self.commit_rule_set(id, &builder)
    }

    /// Commit the builder and re-check the result against this service's registry,
    /// so a session opened elsewhere cannot store values the pickers never offered.
    fn checked_rules(
        &self,
        id: RecordId,
        builder: &RuleSetBuilder,
    ) -> Result<RuleSet, ClassificationServiceError> {
        let rules = builder.commit()?;
        RuleSet::try_new(rules.rules().to_vec(), &self.registry).map_err(|violations| {
            warn!(
                record = %id,
                issues = violations.len(),
                "edit session holds scope values outside the registry"
            );
            EditError::NotReady { violations }.into()
        })
    }

    fn store_edit(
        &self,
        mut record: ClassificationRecord,
    ) -> Result<ClassificationRecord, ClassificationServiceError> {
        record.revision += 1;
        record.updated_at = Some(Utc::now());
        self.repository.replace(record.clone())?;

        info!(
            record = %record.id,
            url = %record.url,
            rules = record.rules.len(),
            revision = record.revision,
            "classification record committed"
        );
        Ok(record)
    }
}

/// Error raised by the classification service.
#[derive(Debug, thiserror::Error)]
pub enum ClassificationServiceError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
