use super::domain::{AppType, ApprovalStatus, ClassificationFields, ManagementType, RiskLevel};
use super::rules::{MissingField, ProductivityLevel, Rule, RuleSet, RuleViolation};
use super::scope::{ScopeKind, ScopeRegistry, ScopeValue};
use serde::{Deserialize, Serialize};

/// Edit buffer for one rule in the modal. Every field starts unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    #[serde(default)]
    pub level: Option<ProductivityLevel>,
    #[serde(default)]
    pub scope: Option<ScopeKind>,
    #[serde(default)]
    pub scope_value: Option<ScopeValue>,
}

impl From<&Rule> for RuleDraft {
    fn from(rule: &Rule) -> Self {
        Self {
            level: Some(rule.level()),
            scope: Some(rule.scope()),
            scope_value: rule.scope_value().cloned(),
        }
    }
}

/// Lifecycle of a rule editing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    Empty,
    Editing,
    Valid,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("rule set is not ready to commit ({} validation issue(s))", .violations.len())]
    NotReady { violations: Vec<RuleViolation> },
    #[error("no rule at position {index}")]
    UnknownRule { index: usize },
}

/// Working copy of a record's rules while the editor is open.
///
/// Mutations only touch the buffer; the stored rule set changes when the
/// caller commits the result.
#[derive(Debug, Clone)]
pub struct RuleSetBuilder {
    registry: ScopeRegistry,
    drafts: Vec<RuleDraft>,
    state: EditState,
    violations: Vec<RuleViolation>,
}

impl RuleSetBuilder {
    pub fn new(registry: ScopeRegistry) -> Self {
        Self {
            registry,
            drafts: Vec::new(),
            state: EditState::Empty,
            violations: Vec::new(),
        }
    }

    /// Open a session pre-filled with an existing rule set.
    pub fn from_rule_set(registry: ScopeRegistry, rules: &RuleSet) -> Self {
        let drafts: Vec<RuleDraft> = rules.rules().iter().map(RuleDraft::from).collect();
        Self::from_drafts(registry, drafts)
    }

    pub fn from_drafts(registry: ScopeRegistry, drafts: Vec<RuleDraft>) -> Self {
        let state = if drafts.is_empty() {
            EditState::Empty
        } else {
            EditState::Editing
        };

        Self {
            registry,
            drafts,
            state,
            violations: Vec::new(),
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn drafts(&self) -> &[RuleDraft] {
        &self.drafts
    }

    pub fn registry(&self) -> &ScopeRegistry {
        &self.registry
    }

    /// Issues found by the most recent `validate` call.
    pub fn violations(&self) -> &[RuleViolation] {
        &self.violations
    }

    /// Append an unset draft and return its position.
    pub fn add_rule(&mut self) -> usize {
        self.drafts.push(RuleDraft::default());
        self.touch();
        self.drafts.len() - 1
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<RuleDraft, EditError> {
        if index >= self.drafts.len() {
            return Err(EditError::UnknownRule { index });
        }
        let removed = self.drafts.remove(index);
        self.touch();
        Ok(removed)
    }

    pub fn set_level(&mut self, index: usize, level: ProductivityLevel) -> Result<(), EditError> {
        self.draft_mut(index)?.level = Some(level);
        self.touch();
        Ok(())
    }

    /// Change a draft's scope. The previous scope value is always cleared
    /// since its domain depends on the scope.
    pub fn set_scope(&mut self, index: usize, scope: ScopeKind) -> Result<(), EditError> {
        let draft = self.draft_mut(index)?;
        draft.scope = Some(scope);
        draft.scope_value = None;
        self.touch();
        Ok(())
    }

    pub fn set_scope_value(
        &mut self,
        index: usize,
        value: impl Into<ScopeValue>,
    ) -> Result<(), EditError> {
        self.draft_mut(index)?.scope_value = Some(value.into());
        self.touch();
        Ok(())
    }

    pub fn validate(&mut self) -> Result<(), Vec<RuleViolation>> {
        let violations = check_drafts(&self.registry, &self.drafts);
        if violations.is_empty() {
            self.state = EditState::Valid;
            self.violations.clear();
            Ok(())
        } else {
            self.state = EditState::Invalid;
            self.violations = violations.clone();
            Err(violations)
        }
    }

    /// Produce the rule set. Only allowed right after a successful `validate`.
    pub fn commit(&self) -> Result<RuleSet, EditError> {
        if self.state != EditState::Valid {
            let violations = match self.state {
                EditState::Invalid => self.violations.clone(),
                _ => check_drafts(&self.registry, &self.drafts),
            };
            return Err(EditError::NotReady { violations });
        }

        let rules = self
            .drafts
            .iter()
            .filter_map(|draft| {
                Some(Rule::new(
                    draft.level?,
                    draft.scope?,
                    draft.scope_value.clone(),
                ))
            })
            .collect();

        Ok(RuleSet::from_checked(rules))
    }

    pub fn discard(&mut self) {
        self.drafts.clear();
        self.violations.clear();
        self.state = EditState::Empty;
    }

    fn draft_mut(&mut self, index: usize) -> Result<&mut RuleDraft, EditError> {
        self.drafts
            .get_mut(index)
            .ok_or(EditError::UnknownRule { index })
    }

    fn touch(&mut self) {
        self.violations.clear();
        self.state = EditState::Editing;
    }
}

/// Partial update of a record's single-choice attributes; unset fields keep their value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsPatch {
    #[serde(default)]
    pub app_type: Option<AppType>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(default)]
    pub management_type: Option<ManagementType>,
}

impl FieldsPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, fields: ClassificationFields) -> ClassificationFields {
        ClassificationFields {
            app_type: self.app_type.unwrap_or(fields.app_type),
            risk_level: self.risk_level.unwrap_or(fields.risk_level),
            approval_status: self.approval_status.unwrap_or(fields.approval_status),
            management_type: self.management_type.unwrap_or(fields.management_type),
        }
    }
}

/// Whole-record edit session: the attribute pickers plus the rule editor.
///
/// Like [`RuleSetBuilder`], nothing here touches the stored record until the
/// session is committed through the service.
#[derive(Debug, Clone)]
pub struct RecordEdit {
    original: ClassificationFields,
    fields: ClassificationFields,
    rules: RuleSetBuilder,
}

impl RecordEdit {
    pub fn new(fields: ClassificationFields, rules: RuleSetBuilder) -> Self {
        Self {
            original: fields,
            fields,
            rules,
        }
    }

    pub fn fields(&self) -> ClassificationFields {
        self.fields
    }

    /// Whether any attribute differs from the value the session opened with.
    pub fn fields_changed(&self) -> bool {
        self.fields != self.original
    }

    pub fn set_app_type(&mut self, app_type: AppType) {
        self.fields.app_type = app_type;
    }

    pub fn set_risk_level(&mut self, risk_level: RiskLevel) {
        self.fields.risk_level = risk_level;
    }

    pub fn set_approval_status(&mut self, approval_status: ApprovalStatus) {
        self.fields.approval_status = approval_status;
    }

    pub fn set_management_type(&mut self, management_type: ManagementType) {
        self.fields.management_type = management_type;
    }

    pub fn apply_patch(&mut self, patch: FieldsPatch) {
        self.fields = patch.apply(self.fields);
    }

    pub fn rules(&self) -> &RuleSetBuilder {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleSetBuilder {
        &mut self.rules
    }

    pub fn validate(&mut self) -> Result<(), Vec<RuleViolation>> {
        self.rules.validate()
    }

    /// Cancel: attributes revert and the rule buffer empties.
    pub fn discard(&mut self) {
        self.fields = self.original;
        self.rules.discard();
    }
}

/// Check drafts for completeness, registry membership, and the single
/// organization rule constraint. Violations come back in draft order.
pub(crate) fn check_drafts(registry: &ScopeRegistry, drafts: &[RuleDraft]) -> Vec<RuleViolation> {
    let mut violations = Vec::new();
    let mut seen_organization = false;

    for (index, draft) in drafts.iter().enumerate() {
        if draft.level.is_none() {
            violations.push(RuleViolation::IncompleteRule {
                index,
                missing: MissingField::Level,
            });
        }

        let Some(scope) = draft.scope else {
            violations.push(RuleViolation::IncompleteRule {
                index,
                missing: MissingField::Scope,
            });
            continue;
        };

        match (&draft.scope_value, scope.requires_value()) {
            (None, true) => violations.push(RuleViolation::IncompleteRule {
                index,
                missing: MissingField::ScopeValue,
            }),
            (Some(value), _) if !registry.is_valid(scope, value) => {
                violations.push(RuleViolation::InvalidScopeValue {
                    index,
                    scope,
                    value: value.clone(),
                })
            }
            _ => {}
        }

        if scope == ScopeKind::Organization {
            if seen_organization {
                violations.push(RuleViolation::DuplicateOrganizationRule { index });
            }
            seen_organization = true;
        }
    }

    violations
}
