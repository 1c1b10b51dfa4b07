mod parser;
mod sample;

pub use sample::sample_catalog;

use crate::classification::{
    ClassificationRecord, ProductivityLevel, RecordId, Rule, RuleSet, RuleViolation, ScopeKind,
    ScopeRegistry, ScopeValue,
};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use parser::{parse_enum, parse_flag, split_rule_entries, CatalogRow};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidField {
        row: u32,
        column: &'static str,
        value: String,
    },
    InvalidRules {
        row: u32,
        violations: Vec<RuleViolation>,
    },
    DuplicateRecord(RecordId),
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::InvalidField { row, column, value } => write!(
                f,
                "record {}: unrecognized {} value '{}'",
                row, column, value
            ),
            CatalogImportError::InvalidRules { row, violations } => {
                let details: Vec<String> = violations.iter().map(ToString::to_string).collect();
                write!(f, "record {}: invalid rules ({})", row, details.join("; "))
            }
            CatalogImportError::DuplicateRecord(id) => {
                write!(f, "record {} appears more than once", id)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidField { .. }
            | CatalogImportError::InvalidRules { .. }
            | CatalogImportError::DuplicateRecord(_) => None,
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Loads classification records from a catalog CSV export.
pub struct CatalogImporter;

impl CatalogImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        registry: &ScopeRegistry,
    ) -> Result<Vec<ClassificationRecord>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, registry)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        registry: &ScopeRegistry,
    ) -> Result<Vec<ClassificationRecord>, CatalogImportError> {
        let mut seen: HashSet<RecordId> = HashSet::new();
        let mut records = Vec::new();

        for row in parser::parse_rows(reader)? {
            let record = record_from_row(row, registry)?;
            if !seen.insert(record.id) {
                return Err(CatalogImportError::DuplicateRecord(record.id));
            }
            records.push(record);
        }

        tracing::debug!(records = records.len(), "catalog export parsed");
        Ok(records)
    }
}

fn record_from_row(
    row: CatalogRow,
    registry: &ScopeRegistry,
) -> Result<ClassificationRecord, CatalogImportError> {
    let id = row.id;
    let invalid = |column: &'static str, value: &str| CatalogImportError::InvalidField {
        row: id,
        column,
        value: value.to_string(),
    };

    let is_saas = parse_flag(&row.saas).ok_or_else(|| invalid("SaaS", &row.saas))?;
    let app_type = parse_enum(&row.app_type).ok_or_else(|| invalid("App Type", &row.app_type))?;
    let risk_level =
        parse_enum(&row.risk_level).ok_or_else(|| invalid("Risk Level", &row.risk_level))?;
    let approval_status = parse_enum(&row.approval_status)
        .ok_or_else(|| invalid("Approval Status", &row.approval_status))?;
    let management_type = parse_enum(&row.management_type)
        .ok_or_else(|| invalid("Management Type", &row.management_type))?;

    let rules = match row.rules.as_deref() {
        Some(raw) => parse_rules(id, raw, registry)?,
        None => RuleSet::empty(),
    };

    Ok(ClassificationRecord {
        id: RecordId(id),
        url: row.url,
        access_count: row.access_count,
        is_saas,
        app_type,
        risk_level,
        approval_status,
        management_type,
        rules,
        revision: 0,
        updated_at: None,
    })
}

fn parse_rules(
    row: u32,
    raw: &str,
    registry: &ScopeRegistry,
) -> Result<RuleSet, CatalogImportError> {
    let invalid = |value: &str| CatalogImportError::InvalidField {
        row,
        column: "Rules",
        value: value.to_string(),
    };

    let mut rules = Vec::new();
    for entry in split_rule_entries(raw).map_err(|entry| invalid(&entry))? {
        let level = ProductivityLevel::parse(entry.level).ok_or_else(|| invalid(entry.level))?;
        let scope = ScopeKind::parse(entry.scope).ok_or_else(|| invalid(entry.scope))?;
        rules.push(Rule::new(level, scope, entry.value.map(ScopeValue::from)));
    }

    RuleSet::try_new(rules, registry)
        .map_err(|violations| CatalogImportError::InvalidRules { row, violations })
}
