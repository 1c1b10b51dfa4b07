use crate::classification::{AppType, ApprovalStatus, ManagementType, RiskLevel};
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogRow {
    #[serde(rename = "Id")]
    pub(crate) id: u32,
    #[serde(rename = "URL")]
    pub(crate) url: String,
    #[serde(rename = "Access Count", default)]
    pub(crate) access_count: u64,
    #[serde(rename = "SaaS")]
    pub(crate) saas: String,
    #[serde(rename = "App Type")]
    pub(crate) app_type: String,
    #[serde(rename = "Risk Level")]
    pub(crate) risk_level: String,
    #[serde(rename = "Approval Status")]
    pub(crate) approval_status: String,
    #[serde(rename = "Management Type")]
    pub(crate) management_type: String,
    #[serde(rename = "Rules", default, deserialize_with = "empty_string_as_none")]
    pub(crate) rules: Option<String>,
}

pub(crate) fn parse_rows<R: Read>(reader: R) -> Result<Vec<CatalogRow>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let rows = csv_reader
        .deserialize::<CatalogRow>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Reduce a display label or key to its snake_case form, e.g. `Non-IT Managed` -> `non_it_managed`.
pub(crate) fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

/// Closed set of values a catalog cell may name, by key or by display label.
pub(crate) trait CatalogChoice: Copy + for<'de> Deserialize<'de> {
    fn choices() -> Vec<Self>;
    fn display_label(self) -> &'static str;
}

impl CatalogChoice for AppType {
    fn choices() -> Vec<Self> {
        AppType::ordered().to_vec()
    }

    fn display_label(self) -> &'static str {
        AppType::label(self)
    }
}

impl CatalogChoice for RiskLevel {
    fn choices() -> Vec<Self> {
        RiskLevel::ordered().to_vec()
    }

    fn display_label(self) -> &'static str {
        RiskLevel::label(self)
    }
}

impl CatalogChoice for ApprovalStatus {
    fn choices() -> Vec<Self> {
        ApprovalStatus::ordered().to_vec()
    }

    fn display_label(self) -> &'static str {
        ApprovalStatus::label(self)
    }
}

impl CatalogChoice for ManagementType {
    fn choices() -> Vec<Self> {
        ManagementType::ordered().to_vec()
    }

    fn display_label(self) -> &'static str {
        ManagementType::label(self)
    }
}

/// Parse a cell as either the snake_case key or the label the dashboard shows,
/// e.g. `it_managed` and `IT Managed Apps`.
pub(crate) fn parse_enum<T: CatalogChoice>(value: &str) -> Option<T> {
    let key = normalize_key(value);
    let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        key.as_str().into_deserializer();
    if let Ok(parsed) = T::deserialize(deserializer) {
        return Some(parsed);
    }

    T::choices()
        .into_iter()
        .find(|choice| normalize_key(choice.display_label()) == key)
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match normalize_key(value).as_str() {
        "yes" | "y" | "true" | "1" | "saas" => Some(true),
        "no" | "n" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// One entry of the Rules column: `level@organization` or `level@scope=value`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct RuleEntry<'a> {
    pub(crate) level: &'a str,
    pub(crate) scope: &'a str,
    pub(crate) value: Option<&'a str>,
}

pub(crate) fn split_rule_entries(raw: &str) -> Result<Vec<RuleEntry<'_>>, String> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (level, target) = entry
                .split_once('@')
                .ok_or_else(|| entry.to_string())?;
            let (scope, value) = match target.split_once('=') {
                Some((scope, value)) => (scope.trim(), Some(value.trim())),
                None => (target.trim(), None),
            };
            Ok(RuleEntry {
                level: level.trim(),
                scope,
                value,
            })
        })
        .collect()
}
