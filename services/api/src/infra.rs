use metrics_exporter_prometheus::PrometheusHandle;
use saas_classifier::catalog::{sample_catalog, CatalogImporter};
use saas_classifier::classification::{
    ClassificationRecord, ClassificationService, InMemoryClassificationRepository, ScopeRegistry,
};
use saas_classifier::error::AppError;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type CatalogService = ClassificationService<InMemoryClassificationRepository>;

/// Reads the catalog export when a path is given, otherwise falls back to the bundled sample.
pub(crate) fn load_records(
    path: Option<&Path>,
    registry: &ScopeRegistry,
) -> Result<Vec<ClassificationRecord>, AppError> {
    match path {
        Some(path) => {
            let records = CatalogImporter::from_path(path, registry)?;
            info!(path = %path.display(), records = records.len(), "catalog export loaded");
            Ok(records)
        }
        None => {
            let records = sample_catalog();
            info!(records = records.len(), "sample catalog loaded");
            Ok(records)
        }
    }
}

pub(crate) fn build_service(path: Option<&Path>) -> Result<CatalogService, AppError> {
    let registry = ScopeRegistry::standard();
    let records = load_records(path, &registry)?;
    let repository = Arc::new(InMemoryClassificationRepository::new(records));
    Ok(ClassificationService::new(repository, registry))
}

/// Parses a command-line choice through the same snake_case names the HTTP API accepts.
pub(crate) fn parse_choice<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    let normalized = raw
        .trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_");
    serde_json::from_value(serde_json::Value::String(normalized))
        .map_err(|_| format!("unrecognized value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use saas_classifier::classification::{RiskLevel, SortKey};
    use std::io::Write;

    #[test]
    fn parse_choice_accepts_labels_and_keys() {
        assert_eq!(parse_choice::<RiskLevel>("High"), Ok(RiskLevel::High));
        assert_eq!(
            parse_choice::<SortKey>("access-count"),
            Ok(SortKey::AccessCount)
        );
        assert!(parse_choice::<RiskLevel>("severe").is_err());
    }

    #[test]
    fn missing_path_uses_sample_catalog() {
        let records = load_records(None, &ScopeRegistry::standard()).expect("sample loads");
        assert_eq!(records.len(), sample_catalog().len());
    }

    #[test]
    fn catalog_path_is_imported() {
        let path = std::env::temp_dir().join(format!(
            "saas-classifier-api-{}.csv",
            std::process::id()
        ));
        let mut file = std::fs::File::create(&path).expect("create export");
        writeln!(
            file,
            "Id,URL,Access Count,SaaS,App Type,Risk Level,Approval Status,Management Type,Rules"
        )
        .expect("write header");
        writeln!(
            file,
            "1,zoom.us,900,yes,Messaging and Communication,Low,Sanctioned,IT Managed Apps,productive@organization"
        )
        .expect("write row");
        drop(file);

        let service = build_service(Some(&path)).expect("export loads");
        std::fs::remove_file(&path).ok();

        let records = service
            .list_records(&Default::default())
            .expect("list records");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "zoom.us");
    }
}
