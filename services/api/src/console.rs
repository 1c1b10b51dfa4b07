use crate::cli::CatalogArgs;
use crate::infra::{build_service, parse_choice, CatalogService};
use clap::Args;
use saas_classifier::classification::{
    ApprovalStatus, ClassificationRecord, EvaluationContext, RecordId, RecordQuery, RiskLevel,
    ScopeValue, SortDirection, SortKey, VerdictSource,
};
use saas_classifier::config::AppConfig;
use saas_classifier::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct ContextArgs {
    /// Sector of the user being evaluated
    #[arg(long)]
    pub(crate) sector: Option<String>,
    /// Department of the user being evaluated
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Cost center of the user being evaluated
    #[arg(long)]
    pub(crate) cost_center: Option<String>,
}

impl ContextArgs {
    fn into_context(self) -> EvaluationContext {
        EvaluationContext {
            sector: self.sector.map(ScopeValue::new),
            department: self.department.map(ScopeValue::new),
            cost_center: self.cost_center.map(ScopeValue::new),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
    /// Case-insensitive URL substring
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Only show records with this risk level (high, medium, low)
    #[arg(long, value_parser = parse_choice::<RiskLevel>)]
    pub(crate) risk: Option<RiskLevel>,
    /// Only show records with this approval status
    #[arg(long, value_parser = parse_choice::<ApprovalStatus>)]
    pub(crate) approval: Option<ApprovalStatus>,
    /// Hide records that are not SaaS applications
    #[arg(long)]
    pub(crate) saas_only: bool,
    /// Sort column (url, access_count, risk_level, app_type, approval_status)
    #[arg(long, value_parser = parse_choice::<SortKey>)]
    pub(crate) sort: Option<SortKey>,
    /// Reverse the sort order
    #[arg(long)]
    pub(crate) descending: bool,
}

#[derive(Args, Debug)]
pub(crate) struct MetricsArgs {
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
    #[command(flatten)]
    pub(crate) context: ContextArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    pub(crate) catalog: CatalogArgs,
    /// Record identifier from the classification table
    #[arg(long)]
    pub(crate) record: u32,
    #[command(flatten)]
    pub(crate) context: ContextArgs,
}

fn open_catalog(args: CatalogArgs) -> Result<CatalogService, AppError> {
    let path = match args.catalog {
        Some(path) => Some(path),
        None => AppConfig::load()?.catalog.path,
    };
    build_service(path.as_deref())
}

pub(crate) fn run_list(args: ListArgs) -> Result<(), AppError> {
    let ListArgs {
        catalog,
        search,
        risk,
        approval,
        saas_only,
        sort,
        descending,
    } = args;

    let service = open_catalog(catalog)?;
    let query = RecordQuery {
        search,
        risk,
        approval,
        saas_only,
        sort,
        direction: if descending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        },
    };
    let records = service.list_records(&query)?;
    render_table(&records);
    Ok(())
}

fn render_table(records: &[ClassificationRecord]) {
    if records.is_empty() {
        println!("No classified applications match the current filters.");
        return;
    }

    println!(
        "{:>4}  {:<28} {:>8}  {:<4} {:<16} {:<7} {:<15} {:<18} Rules",
        "Id", "URL", "Access", "SaaS", "App Type", "Risk", "Approval", "Management"
    );
    for record in records {
        let row = record.row_view();
        let badges = row
            .rule_badges
            .iter()
            .map(|badge| badge.text.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "{:>4}  {:<28} {:>8}  {:<4} {:<16} {:<7} {:<15} {:<18} {}",
            row.id,
            row.url,
            row.access_count,
            if row.is_saas { "yes" } else { "no" },
            row.app_type_label,
            row.risk_label,
            row.approval_label,
            row.management_label,
            if badges.is_empty() { "-" } else { badges.as_str() },
        );
    }
}

pub(crate) fn run_metrics(args: MetricsArgs) -> Result<(), AppError> {
    let service = open_catalog(args.catalog)?;
    let context = args.context.into_context();
    let metrics = service.aggregate_metrics()?;
    let verdicts = service.verdict_distribution(&context)?;

    println!("Classification summary ({} applications)", metrics.total);
    println!("  SaaS applications: {:.1}%", metrics.saas_pct);
    println!(
        "  Risk: high {:.1}% | medium {:.1}% | low {:.1}%",
        metrics.risk.high, metrics.risk.medium, metrics.risk.low
    );
    println!(
        "  App types: internal {:.1}% | external {:.1}% | unknown {:.1}%",
        metrics.app_types.internal, metrics.app_types.external, metrics.app_types.unknown
    );
    println!(
        "  Approval: sanctioned {:.1}% | unsanctioned {:.1}% | under analysis {:.1}%",
        metrics.approval.sanctioned, metrics.approval.unsanctioned, metrics.approval.under_analysis
    );
    println!(
        "  Verdicts: productive {} | non-productive {} | neutral {} | unclassified {}",
        verdicts.productive, verdicts.non_productive, verdicts.neutral, verdicts.unclassified
    );
    Ok(())
}

pub(crate) fn run_resolve(args: ResolveArgs) -> Result<(), AppError> {
    let service = open_catalog(args.catalog)?;
    let id = RecordId(args.record);
    let record = service.get_record(id)?;
    let resolution = service.resolve_verdict(id, &args.context.into_context())?;

    println!("{} (record {})", record.url, record.id);
    println!("  Verdict: {}", resolution.verdict.label());
    match (resolution.source, resolution.rule_index) {
        (VerdictSource::ScopedRule, Some(index)) => {
            println!("  Decided by scoped rule #{}", index + 1)
        }
        (VerdictSource::OrganizationFallback, Some(index)) => {
            println!("  Decided by organization rule #{}", index + 1)
        }
        _ => println!("  No rule applies to this context"),
    }
    Ok(())
}
