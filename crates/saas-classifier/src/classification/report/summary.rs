use super::super::domain::{AppBucket, ApprovalStatus, ClassificationRecord, RiskLevel};
use super::super::resolver::{resolve, EvaluationContext, Verdict};
use super::super::rules::ProductivityLevel;
use super::views::{
    ApprovalDistribution, BucketDistribution, ClassificationMetrics, RiskDistribution,
    VerdictDistribution,
};

#[derive(Debug, Default)]
struct Tally {
    total: usize,
    saas: usize,
    high: usize,
    medium: usize,
    low: usize,
    internal: usize,
    external: usize,
    unknown: usize,
    sanctioned: usize,
    unsanctioned: usize,
    under_analysis: usize,
}

impl Tally {
    fn record(&mut self, record: &ClassificationRecord) {
        self.total += 1;
        if record.is_saas {
            self.saas += 1;
        }

        match record.risk_level {
            RiskLevel::High => self.high += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::Low => self.low += 1,
        }

        match record.bucket() {
            AppBucket::Internal => self.internal += 1,
            AppBucket::External => self.external += 1,
            AppBucket::Unknown => self.unknown += 1,
        }

        match record.approval_status {
            ApprovalStatus::Sanctioned => self.sanctioned += 1,
            ApprovalStatus::Unsanctioned => self.unsanctioned += 1,
            ApprovalStatus::UnderAnalysis => self.under_analysis += 1,
        }
    }

    fn pct(&self, count: usize) -> f64 {
        percentage(count, self.total)
    }
}

impl ClassificationMetrics {
    /// Aggregate the metrics panel. An empty catalog yields all zeros.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        let mut tally = Tally::default();
        for record in records {
            tally.record(record);
        }

        Self {
            total: tally.total,
            saas_pct: tally.pct(tally.saas),
            risk: RiskDistribution {
                high: tally.pct(tally.high),
                medium: tally.pct(tally.medium),
                low: tally.pct(tally.low),
            },
            app_types: BucketDistribution {
                internal: tally.pct(tally.internal),
                external: tally.pct(tally.external),
                unknown: tally.pct(tally.unknown),
            },
            approval: ApprovalDistribution {
                sanctioned: tally.pct(tally.sanctioned),
                unsanctioned: tally.pct(tally.unsanctioned),
                under_analysis: tally.pct(tally.under_analysis),
            },
        }
    }
}

impl VerdictDistribution {
    pub fn from_records<'a, I>(records: I, context: &EvaluationContext) -> Self
    where
        I: IntoIterator<Item = &'a ClassificationRecord>,
    {
        records
            .into_iter()
            .fold(Self::default(), |mut counts, record| {
                match resolve(&record.rules, context) {
                    Verdict::Classified(ProductivityLevel::Productive) => counts.productive += 1,
                    Verdict::Classified(ProductivityLevel::NonProductive) => {
                        counts.non_productive += 1
                    }
                    Verdict::Classified(ProductivityLevel::Neutral) => counts.neutral += 1,
                    Verdict::Unclassified => counts.unclassified += 1,
                }
                counts
            })
    }
}

/// Share of `count` in `total` as a percentage rounded to one decimal.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 * 100.0 / total as f64;
    (raw * 10.0).round() / 10.0
}
