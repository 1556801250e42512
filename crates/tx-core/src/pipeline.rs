//! The analysis pipeline: ingest -> aggregate -> interval -> test.
//!
//! Data flows strictly forward with no retries; the first error at any stage
//! aborts the run. Evaluation blocks until all grouped statistics are
//! materialized, so the interval estimates and the hypothesis test always see
//! one consistent partition of the input rows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use tx_common::{AnalysisConfig, Result};
use tx_math::{
    mean_interval, t_test_from_stats, ConfidenceInterval, TTestResult, VarianceModel,
};

use crate::aggregate::{segment_statistics, GroupedStats, SegmentSummary};
use crate::ingest::ChunkedLines;

/// One analyzed segment: its summary plus the mean-volume interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentReport {
    pub summary: SegmentSummary,
    /// Two-sided confidence interval for the mean volume
    /// (1 - 2 * tail_probability coverage).
    pub mean_interval: ConfidenceInterval,
}

/// The mean-difference test between the two configured segments.
///
/// `significant` is true when the p-value falls below the configured
/// significance level, i.e. when equality of means is rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeanDifferenceReport {
    pub baseline_segment: String,
    pub comparison_segment: String,
    pub variance_model: VarianceModel,
    #[serde(flatten)]
    pub test: TTestResult,
    pub significance_level: f64,
    pub significant: bool,
}

/// Final output of a run: every segment's summary, the two target segments
/// with their intervals, and the comparison verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub segments: BTreeMap<String, SegmentSummary>,
    /// Tail mass used for the mean intervals; coverage is 1 - 2 * tail.
    pub tail_probability: f64,
    pub baseline: SegmentReport,
    pub comparison: SegmentReport,
    pub mean_difference: MeanDifferenceReport,
}

fn segment_report(
    stats: &GroupedStats,
    segment: &str,
    tail: f64,
) -> Result<SegmentReport> {
    let summary = stats.summary(segment)?;
    let mean_interval = mean_interval(&summary.sample_stats(), tail);
    Ok(SegmentReport {
        summary,
        mean_interval,
    })
}

/// Run the whole analysis for one configuration.
pub fn run(config: &AnalysisConfig) -> Result<AnalysisReport> {
    config.validate()?;

    info!(path = %config.input.display(), chunk_rows = config.chunk_rows, "reading transaction log");
    let chunks = ChunkedLines::open(&config.input, config.chunk_rows)?;
    let stats = segment_statistics(chunks, config.delimiter)?;
    info!(
        segments = stats.transaction_count.len(),
        transactions = stats.total_transactions(),
        "aggregation complete"
    );

    let baseline = segment_report(&stats, &config.baseline_segment, config.tail_probability)?;
    let comparison = segment_report(&stats, &config.comparison_segment, config.tail_probability)?;

    let variance_model = if config.equal_variance {
        VarianceModel::Pooled
    } else {
        VarianceModel::Welch
    };
    let test = t_test_from_stats(
        &baseline.summary.sample_stats(),
        &comparison.summary.sample_stats(),
        variance_model,
    );
    // NaN p-values (degenerate segments) never clear the threshold.
    let significant = test.p_value < config.significance_level;
    info!(
        statistic = test.statistic,
        p_value = test.p_value,
        significant,
        "mean-volume comparison complete"
    );

    let mut segments = BTreeMap::new();
    for segment in stats.segments() {
        segments.insert(segment.to_string(), stats.summary(segment)?);
    }

    Ok(AnalysisReport {
        segments,
        tail_probability: config.tail_probability,
        baseline,
        comparison,
        mean_difference: MeanDifferenceReport {
            baseline_segment: config.baseline_segment.clone(),
            comparison_segment: config.comparison_segment.clone(),
            variance_model,
            test,
            significance_level: config.significance_level,
            significant,
        },
    })
}
