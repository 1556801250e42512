//! Rendering of the analysis report.
//!
//! stdout carries the payload (human text or JSON); logs go to stderr.

use clap::ValueEnum;

use tx_common::Result;

use crate::pipeline::AnalysisReport;

/// Output format for the report payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Plain text, one section per segment plus the comparison verdict.
    Human,
    /// The full report as a single JSON document.
    Json,
}

/// Render the report in the requested format.
pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Human => Ok(render_human(report)),
        OutputFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|e| tx_common::Error::Serialize(e.to_string())),
    }
}

fn render_human(report: &AnalysisReport) -> String {
    let mut out = String::new();

    for summary in report.segments.values() {
        out.push_str(&format!(
            "segment {}: clients={} transactions={} mean={:.4} std={:.4}\n",
            summary.segment,
            summary.unique_clients,
            summary.transaction_count,
            summary.mean_volume,
            summary.std_volume,
        ));
    }

    let coverage = 1.0 - 2.0 * report.tail_probability;
    for target in [&report.baseline, &report.comparison] {
        out.push_str(&format!(
            "{:.0}% mean interval for {}: [{:.4}, {:.4}]\n",
            coverage * 100.0,
            target.summary.segment,
            target.mean_interval.lower,
            target.mean_interval.upper,
        ));
    }

    let md = &report.mean_difference;
    out.push_str(&format!(
        "mean difference {} vs {} ({:?}): t={:.4} df={:.2} p={:.6}\n",
        md.baseline_segment,
        md.comparison_segment,
        md.variance_model,
        md.test.statistic,
        md.test.df,
        md.test.p_value,
    ));
    out.push_str(&format!(
        "means differ at the {} level: {}\n",
        md.significance_level,
        if md.significant { "yes" } else { "no" },
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{MeanDifferenceReport, SegmentReport};
    use std::collections::BTreeMap;
    use tx_math::{ConfidenceInterval, TTestResult, VarianceModel};

    fn fake_report() -> AnalysisReport {
        let summary = |segment: &str, mean: f64| crate::aggregate::SegmentSummary {
            segment: segment.to_string(),
            unique_clients: 3,
            transaction_count: 3,
            mean_volume: mean,
            std_volume: 100.0,
        };
        let seg = |segment: &str, mean: f64| SegmentReport {
            summary: summary(segment, mean),
            mean_interval: ConfidenceInterval {
                lower: mean - 168.6,
                upper: mean + 168.6,
            },
        };
        let mut segments = BTreeMap::new();
        segments.insert("R".to_string(), summary("R", 200.0));
        segments.insert("AF".to_string(), summary("AF", 150.0));
        AnalysisReport {
            segments,
            tail_probability: 0.05,
            baseline: seg("R", 200.0),
            comparison: seg("AF", 150.0),
            mean_difference: MeanDifferenceReport {
                baseline_segment: "R".into(),
                comparison_segment: "AF".into(),
                variance_model: VarianceModel::Welch,
                test: TTestResult {
                    statistic: 0.61,
                    df: 4.0,
                    p_value: 0.57,
                },
                significance_level: 0.1,
                significant: false,
            },
        }
    }

    #[test]
    fn human_output_names_everything() {
        let text = render(&fake_report(), OutputFormat::Human).unwrap();
        assert!(text.contains("segment R:"));
        assert!(text.contains("segment AF:"));
        assert!(text.contains("90% mean interval for R"));
        assert!(text.contains("mean difference R vs AF"));
        assert!(text.contains("means differ at the 0.1 level: no"));
    }

    #[test]
    fn json_output_is_parseable() {
        let text = render(&fake_report(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["mean_difference"]["significant"], false);
        assert_eq!(value["baseline"]["summary"]["segment"], "R");
    }
}
