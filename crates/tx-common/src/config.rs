//! Typed analysis configuration with defaults and TOML loading.
//!
//! Defaults: comma-delimited log at `/usr/local/data/transactions.txt`,
//! segments "R" vs "AF", 5% per tail for the interval, 0.1 significance for
//! the mean-difference test. Tests and the CLI substitute their own values
//! through this one struct instead of editing literals in the pipeline.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Path to the delimited transaction log.
    pub input: PathBuf,
    /// Field delimiter.
    pub delimiter: char,
    /// First segment of the mean-volume comparison.
    pub baseline_segment: String,
    /// Second segment of the mean-volume comparison.
    pub comparison_segment: String,
    /// Probability mass in each tail of the mean interval; 0.05 gives the
    /// 90% two-sided interval.
    pub tail_probability: f64,
    /// Reject equality of means when the p-value falls below this level.
    pub significance_level: f64,
    /// Rows per ingest chunk; bounds memory use for oversized logs.
    pub chunk_rows: usize,
    /// Assume equal variances (pooled test) instead of Welch's correction.
    pub equal_variance: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            input: PathBuf::from("/usr/local/data/transactions.txt"),
            delimiter: ',',
            baseline_segment: "R".to_string(),
            comparison_segment: "AF".to_string(),
            tail_probability: 0.05,
            significance_level: 0.1,
            chunk_rows: 65_536,
            equal_variance: false,
        }
    }
}

impl AnalysisConfig {
    /// Load from a TOML file; absent keys keep their defaults.
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Semantic validation. Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        if self.baseline_segment.is_empty() || self.comparison_segment.is_empty() {
            return Err(Error::Config("segment labels must be non-empty".into()));
        }
        if self.baseline_segment == self.comparison_segment {
            return Err(Error::Config(format!(
                "baseline and comparison segments are both {:?}",
                self.baseline_segment
            )));
        }
        if !(self.tail_probability > 0.0 && self.tail_probability < 0.5) {
            return Err(Error::Config(format!(
                "tail_probability must lie in (0, 0.5), got {}",
                self.tail_probability
            )));
        }
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(Error::Config(format!(
                "significance_level must lie in (0, 1), got {}",
                self.significance_level
            )));
        }
        if self.chunk_rows == 0 {
            return Err(Error::Config("chunk_rows must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_complete_and_valid() {
        let config = AnalysisConfig::default();
        assert_eq!(config.input, PathBuf::from("/usr/local/data/transactions.txt"));
        assert_eq!(config.baseline_segment, "R");
        assert_eq!(config.comparison_segment, "AF");
        assert_eq!(config.tail_probability, 0.05);
        assert_eq!(config.significance_level, 0.1);
        assert!(!config.equal_variance);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn toml_overrides_some_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "input = \"/tmp/log.txt\"\nbaseline_segment = \"A\"\ncomparison_segment = \"B\"\nsignificance_level = 0.05"
        )
        .unwrap();
        let config = AnalysisConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.input, PathBuf::from("/tmp/log.txt"));
        assert_eq!(config.baseline_segment, "A");
        assert_eq!(config.significance_level, 0.05);
        // Untouched keys keep defaults.
        assert_eq!(config.tail_probability, 0.05);
        assert_eq!(config.chunk_rows, 65_536);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "segments = [\"R\", \"AF\"]").unwrap();
        assert!(matches!(
            AnalysisConfig::from_toml_file(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn validation_catches_bad_values() {
        let mut config = AnalysisConfig::default();
        config.tail_probability = 0.5;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.significance_level = 0.0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.comparison_segment = "R".into();
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.chunk_rows = 0;
        assert!(config.validate().is_err());
    }
}
