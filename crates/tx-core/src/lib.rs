//! Txstat core: out-of-core segment aggregation and mean-volume comparison.
//!
//! The pipeline is a strict forward composition of four stages:
//! ingest (chunked delimited reads) -> aggregate (four grouped reductions
//! sharing one scan) -> interval estimate (t-based mean intervals) ->
//! hypothesis test (two-sample t-test from summary statistics).

pub mod aggregate;
pub mod ingest;
pub mod pipeline;
pub mod report;

pub use aggregate::{segment_statistics, GroupedStats, SegmentSummary};
pub use ingest::ChunkedLines;
pub use pipeline::{run, AnalysisReport};
pub use report::OutputFormat;
