//! Grouped reductions over the chunked transaction stream.
//!
//! The four statistics (distinct clients, mean volume, std volume, row
//! count) are expressed as independent [`SegmentReduce`] values and submitted
//! together: a tuple of reducers is itself a reducer, so one driver pass over
//! the input evaluates all of them jointly. The driver folds each chunk into
//! per-segment accumulators and merges partial results with rayon, which
//! keeps memory bounded by the chunk size and makes the scan parallel without
//! any locking.

use std::collections::{BTreeMap, HashMap, HashSet};

use rayon::iter::{ParallelBridge, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tx_common::{Error, Result, Transaction};
use tx_math::{RunningMoments, SampleStats};

use crate::ingest::{parse_chunk, RawChunk};

/// One deferred reduction over transactions, keyed by segment by the driver.
///
/// `merge` must agree with `step`: folding two partial accumulators has to
/// equal folding their rows sequentially.
pub trait SegmentReduce: Sync {
    type Acc: Send;

    fn init(&self) -> Self::Acc;
    fn step(&self, acc: &mut Self::Acc, tx: &Transaction);
    fn merge(&self, a: Self::Acc, b: Self::Acc) -> Self::Acc;
}

/// Count of distinct client ids per segment.
pub struct UniqueClients;

impl SegmentReduce for UniqueClients {
    type Acc = HashSet<u64>;

    fn init(&self) -> Self::Acc {
        HashSet::new()
    }

    fn step(&self, acc: &mut Self::Acc, tx: &Transaction) {
        acc.insert(tx.client_id);
    }

    fn merge(&self, mut a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a.extend(b);
        a
    }
}

/// Mean transaction volume per segment.
pub struct MeanVolume;

impl SegmentReduce for MeanVolume {
    type Acc = RunningMoments;

    fn init(&self) -> Self::Acc {
        RunningMoments::new()
    }

    fn step(&self, acc: &mut Self::Acc, tx: &Transaction) {
        acc.push(tx.volume_rur);
    }

    fn merge(&self, a: Self::Acc, b: Self::Acc) -> Self::Acc {
        RunningMoments::merge(a, b)
    }
}

/// Sample standard deviation of transaction volume per segment.
pub struct StdVolume;

impl SegmentReduce for StdVolume {
    type Acc = RunningMoments;

    fn init(&self) -> Self::Acc {
        RunningMoments::new()
    }

    fn step(&self, acc: &mut Self::Acc, tx: &Transaction) {
        acc.push(tx.volume_rur);
    }

    fn merge(&self, a: Self::Acc, b: Self::Acc) -> Self::Acc {
        RunningMoments::merge(a, b)
    }
}

/// Row count per segment.
pub struct TransactionCount;

impl SegmentReduce for TransactionCount {
    type Acc = u64;

    fn init(&self) -> Self::Acc {
        0
    }

    fn step(&self, acc: &mut Self::Acc, _tx: &Transaction) {
        *acc += 1;
    }

    fn merge(&self, a: Self::Acc, b: Self::Acc) -> Self::Acc {
        a + b
    }
}

// A tuple of reducers is one reducer over a tuple of accumulators; this is
// what lets independent reductions share a single scan.
macro_rules! impl_segment_reduce_tuple {
    ($($r:ident : $idx:tt),+) => {
        impl<$($r: SegmentReduce),+> SegmentReduce for ($($r,)+) {
            type Acc = ($($r::Acc,)+);

            fn init(&self) -> Self::Acc {
                ($(self.$idx.init(),)+)
            }

            fn step(&self, acc: &mut Self::Acc, tx: &Transaction) {
                $(self.$idx.step(&mut acc.$idx, tx);)+
            }

            fn merge(&self, a: Self::Acc, b: Self::Acc) -> Self::Acc {
                ($(self.$idx.merge(a.$idx, b.$idx),)+)
            }
        }
    };
}

impl_segment_reduce_tuple!(R0: 0, R1: 1);
impl_segment_reduce_tuple!(R0: 0, R1: 1, R2: 2);
impl_segment_reduce_tuple!(R0: 0, R1: 1, R2: 2, R3: 3);

/// The parallel-reduce driver: one pass over the chunk stream, grouped by
/// segment label. Each chunk is parsed and folded independently, partial
/// per-segment maps are merged pairwise, and the first error aborts the
/// whole evaluation.
pub fn evaluate<R, I>(
    reduce: &R,
    chunks: I,
    delimiter: char,
) -> Result<HashMap<String, R::Acc>>
where
    R: SegmentReduce,
    I: Iterator<Item = Result<RawChunk>> + Send,
{
    chunks
        .par_bridge()
        .map(|chunk| {
            let rows = parse_chunk(&chunk?, delimiter)?;
            let mut groups: HashMap<String, R::Acc> = HashMap::new();
            for tx in &rows {
                let acc = groups
                    .entry(tx.segment.clone())
                    .or_insert_with(|| reduce.init());
                reduce.step(acc, tx);
            }
            Ok(groups)
        })
        .try_reduce(HashMap::new, |mut a, b| {
            for (segment, acc) in b {
                let merged = match a.remove(&segment) {
                    Some(prev) => reduce.merge(prev, acc),
                    None => acc,
                };
                a.insert(segment, merged);
            }
            Ok(a)
        })
}

/// The four grouped mappings, materialized together from one pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupedStats {
    pub unique_clients: BTreeMap<String, u64>,
    pub mean_volume: BTreeMap<String, f64>,
    pub std_volume: BTreeMap<String, f64>,
    pub transaction_count: BTreeMap<String, u64>,
}

impl GroupedStats {
    /// Index all four mappings for one segment. Fails with `MissingSegment`
    /// when the label never occurred in the input.
    pub fn summary(&self, segment: &str) -> Result<SegmentSummary> {
        let missing = || Error::MissingSegment(segment.to_string());
        Ok(SegmentSummary {
            segment: segment.to_string(),
            unique_clients: *self.unique_clients.get(segment).ok_or_else(missing)?,
            mean_volume: *self.mean_volume.get(segment).ok_or_else(missing)?,
            std_volume: *self.std_volume.get(segment).ok_or_else(missing)?,
            transaction_count: *self.transaction_count.get(segment).ok_or_else(missing)?,
        })
    }

    /// All segment labels seen in the input.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.transaction_count.keys().map(String::as_str)
    }

    /// Total row count across segments.
    pub fn total_transactions(&self) -> u64 {
        self.transaction_count.values().sum()
    }
}

/// Derived per-segment summary tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub segment: String,
    pub unique_clients: u64,
    pub transaction_count: u64,
    pub mean_volume: f64,
    pub std_volume: f64,
}

impl SegmentSummary {
    /// The (mean, std, count) triple downstream inference consumes.
    pub fn sample_stats(&self) -> SampleStats {
        SampleStats {
            mean: self.mean_volume,
            std: self.std_volume,
            count: self.transaction_count,
        }
    }
}

/// Run the four reductions jointly over the chunk stream and materialize the
/// grouped mappings.
pub fn segment_statistics<I>(chunks: I, delimiter: char) -> Result<GroupedStats>
where
    I: Iterator<Item = Result<RawChunk>> + Send,
{
    let reduce = (UniqueClients, MeanVolume, StdVolume, TransactionCount);
    let groups = evaluate(&reduce, chunks, delimiter)?;

    let mut stats = GroupedStats::default();
    for (segment, (clients, mean_acc, std_acc, count)) in groups {
        debug!(segment = %segment, transactions = count, "segment reduced");
        stats.unique_clients.insert(segment.clone(), clients.len() as u64);
        stats.mean_volume.insert(segment.clone(), mean_acc.mean());
        stats.std_volume.insert(segment.clone(), std_acc.sample_std());
        stats.transaction_count.insert(segment, count);
    }
    Ok(stats)
}
