// benchagg - Benchmark log aggregation toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Grouping of samples by (thread count, group key) and per-group averaging.
//!
//! Aggregation is a two-stage pipeline:
//!
//! 1. [`read_samples`] produces the list of qualifying [`Sample`]s.
//! 2. [`GroupAccumulator::from_samples`] folds them into buckets, and
//!    [`GroupAccumulator::aggregate`] turns the buckets into an
//!    [`AggregatedTable`].
//!
//! # Examples
//!
//! ```
//! use benchagg_core::{aggregate_metric_log, AggregateConfig};
//! use std::io::Cursor;
//!
//! let log = "\
//! metric: put, malloc: jemalloc, threads: 1, other: x, avg_throughput: 5000000
//! metric: put, malloc: jemalloc, threads: 1, other: x, avg_throughput: 5000000
//! metric: put, malloc: jemalloc, threads: 1, other: x, avg_throughput: 5000000
//! metric: put, malloc: jemalloc, threads: 1, other: x, avg_throughput: 7000000
//! ";
//! let table = aggregate_metric_log(Cursor::new(log), &AggregateConfig::default()).unwrap();
//! assert_eq!(table.header(), ["threads", "jemalloc"]);
//! assert_eq!(table.rows()[0].threads, 1);
//! assert_eq!(table.rows()[0].means, vec![5_500_000]);
//! ```

use crate::error::{AggError, Result};
use crate::metric::{read_samples, MetricFilter, Sample};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::{debug, info, warn};

/// Label of the first column of an aggregated table.
pub const THREADS_COLUMN: &str = "threads";

/// What to do when a thread-count bucket lacks a canonical group key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Fail with [`AggError::MissingKey`].
    #[default]
    Error,
    /// Report a mean of zero for the missing group.
    Zero,
}

/// Configuration for metric-line aggregation.
///
/// ```
/// use benchagg_core::{AggregateConfig, MissingKeyPolicy};
///
/// let config = AggregateConfig::default();
/// assert_eq!(config.filter.prefix(), "put");
/// assert_eq!(config.missing_key, MissingKeyPolicy::Error);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AggregateConfig {
    /// Metric-name predicate (default: prefix `put`).
    pub filter: MetricFilter,
    /// Missing (bucket, key) policy (default: error).
    pub missing_key: MissingKeyPolicy,
}

/// Samples for one thread count, partitioned by group key in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBucket {
    groups: Vec<(String, Vec<f64>)>,
}

impl GroupBucket {
    fn push(&mut self, group: &str, value: f64) {
        match self.groups.iter_mut().find(|(name, _)| name == group) {
            Some((_, samples)) => samples.push(value),
            None => self.groups.push((group.to_string(), vec![value])),
        }
    }

    /// Group keys in first-seen order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(name, _)| name.as_str())
    }

    /// Samples recorded for `group`, if any.
    pub fn samples(&self, group: &str) -> Option<&[f64]> {
        self.groups
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, samples)| samples.as_slice())
    }
}

/// Mapping of thread count → group key → samples.
#[derive(Debug, Clone, Default)]
pub struct GroupAccumulator {
    buckets: BTreeMap<u32, GroupBucket>,
    first_threads: Option<u32>,
}

impl GroupAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a sequence of samples into a new accumulator.
    pub fn from_samples<'a, I>(samples: I) -> Self
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        samples.into_iter().fold(Self::new(), |mut acc, sample| {
            acc.insert(sample);
            acc
        })
    }

    /// Record one sample.
    pub fn insert(&mut self, sample: &Sample) {
        self.first_threads.get_or_insert(sample.threads);
        self.buckets
            .entry(sample.threads)
            .or_default()
            .push(&sample.group, sample.throughput);
    }

    /// Whether no sample has been recorded.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Distinct thread counts, ascending.
    pub fn thread_counts(&self) -> impl Iterator<Item = u32> + '_ {
        self.buckets.keys().copied()
    }

    /// Bucket for `threads`, if any sample was recorded for it.
    pub fn bucket(&self, threads: u32) -> Option<&GroupBucket> {
        self.buckets.get(&threads)
    }

    /// Group keys defining the table columns.
    ///
    /// These are the keys of the first bucket that received a sample, in the
    /// order they were first seen there.
    pub fn canonical_keys(&self) -> Vec<&str> {
        self.first_threads
            .and_then(|threads| self.buckets.get(&threads))
            .map(|bucket| bucket.keys().collect())
            .unwrap_or_default()
    }

    /// Compute the aggregated table.
    ///
    /// # Errors
    ///
    /// - [`AggError::DataFormat`] if no sample was recorded.
    /// - [`AggError::MissingKey`] if a bucket lacks a canonical key and
    ///   `policy` is [`MissingKeyPolicy::Error`].
    /// - [`AggError::OutOfRange`] if a mean does not round to an `i64`.
    pub fn aggregate(&self, policy: MissingKeyPolicy) -> Result<AggregatedTable> {
        if self.is_empty() {
            return Err(AggError::DataFormat(
                "no qualifying metric records found; the input may be empty or in the wrong format"
                    .to_string(),
            ));
        }

        let keys = self.canonical_keys();
        let mut rows = Vec::with_capacity(self.buckets.len());

        for (&threads, bucket) in &self.buckets {
            if let Some(first) = keys.first() {
                info!(
                    threads,
                    samples = bucket.samples(first).map_or(0, <[f64]>::len),
                    "samples per group"
                );
            }

            for extra in bucket.keys().filter(|k| !keys.contains(k)) {
                warn!(threads, group = extra, "ignoring group absent from the first bucket");
            }

            let mut means = Vec::with_capacity(keys.len());
            for key in &keys {
                let rounded = match bucket.samples(key).and_then(mean) {
                    Some(value) => round_to_i64(value).ok_or_else(|| AggError::OutOfRange {
                        threads,
                        group: (*key).to_string(),
                        value,
                    })?,
                    None => match policy {
                        MissingKeyPolicy::Error => {
                            return Err(AggError::MissingKey {
                                threads,
                                group: (*key).to_string(),
                            })
                        }
                        MissingKeyPolicy::Zero => {
                            warn!(threads, group = *key, "no samples, reporting 0");
                            0
                        }
                    },
                };
                means.push(rounded);
            }
            rows.push(AggregatedRow { threads, means });
        }

        let mut header = Vec::with_capacity(keys.len() + 1);
        header.push(THREADS_COLUMN.to_string());
        header.extend(keys.iter().map(|k| (*k).to_string()));

        debug!(rows = rows.len(), columns = header.len(), "aggregated table");
        Ok(AggregatedTable { header, rows })
    }
}

/// Arithmetic mean, or `None` for no samples.
///
/// ```
/// use benchagg_core::mean;
///
/// assert_eq!(mean(&[1000.0, 2000.0, 3000.0]), Some(2000.0));
/// assert_eq!(mean(&[]), None);
/// ```
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Round half away from zero into an `i64`.
///
/// Returns `None` for non-finite values and for values outside the `i64`
/// range, instead of saturating.
///
/// ```
/// use benchagg_core::round_to_i64;
///
/// assert_eq!(round_to_i64(1.5), Some(2));
/// assert_eq!(round_to_i64(-2.5), Some(-3));
/// assert_eq!(round_to_i64(1e300), None);
/// assert_eq!(round_to_i64(f64::NAN), None);
/// ```
pub fn round_to_i64(value: f64) -> Option<i64> {
    // i64::MAX is not representable; 2^63 is the first f64 past it.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    let rounded = value.round();
    if rounded.is_finite() && (-LIMIT..LIMIT).contains(&rounded) {
        Some(rounded as i64)
    } else {
        None
    }
}

/// One output row: a thread count and one mean per group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedRow {
    /// Thread count.
    pub threads: u32,
    /// Rounded mean throughput per group key, in header order.
    pub means: Vec<i64>,
}

/// Thread-count-indexed, group-key-columned table of mean throughput.
///
/// Rows are strictly ascending by thread count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedTable {
    header: Vec<String>,
    rows: Vec<AggregatedRow>,
}

impl AggregatedTable {
    /// Column names: `threads` followed by the group keys.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows, ascending by thread count.
    pub fn rows(&self) -> &[AggregatedRow] {
        &self.rows
    }

    /// Group keys in column order.
    pub fn group_keys(&self) -> &[String] {
        &self.header[1..]
    }

    /// Thread counts as display strings, in row order.
    pub fn thread_labels(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.threads.to_string()).collect()
    }

    /// Mean values of one group across all rows.
    pub fn series(&self, group: &str) -> Option<Vec<i64>> {
        let column = self.group_keys().iter().position(|k| k == group)?;
        Some(self.rows.iter().map(|r| r.means[column]).collect())
    }

    /// Smallest and largest mean in the table.
    pub fn value_range(&self) -> Option<(i64, i64)> {
        let mut values = self.rows.iter().flat_map(|r| r.means.iter().copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Aggregate a metric-line log end to end.
///
/// # Errors
///
/// Propagates I/O and parse errors from [`read_samples`] and aggregation
/// errors from [`GroupAccumulator::aggregate`].
pub fn aggregate_metric_log<R: Read>(
    reader: R,
    config: &AggregateConfig,
) -> Result<AggregatedTable> {
    let samples = read_samples(reader, &config.filter)?;
    GroupAccumulator::from_samples(&samples).aggregate(config.missing_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn accumulate(samples: &[Sample]) -> GroupAccumulator {
        GroupAccumulator::from_samples(samples)
    }

    #[test]
    fn test_mean_of_three() {
        let acc = accumulate(&[
            Sample::new(4, "g", 1000.0),
            Sample::new(4, "g", 2000.0),
            Sample::new(4, "g", 3000.0),
        ]);
        let table = acc.aggregate(MissingKeyPolicy::Error).unwrap();
        assert_eq!(table.rows(), [AggregatedRow { threads: 4, means: vec![2000] }]);
    }

    #[test]
    fn test_rows_ascending_and_unique() {
        let acc = accumulate(&[
            Sample::new(64, "a", 1.0),
            Sample::new(1, "a", 2.0),
            Sample::new(16, "a", 3.0),
            Sample::new(1, "a", 4.0),
        ]);
        let table = acc.aggregate(MissingKeyPolicy::Error).unwrap();
        let threads: Vec<u32> = table.rows().iter().map(|r| r.threads).collect();
        assert_eq!(threads, vec![1, 16, 64]);
    }

    #[test]
    fn test_columns_follow_first_bucket() {
        let acc = accumulate(&[
            Sample::new(8, "tcmalloc", 1.0),
            Sample::new(8, "jemalloc", 1.0),
            Sample::new(1, "jemalloc", 1.0),
            Sample::new(1, "tcmalloc", 1.0),
        ]);
        assert_eq!(acc.canonical_keys(), vec!["tcmalloc", "jemalloc"]);
        let table = acc.aggregate(MissingKeyPolicy::Error).unwrap();
        assert_eq!(table.header(), ["threads", "tcmalloc", "jemalloc"]);
    }

    #[test]
    fn test_empty_is_data_format_error() {
        let err = GroupAccumulator::new()
            .aggregate(MissingKeyPolicy::Error)
            .unwrap_err();
        assert!(matches!(err, AggError::DataFormat(_)));
    }

    #[test]
    fn test_missing_key_error() {
        let acc = accumulate(&[
            Sample::new(1, "a", 1.0),
            Sample::new(1, "b", 1.0),
            Sample::new(4, "a", 1.0),
        ]);
        match acc.aggregate(MissingKeyPolicy::Error).unwrap_err() {
            AggError::MissingKey { threads, group } => {
                assert_eq!(threads, 4);
                assert_eq!(group, "b");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_key_zero_policy() {
        let acc = accumulate(&[
            Sample::new(1, "a", 10.0),
            Sample::new(1, "b", 20.0),
            Sample::new(4, "a", 30.0),
        ]);
        let table = acc.aggregate(MissingKeyPolicy::Zero).unwrap();
        assert_eq!(table.rows()[1].means, vec![30, 0]);
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let acc = accumulate(&[
            Sample::new(1, "a", 10.0),
            Sample::new(2, "a", 10.0),
            Sample::new(2, "z", 99.0),
        ]);
        let table = acc.aggregate(MissingKeyPolicy::Error).unwrap();
        assert_eq!(table.group_keys(), ["a"]);
        assert_eq!(table.rows()[1].means, vec![10]);
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(mean(&[0.5]).and_then(round_to_i64), Some(1));
        assert_eq!(mean(&[2.5]).and_then(round_to_i64), Some(3));
        assert_eq!(mean(&[2.4, 2.4]).and_then(round_to_i64), Some(2));
    }

    #[test]
    fn test_round_rejects_non_finite_and_overflow() {
        assert_eq!(round_to_i64(f64::NAN), None);
        assert_eq!(round_to_i64(f64::INFINITY), None);
        assert_eq!(round_to_i64(f64::NEG_INFINITY), None);
        assert_eq!(round_to_i64(1e300), None);
        assert_eq!(round_to_i64(-1e300), None);
        assert_eq!(round_to_i64(9.3e18), None);
        assert_eq!(round_to_i64(-9_223_372_036_854_775_808.0), Some(i64::MIN));
    }

    #[test]
    fn test_huge_mean_is_out_of_range() {
        let acc = accumulate(&[Sample::new(1, "a", 1e300), Sample::new(1, "a", 1e300)]);
        let err = acc.aggregate(MissingKeyPolicy::Error).unwrap_err();
        assert!(matches!(err, AggError::OutOfRange { threads: 1, .. }));
        assert!(err.to_string().contains("group 'a'"));
    }

    #[test]
    fn test_overflowing_sum_is_out_of_range() {
        let acc = accumulate(&[Sample::new(2, "a", 1e308), Sample::new(2, "a", 1e308)]);
        assert!(matches!(
            acc.aggregate(MissingKeyPolicy::Zero),
            Err(AggError::OutOfRange { threads: 2, .. })
        ));
    }

    #[test]
    fn test_series_and_range() {
        let acc = accumulate(&[
            Sample::new(1, "a", 100.0),
            Sample::new(1, "b", 300.0),
            Sample::new(2, "a", 50.0),
            Sample::new(2, "b", 400.0),
        ]);
        let table = acc.aggregate(MissingKeyPolicy::Error).unwrap();
        assert_eq!(table.series("b"), Some(vec![300, 400]));
        assert_eq!(table.series("c"), None);
        assert_eq!(table.value_range(), Some((50, 400)));
        assert_eq!(table.thread_labels(), vec!["1", "2"]);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let pair = "\
metric: put, malloc: jemalloc, threads: 1, other: x, avg_throughput: 5000000
metric: put, malloc: jemalloc, threads: 1, other: x, avg_throughput: 7000000
";
        let log = pair.repeat(3);
        let table = aggregate_metric_log(Cursor::new(log), &AggregateConfig::default()).unwrap();
        assert_eq!(table.header(), ["threads", "jemalloc"]);
        assert_eq!(table.rows(), [AggregatedRow { threads: 1, means: vec![6_000_000] }]);
    }

    #[test]
    fn test_no_put_lines_is_data_format_error() {
        let log = "metric: get, malloc: a, threads: 1, avg: 1\n";
        let err = aggregate_metric_log(Cursor::new(log), &AggregateConfig::default()).unwrap_err();
        assert!(matches!(err, AggError::DataFormat(_)));
    }
}
