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

//! Metric-line parsing: turns raw log lines into throughput [`Sample`]s.
//!
//! A metric line is a comma-separated list of `label: value` tokens:
//!
//! ```text
//! metric: put, malloc: jemalloc, threads: 4, total: 812000, avg_throughput: 203000
//! ```
//!
//! Field 0 is the metric name, field 1 the group key, field 2 the thread
//! count and the last field the average throughput. Anything between field
//! 2 and the last field is ignored.

use crate::error::{AggError, Location, Result};
use crate::field::{FieldIndex, FieldKind, FieldSpec, ValueShape};
use crate::reader::LineReader;
use std::io::Read;
use tracing::debug;

/// Substring a line must contain to be considered a record.
pub const METRIC_MARKER: &str = "metric";

/// Default metric-name prefix selecting put-throughput records.
pub const DEFAULT_METRIC_PREFIX: &str = "put";

const METRIC_NAME: FieldSpec =
    FieldSpec::new("metric", FieldIndex::At(0), ValueShape::Labeled, FieldKind::Text);
const GROUP_KEY: FieldSpec =
    FieldSpec::new("malloc", FieldIndex::At(1), ValueShape::Labeled, FieldKind::Text);
const THREADS: FieldSpec =
    FieldSpec::new("threads", FieldIndex::At(2), ValueShape::Labeled, FieldKind::Int);
const THROUGHPUT: FieldSpec = FieldSpec::new(
    "avg_throughput",
    FieldIndex::Last,
    ValueShape::Labeled,
    FieldKind::Float,
);

/// A single observed throughput value.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Number of benchmark threads (always positive).
    pub threads: u32,
    /// Allocator or malloc name the sample belongs to.
    pub group: String,
    /// Average throughput reported by the run.
    pub throughput: f64,
}

impl Sample {
    /// Create a sample.
    pub fn new(threads: u32, group: impl Into<String>, throughput: f64) -> Self {
        Self {
            threads,
            group: group.into(),
            throughput,
        }
    }
}

/// Metric-name predicate selecting which records are aggregated.
///
/// Matching is a case-sensitive prefix test.
///
/// ```
/// use benchagg_core::MetricFilter;
///
/// let filter = MetricFilter::default();
/// assert!(filter.matches("put"));
/// assert!(filter.matches("put_batch"));
/// assert!(!filter.matches("get"));
/// assert!(!filter.matches("PUT"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricFilter {
    prefix: String,
}

impl MetricFilter {
    /// Create a filter accepting metric names starting with `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether `metric_name` is selected.
    pub fn matches(&self, metric_name: &str) -> bool {
        metric_name.starts_with(&self.prefix)
    }
}

impl Default for MetricFilter {
    fn default() -> Self {
        Self::new(DEFAULT_METRIC_PREFIX)
    }
}

/// Parse one log line.
///
/// Returns `Ok(None)` for lines that are not metric records or whose metric
/// name is rejected by `filter`. Fields of rejected records are never
/// converted, so a malformed `get` line does not fail a `put` aggregation.
///
/// # Errors
///
/// Returns [`AggError::Parse`] when a selected record lacks a required field,
/// has a non-numeric thread count or throughput, or reports zero threads.
///
/// # Examples
///
/// ```
/// use benchagg_core::{parse_metric_line, MetricFilter};
///
/// let line = "metric: put, malloc: jemalloc, threads: 1, other: x, avg_throughput: 5000000";
/// let sample = parse_metric_line(line, 1, &MetricFilter::default()).unwrap().unwrap();
/// assert_eq!(sample.threads, 1);
/// assert_eq!(sample.group, "jemalloc");
/// assert_eq!(sample.throughput, 5_000_000.0);
///
/// assert!(parse_metric_line("=== banner ===", 2, &MetricFilter::default())
///     .unwrap()
///     .is_none());
/// ```
pub fn parse_metric_line(
    line: &str,
    line_number: usize,
    filter: &MetricFilter,
) -> Result<Option<Sample>> {
    if !line.contains(METRIC_MARKER) {
        return Ok(None);
    }

    let location = Location::Line(line_number);
    let tokens: Vec<&str> = line.split(',').collect();

    let metric = METRIC_NAME.text(&tokens, location)?;
    if !filter.matches(metric) {
        return Ok(None);
    }

    let group = GROUP_KEY.text(&tokens, location)?;
    let threads = THREADS.int(&tokens, location)?;
    let threads = u32::try_from(threads)
        .ok()
        .filter(|&t| t > 0)
        .ok_or_else(|| {
            AggError::parse(
                location,
                THREADS.name,
                format!("thread count must be a positive integer, got {}", threads),
            )
        })?;
    let throughput = THROUGHPUT.float(&tokens, location)?;

    Ok(Some(Sample::new(threads, group, throughput)))
}

/// Read every qualifying sample from a metric-line log.
///
/// This is the first stage of the metric pipeline; the result is folded into
/// a [`GroupAccumulator`](crate::GroupAccumulator) by the second stage.
pub fn read_samples<R: Read>(reader: R, filter: &MetricFilter) -> Result<Vec<Sample>> {
    let mut samples = Vec::new();
    let mut lines = LineReader::new(reader);

    while let Some((line_number, line)) = lines.next_line()? {
        if let Some(sample) = parse_metric_line(&line, line_number, filter)? {
            samples.push(sample);
        }
    }

    debug!(
        lines = lines.line_number(),
        samples = samples.len(),
        prefix = filter.prefix(),
        "read metric samples"
    );
    Ok(samples)
}
