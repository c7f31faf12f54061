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

//! Elementwise averaging of repeated-run resource tables.
//!
//! Rows are aligned by position, not by thread count. All input tables must
//! have the same row count and the same row ordering; a row-count mismatch is
//! rejected, a thread-count mismatch at the same position is only logged.

use crate::block::{ResourceTable, RESOURCE_HEADER};
use crate::error::{AggError, Result};
use tracing::warn;

/// Number of repeated runs produced per configuration by the benchmark scripts.
pub const DEFAULT_RUNS: usize = 5;

/// Number of numeric columns in a resource table.
pub const RESOURCE_COLUMNS: usize = RESOURCE_HEADER.len();

/// One averaged row; columns follow [`RESOURCE_HEADER`].
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedRow {
    /// Mean of each column across runs.
    pub values: [f64; RESOURCE_COLUMNS],
}

impl AveragedRow {
    /// Mean thread count.
    pub fn threads(&self) -> f64 {
        self.values[0]
    }

    /// Mean throughput.
    pub fn throughput(&self) -> f64 {
        self.values[1]
    }
}

/// Result of averaging several resource tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AveragedTable {
    /// Averaged rows, in input row order.
    pub rows: Vec<AveragedRow>,
}

/// Average `tables` elementwise.
///
/// # Errors
///
/// - [`AggError::DataFormat`] if `tables` is empty.
/// - [`AggError::ShapeMismatch`] if any table's row count differs from the first.
///
/// # Examples
///
/// ```
/// use benchagg_core::{average_tables, ResourceTable, ResourceUsageRow};
///
/// let row = |throughput: f64| ResourceUsageRow {
///     threads: 4,
///     throughput,
///     user_time: 1.0,
///     system_time: 0.0,
///     cpu_usage: 0.5,
///     max_rss: 100.0,
///     minor_page_faults: 10.0,
///     voluntary_context_switches: 2.0,
/// };
/// let a = ResourceTable { rows: vec![row(100.0)] };
/// let b = ResourceTable { rows: vec![row(200.0)] };
///
/// let avg = average_tables(&[a, b]).unwrap();
/// assert_eq!(avg.rows[0].throughput(), 150.0);
/// assert_eq!(avg.rows[0].threads(), 4.0);
/// ```
pub fn average_tables(tables: &[ResourceTable]) -> Result<AveragedTable> {
    let first = tables
        .first()
        .ok_or_else(|| AggError::DataFormat("no tables to average".to_string()))?;
    let expected = first.len();

    for (index, table) in tables.iter().enumerate().skip(1) {
        if table.len() != expected {
            return Err(AggError::ShapeMismatch {
                table: index,
                expected,
                actual: table.len(),
            });
        }
        for (row, (a, b)) in first.rows.iter().zip(&table.rows).enumerate() {
            if a.threads != b.threads {
                warn!(
                    table = index,
                    row,
                    expected = a.threads,
                    actual = b.threads,
                    "thread counts differ at the same position"
                );
            }
        }
    }

    let runs = tables.len() as f64;
    let rows = (0..expected)
        .map(|i| {
            let mut sums = [0.0; RESOURCE_COLUMNS];
            for table in tables {
                for (sum, value) in sums.iter_mut().zip(table.rows[i].values()) {
                    *sum += value;
                }
            }
            AveragedRow {
                values: sums.map(|sum| sum / runs),
            }
        })
        .collect();

    Ok(AveragedTable { rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::ResourceUsageRow;

    fn row(threads: u32, base: f64) -> ResourceUsageRow {
        ResourceUsageRow {
            threads,
            throughput: base,
            user_time: base + 1.0,
            system_time: base + 2.0,
            cpu_usage: base + 3.0,
            max_rss: base + 4.0,
            minor_page_faults: base + 5.0,
            voluntary_context_switches: base + 6.0,
        }
    }

    fn table(rows: Vec<ResourceUsageRow>) -> ResourceTable {
        ResourceTable { rows }
    }

    #[test]
    fn test_mean_at_each_position() {
        let tables: Vec<_> = (0..DEFAULT_RUNS)
            .map(|run| table(vec![row(1, run as f64 * 10.0), row(4, run as f64)]))
            .collect();
        let avg = average_tables(&tables).unwrap();

        assert_eq!(avg.rows.len(), 2);
        assert_eq!(avg.rows[0].values, [1.0, 20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0]);
        assert_eq!(avg.rows[1].threads(), 4.0);
        assert_eq!(avg.rows[1].throughput(), 2.0);
    }

    #[test]
    fn test_single_table_is_identity() {
        let t = table(vec![row(2, 7.0)]);
        let avg = average_tables(std::slice::from_ref(&t)).unwrap();
        assert_eq!(avg.rows[0].values, t.rows[0].values());
    }

    #[test]
    fn test_no_tables() {
        assert!(matches!(average_tables(&[]), Err(AggError::DataFormat(_))));
    }

    #[test]
    fn test_row_count_mismatch() {
        let tables = [
            table(vec![row(1, 1.0), row(2, 1.0)]),
            table(vec![row(1, 1.0), row(2, 1.0)]),
            table(vec![row(1, 1.0)]),
        ];
        match average_tables(&tables).unwrap_err() {
            AggError::ShapeMismatch {
                table,
                expected,
                actual,
            } => {
                assert_eq!((table, expected, actual), (2, 2, 1));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_thread_mismatch_is_positional() {
        let tables = [table(vec![row(1, 0.0)]), table(vec![row(3, 0.0)])];
        let avg = average_tables(&tables).unwrap();
        assert_eq!(avg.rows[0].threads(), 2.0);
    }
}
