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

//! Fixed-layout block logs with resource-usage figures.
//!
//! Each run at one thread count produces a block of four lines:
//!
//! ```text
//! Running skiplist put with jemalloc          <- ignored
//! metric: put, #threads: 4, total throughput: 812000, avg throughput: 203000.5
//! 1.52,0.31,187%,10240,2113,45                <- user, sys, cpu, rss, minor pf, voluntary cs
//! ----                                        <- ignored
//! ```

use crate::error::{AggError, Location, Result};
use crate::field::{FieldIndex, FieldKind, FieldSpec, ValueShape};
use crate::reader::LineReader;
use std::io::Read;
use tracing::{debug, warn};

/// Number of lines in one block.
pub const LINES_PER_BLOCK: usize = 4;

/// Number of comma-separated fields on the resource line.
pub const RESOURCE_FIELDS: usize = 6;

/// CSV header of a resource-usage table.
pub const RESOURCE_HEADER: [&str; 8] = [
    "n_threads",
    "throughput",
    "usertime",
    "systemtime",
    "cpuusage",
    "max_rss",
    "minor_pf",
    "voluntary_ctx_switch",
];

const THREADS: FieldSpec =
    FieldSpec::new("n_threads", FieldIndex::At(1), ValueShape::LastWord, FieldKind::Int);
const THROUGHPUT: FieldSpec =
    FieldSpec::new("throughput", FieldIndex::Last, ValueShape::LastWord, FieldKind::Float);

const fn resource(name: &'static str, index: usize) -> FieldSpec {
    FieldSpec::new(name, FieldIndex::At(index), ValueShape::Bare, FieldKind::Percent)
}

const RESOURCES: [FieldSpec; RESOURCE_FIELDS] = [
    resource("usertime", 0),
    resource("systemtime", 1),
    resource("cpuusage", 2),
    resource("max_rss", 3),
    resource("minor_pf", 4),
    resource("voluntary_ctx_switch", 5),
];

/// Block parsing configuration.
///
/// ```
/// use benchagg_core::BlockConfig;
///
/// assert!(BlockConfig::default().truncate_incomplete_block);
/// ```
#[derive(Debug, Clone)]
pub struct BlockConfig {
    /// Silently drop a trailing block with fewer than four lines (default: `true`).
    ///
    /// When `false`, such a block is a [`AggError::DataFormat`] error.
    pub truncate_incomplete_block: bool,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            truncate_incomplete_block: true,
        }
    }
}

/// Throughput and resource usage of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceUsageRow {
    /// Thread count of the run.
    pub threads: u32,
    /// Average throughput.
    pub throughput: f64,
    /// User CPU time in seconds.
    pub user_time: f64,
    /// System CPU time in seconds.
    pub system_time: f64,
    /// CPU usage as a fraction (1.87 for 187%).
    pub cpu_usage: f64,
    /// Maximum resident set size.
    pub max_rss: f64,
    /// Minor page faults.
    pub minor_page_faults: f64,
    /// Voluntary context switches.
    pub voluntary_context_switches: f64,
}

impl ResourceUsageRow {
    /// All columns as numbers, in [`RESOURCE_HEADER`] order.
    pub fn values(&self) -> [f64; 8] {
        [
            f64::from(self.threads),
            self.throughput,
            self.user_time,
            self.system_time,
            self.cpu_usage,
            self.max_rss,
            self.minor_page_faults,
            self.voluntary_context_switches,
        ]
    }
}

/// Resource-usage rows in block order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceTable {
    /// One row per block, not sorted.
    pub rows: Vec<ResourceUsageRow>,
}

impl ResourceTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parse one four-line block.
///
/// # Errors
///
/// Returns [`AggError::Parse`] naming `block_index` and the offending field.
///
/// # Examples
///
/// ```
/// use benchagg_core::parse_block;
///
/// let lines = [
///     "run",
///     "metric: put, #threads: 8, total throughput: 80, avg throughput: 10.5",
///     "1.5,0.25,55.5%,1234,10,3",
///     "",
/// ];
/// let row = parse_block(0, &lines).unwrap();
/// assert_eq!(row.threads, 8);
/// assert_eq!(row.throughput, 10.5);
/// assert_eq!(row.cpu_usage, 0.555);
/// assert_eq!(row.max_rss, 1234.0);
/// ```
pub fn parse_block<S: AsRef<str>>(block_index: usize, lines: &[S]) -> Result<ResourceUsageRow> {
    let location = Location::Block(block_index);
    if lines.len() < LINES_PER_BLOCK {
        return Err(AggError::parse(
            location,
            "block",
            format!("expected {} lines, got {}", LINES_PER_BLOCK, lines.len()),
        ));
    }

    let summary: Vec<&str> = lines[1].as_ref().split(',').collect();
    let threads = THREADS.int(&summary, location)?;
    let threads = u32::try_from(threads).map_err(|_| {
        AggError::parse(location, THREADS.name, format!("thread count out of range: {}", threads))
    })?;
    let throughput = THROUGHPUT.float(&summary, location)?;

    let usage: Vec<&str> = lines[2].as_ref().split(',').collect();
    if usage.len() != RESOURCE_FIELDS {
        return Err(AggError::parse(
            location,
            "resource usage",
            format!("expected {} fields, got {}", RESOURCE_FIELDS, usage.len()),
        ));
    }
    let mut values = [0.0; RESOURCE_FIELDS];
    for (slot, spec) in values.iter_mut().zip(RESOURCES.iter()) {
        *slot = spec.float(&usage, location)?;
    }
    let [
        user_time,
        system_time,
        cpu_usage,
        max_rss,
        minor_page_faults,
        voluntary_context_switches,
    ] = values;

    Ok(ResourceUsageRow {
        threads,
        throughput,
        user_time,
        system_time,
        cpu_usage,
        max_rss,
        minor_page_faults,
        voluntary_context_switches,
    })
}

/// Parse a block log into one row per complete block, in block order.
///
/// # Errors
///
/// - [`AggError::Parse`] for a malformed block.
/// - [`AggError::DataFormat`] for a trailing partial block when
///   [`BlockConfig::truncate_incomplete_block`] is `false`.
pub fn parse_blocks<R: Read>(reader: R, config: &BlockConfig) -> Result<ResourceTable> {
    let mut table = ResourceTable::default();
    let mut block = Vec::with_capacity(LINES_PER_BLOCK);

    for line in LineReader::new(reader) {
        let (_, line) = line?;
        block.push(line);
        if block.len() == LINES_PER_BLOCK {
            table.rows.push(parse_block(table.rows.len(), &block)?);
            block.clear();
        }
    }

    if !block.is_empty() {
        if !config.truncate_incomplete_block {
            return Err(AggError::DataFormat(format!(
                "trailing block {} has {} of {} lines",
                table.rows.len(),
                block.len(),
                LINES_PER_BLOCK
            )));
        }
        warn!(
            block = table.rows.len(),
            lines = block.len(),
            "dropping incomplete trailing block"
        );
    }

    debug!(rows = table.rows.len(), "parsed resource blocks");
    Ok(table)
}
