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

//! Write aggregated and resource-usage tables as CSV.

use crate::error::{CsvError, Result};
use benchagg_core::{AggregatedTable, AveragedTable, ResourceTable, RESOURCE_HEADER};
use std::io::Write;

/// Configuration for CSV output.
#[derive(Debug, Clone)]
pub struct ToCsvConfig {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Include header row (default: true)
    pub include_headers: bool,
}

impl Default for ToCsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_headers: true,
        }
    }
}

/// Convert an aggregated table to a CSV string.
///
/// The output is the header `threads,<group>...` followed by one line per
/// thread count with integer means. Equal tables always give identical bytes.
///
/// # Example
/// ```
/// use benchagg_core::{GroupAccumulator, MissingKeyPolicy, Sample};
/// use benchagg_csv::aggregated_to_csv;
///
/// let samples = [Sample::new(1, "jemalloc", 10.0), Sample::new(4, "jemalloc", 30.0)];
/// let table = GroupAccumulator::from_samples(&samples)
///     .aggregate(MissingKeyPolicy::Error)
///     .unwrap();
///
/// assert_eq!(aggregated_to_csv(&table).unwrap(), "threads,jemalloc\n1,10\n4,30\n");
/// ```
pub fn aggregated_to_csv(table: &AggregatedTable) -> Result<String> {
    let mut buffer = Vec::new();
    aggregated_to_csv_writer(table, &mut buffer, ToCsvConfig::default())?;
    into_string(buffer)
}

/// Write an aggregated table as CSV with custom configuration.
pub fn aggregated_to_csv_writer<W: Write>(
    table: &AggregatedTable,
    writer: W,
    config: ToCsvConfig,
) -> Result<()> {
    let rows = table.rows().iter().map(|row| {
        std::iter::once(row.threads.to_string())
            .chain(row.means.iter().map(i64::to_string))
            .collect::<Vec<_>>()
    });
    write_table(writer, table.header(), rows, &config)
}

/// Convert a resource-usage table to a CSV string with the fixed resource header.
///
/// # Example
/// ```
/// use benchagg_core::{ResourceTable, ResourceUsageRow};
/// use benchagg_csv::resource_to_csv;
///
/// let table = ResourceTable {
///     rows: vec![ResourceUsageRow {
///         threads: 4,
///         throughput: 1500.5,
///         user_time: 1.25,
///         system_time: 0.5,
///         cpu_usage: 1.87,
///         max_rss: 10240.0,
///         minor_page_faults: 2113.0,
///         voluntary_context_switches: 45.0,
///     }],
/// };
///
/// let csv = resource_to_csv(&table).unwrap();
/// assert_eq!(
///     csv,
///     "n_threads,throughput,usertime,systemtime,cpuusage,max_rss,minor_pf,voluntary_ctx_switch\n\
///      4,1500.5,1.25,0.5,1.87,10240,2113,45\n"
/// );
/// ```
pub fn resource_to_csv(table: &ResourceTable) -> Result<String> {
    let mut buffer = Vec::new();
    resource_to_csv_writer(table, &mut buffer, ToCsvConfig::default())?;
    into_string(buffer)
}

/// Write a resource-usage table as CSV with custom configuration.
pub fn resource_to_csv_writer<W: Write>(
    table: &ResourceTable,
    writer: W,
    config: ToCsvConfig,
) -> Result<()> {
    let rows = table.rows.iter().map(|row| {
        let values = row.values();
        std::iter::once(row.threads.to_string())
            .chain(values[1..].iter().map(f64::to_string))
            .collect::<Vec<_>>()
    });
    write_table(writer, RESOURCE_HEADER, rows, &config)
}

/// Convert an averaged table to a CSV string with the fixed resource header.
pub fn averaged_to_csv(table: &AveragedTable) -> Result<String> {
    let mut buffer = Vec::new();
    averaged_to_csv_writer(table, &mut buffer, ToCsvConfig::default())?;
    into_string(buffer)
}

/// Write an averaged table as CSV with custom configuration.
pub fn averaged_to_csv_writer<W: Write>(
    table: &AveragedTable,
    writer: W,
    config: ToCsvConfig,
) -> Result<()> {
    let rows = table
        .rows
        .iter()
        .map(|row| row.values.iter().map(f64::to_string).collect::<Vec<_>>());
    write_table(writer, RESOURCE_HEADER, rows, &config)
}

fn write_table<W, H, R>(writer: W, header: H, rows: R, config: &ToCsvConfig) -> Result<()>
where
    W: Write,
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    R: Iterator<Item = Vec<String>>,
{
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    if config.include_headers {
        wtr.write_record(header)?;
    }
    for record in rows {
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

fn into_string(buffer: Vec<u8>) -> Result<String> {
    String::from_utf8(buffer).map_err(|_| CsvError::InvalidUtf8 {
        context: "CSV output".to_string(),
    })
}
