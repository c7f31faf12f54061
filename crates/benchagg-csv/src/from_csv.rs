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

//! Read resource-usage tables back from CSV.
//!
//! Tables written by [`resource_to_csv`](crate::resource_to_csv) can be read
//! again and fed to [`average_tables`](benchagg_core::average_tables).

use crate::error::{CsvError, Result};
use benchagg_core::{ResourceTable, ResourceUsageRow, RESOURCE_HEADER};
use std::io::Read;

/// Parse a resource-usage CSV string.
///
/// # Example
/// ```
/// use benchagg_csv::resource_from_csv;
///
/// let csv = "n_threads,throughput,usertime,systemtime,cpuusage,max_rss,minor_pf,voluntary_ctx_switch\n\
///            4,1500.5,1.25,0.5,1.87,10240,2113,45\n";
/// let table = resource_from_csv(csv).unwrap();
/// assert_eq!(table.rows[0].threads, 4);
/// assert_eq!(table.rows[0].cpu_usage, 1.87);
/// ```
pub fn resource_from_csv(csv_data: &str) -> Result<ResourceTable> {
    resource_from_csv_reader(csv_data.as_bytes())
}

/// Parse a resource-usage CSV from a reader.
///
/// # Errors
///
/// - [`CsvError::InvalidHeader`] if the header differs from the resource header.
/// - [`CsvError::WidthMismatch`] if a row does not have eight columns.
/// - [`CsvError::TypeMismatch`] if a cell is not numeric.
pub fn resource_from_csv_reader<R: Read>(reader: R) -> Result<ResourceTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for (position, expected) in RESOURCE_HEADER.iter().enumerate() {
        match headers.get(position) {
            Some(actual) if actual == *expected => {}
            actual => {
                return Err(CsvError::InvalidHeader {
                    position,
                    reason: format!("expected '{}', got '{}'", expected, actual.unwrap_or("")),
                })
            }
        }
    }
    if headers.len() != RESOURCE_HEADER.len() {
        return Err(CsvError::InvalidHeader {
            position: RESOURCE_HEADER.len(),
            reason: format!("unexpected extra columns ({} total)", headers.len()),
        });
    }

    let mut table = ResourceTable::default();
    for (index, record) in rdr.records().enumerate() {
        let record = record?;
        let row = index + 1;
        if record.len() != RESOURCE_HEADER.len() {
            return Err(CsvError::WidthMismatch {
                expected: RESOURCE_HEADER.len(),
                actual: record.len(),
                row,
            });
        }

        let mut values = [0.0; 8];
        for (column, slot) in values.iter_mut().enumerate() {
            let cell = &record[column];
            *slot = cell
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| type_mismatch(column, "finite number", cell, row))?;
        }
        let threads = thread_count(values[0]).ok_or_else(|| {
            type_mismatch(0, "non-negative integer", &record[0], row)
        })?;

        table.rows.push(ResourceUsageRow {
            threads,
            throughput: values[1],
            user_time: values[2],
            system_time: values[3],
            cpu_usage: values[4],
            max_rss: values[5],
            minor_page_faults: values[6],
            voluntary_context_switches: values[7],
        });
    }

    Ok(table)
}

fn thread_count(value: f64) -> Option<u32> {
    (value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&value)).then(|| value as u32)
}

fn type_mismatch(column: usize, expected: &str, value: &str, row: usize) -> CsvError {
    CsvError::TypeMismatch {
        column: RESOURCE_HEADER[column].to_string(),
        expected: expected.to_string(),
        value: value.to_string(),
        row,
    }
}
