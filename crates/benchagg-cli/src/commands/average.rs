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

//! Average command - elementwise mean of repeated runs

use super::{csv_text, open_input, report_written, write_output};
use crate::error::CliError;
use benchagg_core::{
    average_tables, parse_blocks, AggError, BlockConfig, ResourceTable, DEFAULT_RUNS,
};
use benchagg_csv::{averaged_to_csv_writer, resource_from_csv_reader, ToCsvConfig};
use std::path::Path;
use tracing::{info, warn};

/// Average the resource tables of `inputs` and write the result as CSV.
///
/// # Errors
///
/// Returns `Err` if any input fails to load, the tables differ in row count,
/// or the output cannot be written.
pub fn average(
    inputs: &[String],
    output: Option<&str>,
    strict_blocks: bool,
    csv: &ToCsvConfig,
) -> Result<(), CliError> {
    if inputs.len() != DEFAULT_RUNS {
        warn!(runs = inputs.len(), expected = DEFAULT_RUNS, "unusual number of runs");
    }

    let config = BlockConfig {
        truncate_incomplete_block: !strict_blocks,
    };
    let tables = inputs
        .iter()
        .map(|input| load_table(input, &config))
        .collect::<Result<Vec<_>, _>>()?;
    info!(runs = tables.len(), "averaging runs");

    let averaged = average_tables(&tables).map_err(|e| {
        let culprit = match &e {
            AggError::ShapeMismatch { table, .. } => inputs.get(*table),
            _ => inputs.first(),
        };
        CliError::aggregation(culprit.map(String::as_str).unwrap_or_default(), e)
    })?;
    let mut buffer = Vec::new();
    averaged_to_csv_writer(&averaged, &mut buffer, csv.clone())?;

    let path = output.map(Path::new);
    write_output(&csv_text(buffer)?, path)?;
    if let Some(path) = path {
        report_written(path);
    }
    Ok(())
}

fn load_table(input: &str, config: &BlockConfig) -> Result<ResourceTable, CliError> {
    let file = open_input(input)?;
    let is_csv = Path::new(input)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        resource_from_csv_reader(file).map_err(|e| CliError::Csv(format!("{}: {}", input, e)))
    } else {
        parse_blocks(file, config).map_err(|e| CliError::aggregation(input, e))
    }
}
