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

//! Extract command - block log to resource-usage CSV

use super::{csv_text, file_name, open_input, report_written, write_outputs};
use crate::error::CliError;
use benchagg_core::{parse_blocks, BlockConfig};
use benchagg_csv::{resource_to_csv_writer, ToCsvConfig};
use std::path::Path;
use tracing::info;

/// Convert a four-line block log into `<result_dir>/<file name>.csv`.
///
/// # Errors
///
/// Returns `Err` if the input cannot be read, a block is malformed, a
/// trailing block is incomplete under `strict_blocks`, or the write fails.
pub fn extract(
    input: &str,
    result_dir: &str,
    strict_blocks: bool,
    csv: &ToCsvConfig,
) -> Result<(), CliError> {
    info!(path = %input, "extracting resource usage");

    let config = BlockConfig {
        truncate_incomplete_block: !strict_blocks,
    };
    let file = open_input(input)?;
    let table = parse_blocks(file, &config).map_err(|e| CliError::aggregation(input, e))?;
    let mut buffer = Vec::new();
    resource_to_csv_writer(&table, &mut buffer, csv.clone())?;

    let path = Path::new(result_dir).join(format!("{}.csv", file_name(input)?));
    write_outputs(&[(path.clone(), csv_text(buffer)?)])?;
    report_written(&path);
    Ok(())
}
