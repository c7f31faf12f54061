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

//! Aggregate command - metric-line log to CSV and chart

use super::{csv_text, open_input, report_written, result_path, write_outputs};
use crate::error::CliError;
use benchagg_chart::{ChartSpec, LineChart};
use benchagg_core::{aggregate_metric_log, AggregateConfig, MetricFilter, MissingKeyPolicy};
use benchagg_csv::{aggregated_to_csv_writer, ToCsvConfig};
use tracing::info;

/// Options of the `aggregate` command.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Benchmark log path.
    pub input: String,
    /// Data structure name for the chart title; no chart is drawn without it.
    pub data_structure: Option<String>,
    /// Directory receiving `<stem>_res.csv` and `<stem>_res.svg`.
    pub result_dir: String,
    /// Metric-name prefix selecting the aggregated lines.
    pub metric_prefix: String,
    /// Handling of missing (thread count, allocator) cells.
    pub missing: MissingKeyPolicy,
    /// Delimiter and header settings of the CSV.
    pub csv: ToCsvConfig,
}

/// Aggregate a metric-line log.
///
/// Both outputs are rendered in memory and then written together through
/// [`write_outputs`](super::write_outputs), so a failing run leaves neither
/// file behind.
///
/// # Errors
///
/// Returns `Err` if the input cannot be read, holds no qualifying lines, has
/// a malformed field or a missing cell, or if an output cannot be written.
pub fn aggregate(options: &AggregateOptions) -> Result<(), CliError> {
    info!(path = %options.input, "processing result file");

    let config = AggregateConfig {
        filter: MetricFilter::new(options.metric_prefix.clone()),
        missing_key: options.missing,
    };
    let file = open_input(&options.input)?;
    let table = aggregate_metric_log(file, &config)
        .map_err(|e| CliError::aggregation(&options.input, e))?;

    let mut buffer = Vec::new();
    aggregated_to_csv_writer(&table, &mut buffer, options.csv.clone())?;
    let mut outputs = vec![(
        result_path(&options.input, &options.result_dir, "csv")?,
        csv_text(buffer)?,
    )];

    if let Some(data_structure) = &options.data_structure {
        let spec = ChartSpec::from_table(&table, data_structure);
        outputs.push((
            result_path(&options.input, &options.result_dir, "svg")?,
            LineChart::default().render(&spec)?,
        ));
    }

    write_outputs(&outputs)?;
    for (path, _) in &outputs {
        report_written(path);
    }
    Ok(())
}
