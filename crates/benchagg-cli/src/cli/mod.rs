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

//! CLI command definitions and argument parsing.

use crate::commands::{self, AggregateOptions};
use crate::error::CliError;
use benchagg_core::MissingKeyPolicy;
use benchagg_csv::ToCsvConfig;
use clap::{Args, Subcommand, ValueEnum};
use std::ffi::OsString;

/// Two-letter result-directory flag used by the harness scripts.
pub const SHORT_RESULT_DIR_FLAG: &str = "-rd";

/// Rewrite the `-rd` spelling of the result-directory flag to `--result-dir`.
///
/// clap short flags are one character, so `-rd out` would otherwise parse as
/// `-r d` followed by a stray `out`. Both `-rd DIR` and `-rd=DIR` are
/// rewritten; arguments after `--` are left alone.
///
/// ```
/// use benchagg_cli::cli::expand_result_dir_flag;
///
/// let args = expand_result_dir_flag(["benchagg", "aggregate", "x.log", "-rd", "out"]);
/// assert_eq!(args, ["benchagg", "aggregate", "x.log", "--result-dir", "out"]);
/// ```
pub fn expand_result_dir_flag<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut literal = false;
    args.into_iter()
        .map(|arg| {
            let arg = arg.into();
            if literal {
                return arg;
            }
            if arg == "--" {
                literal = true;
                return arg;
            }
            if arg == SHORT_RESULT_DIR_FLAG {
                return OsString::from("--result-dir");
            }
            match arg.to_str().and_then(|a| a.strip_prefix("-rd=")) {
                Some(dir) => OsString::from(format!("--result-dir={}", dir)),
                None => arg,
            }
        })
        .collect()
}

/// CSV formatting flags shared by the table-writing commands.
#[derive(Debug, Clone, Args)]
pub struct CsvArgs {
    /// Field delimiter of the written CSV (one ASCII character)
    #[arg(long, default_value_t = ',')]
    pub delimiter: char,

    /// Omit the header row
    #[arg(long)]
    pub no_header: bool,
}

impl CsvArgs {
    /// CSV writer configuration for these flags.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidInput`] if the delimiter is not ASCII.
    pub fn to_config(&self) -> Result<ToCsvConfig, CliError> {
        if !self.delimiter.is_ascii() {
            return Err(CliError::InvalidInput(format!(
                "CSV delimiter '{}' is not an ASCII character",
                self.delimiter
            )));
        }
        Ok(ToCsvConfig {
            delimiter: self.delimiter as u8,
            include_headers: !self.no_header,
        })
    }
}

/// Handling of a thread count that has no samples for one of the allocators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MissingArg {
    /// Abort with an error naming the thread count and allocator
    Error,
    /// Write 0 for the missing cell
    Zero,
}

impl From<MissingArg> for MissingKeyPolicy {
    fn from(arg: MissingArg) -> Self {
        match arg {
            MissingArg::Error => MissingKeyPolicy::Error,
            MissingArg::Zero => MissingKeyPolicy::Zero,
        }
    }
}

/// Top-level CLI commands.
///
/// # Examples
///
/// ```no_run
/// use benchagg_cli::cli::Commands;
/// use clap::Parser;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(subcommand)]
///     command: Commands,
/// }
/// ```
#[derive(Subcommand)]
pub enum Commands {
    /// Average metric-line throughput per thread count and allocator
    ///
    /// Reads `metric: put, malloc: ..., threads: ..., avg_throughput: ...`
    /// lines, averages the throughput of each (threads, allocator) pair and
    /// writes `<result_dir>/<stem>_res.csv`. When a data structure name is
    /// given, a line chart `<stem>_res.svg` is written as well.
    Aggregate {
        /// Benchmark log to process
        #[arg(value_name = "FILE")]
        input_file_path: String,

        /// Data structure name used in the chart title
        #[arg(value_name = "DATA_STRUCTURE")]
        data_structure: Option<String>,

        /// Directory receiving the results
        #[arg(short = 'r', long, alias = "result_dir", default_value = ".")]
        result_dir: String,

        /// Skip the chart even if a data structure is given
        #[arg(long)]
        no_chart: bool,

        /// Only aggregate metrics whose name starts with this prefix
        #[arg(long, default_value = benchagg_core::DEFAULT_METRIC_PREFIX)]
        metric_prefix: String,

        /// What to do when a thread count lacks an allocator seen elsewhere
        #[arg(long, value_enum, default_value = "error")]
        missing: MissingArg,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Convert a four-line block log into a resource-usage CSV
    ///
    /// Writes `<result_dir>/<file name>.csv` with the columns n_threads,
    /// throughput, usertime, systemtime, cpuusage, max_rss, minor_pf and
    /// voluntary_ctx_switch.
    Extract {
        /// Block log to process
        #[arg(value_name = "FILE")]
        input_file_path: String,

        /// Directory receiving the CSV
        #[arg(short = 'r', long, alias = "result_dir", default_value = ".")]
        result_dir: String,

        /// Fail on a trailing incomplete block instead of dropping it
        #[arg(long)]
        strict_blocks: bool,

        #[command(flatten)]
        csv: CsvArgs,
    },

    /// Average the resource tables of repeated runs
    ///
    /// Inputs ending in `.csv` are read as tables written by `extract`, all
    /// others are parsed as block logs. Rows are matched by position.
    Average {
        /// Runs to average
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<String>,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Fail on a trailing incomplete block instead of dropping it
        #[arg(long)]
        strict_blocks: bool,

        #[command(flatten)]
        csv: CsvArgs,
    },
}

impl Commands {
    /// Run the command.
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            Commands::Aggregate {
                input_file_path,
                data_structure,
                result_dir,
                no_chart,
                metric_prefix,
                missing,
                csv,
            } => commands::aggregate(&AggregateOptions {
                input: input_file_path,
                data_structure: if no_chart { None } else { data_structure },
                result_dir,
                metric_prefix,
                missing: missing.into(),
                csv: csv.to_config()?,
            }),
            Commands::Extract {
                input_file_path,
                result_dir,
                strict_blocks,
                csv,
            } => commands::extract(&input_file_path, &result_dir, strict_blocks, &csv.to_config()?),
            Commands::Average {
                inputs,
                output,
                strict_blocks,
                csv,
            } => commands::average(&inputs, output.as_deref(), strict_blocks, &csv.to_config()?),
        }
    }
}
