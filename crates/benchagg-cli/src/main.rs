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

//! benchagg command line interface

use benchagg_cli::cli::{expand_result_dir_flag, Commands};
use clap::Parser;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Crates whose events are shown by default.
const LOG_TARGETS: [&str; 4] = ["benchagg_core", "benchagg_csv", "benchagg_chart", "benchagg_cli"];

/// benchagg - benchmark log aggregation toolkit
///
/// Turns the text output of the allocator benchmark harness into per-thread
/// CSV tables and throughput charts.
///
/// # Examples
///
/// ```bash
/// # Average put throughput per thread and allocator, with a chart
/// benchagg aggregate results/skiplist.out skiplist --result-dir plots
///
/// # Resource usage table of one run
/// benchagg extract out/art-put-jemalloc.out.1 -rd csv
///
/// # Average five runs
/// benchagg average out/art-put-jemalloc.out.{1..5} -o art-put-jemalloc.csv
/// ```
#[derive(Parser)]
#[command(name = "benchagg")]
#[command(author, version, about = "benchagg - benchmark log aggregation toolkit", long_about = None)]
struct Cli {
    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse_from(expand_result_dir_flag(std::env::args_os()));

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let directives: Vec<String> = LOG_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, default_level))
            .collect();
        EnvFilter::new(directives.join(","))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
