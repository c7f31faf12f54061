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

//! CLI command implementations

mod aggregate;
mod average;
mod extract;

pub use aggregate::{aggregate, AggregateOptions};
pub use average::average;
pub use extract::extract;

use crate::error::CliError;
use colored::Colorize;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Default maximum input size (1 GB).
/// Can be overridden via the `BENCHAGG_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`].
pub const MAX_FILE_SIZE_ENV: &str = "BENCHAGG_MAX_FILE_SIZE";

fn get_max_file_size() -> u64 {
    std::env::var(MAX_FILE_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Open an input file after checking its size against the configured limit.
///
/// The returned handle is read line by line by the parsers and closed when it
/// goes out of scope.
///
/// # Errors
///
/// - [`CliError::Io`] if the metadata cannot be read or the file cannot be opened.
/// - [`CliError::FileTooLarge`] if the file exceeds `BENCHAGG_MAX_FILE_SIZE`.
pub fn open_input(path: &str) -> Result<File, CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;

    let max_file_size = get_max_file_size();
    if metadata.len() > max_file_size {
        return Err(CliError::file_too_large(path, metadata.len(), max_file_size));
    }

    File::open(path).map_err(|e| CliError::io_error(path, e))
}

/// Base name of `input` up to its first `.`.
///
/// ```
/// use benchagg_cli::commands::output_stem;
///
/// assert_eq!(output_stem("logs/skiplist.out.3").unwrap(), "skiplist");
/// assert_eq!(output_stem("results").unwrap(), "results");
/// ```
///
/// # Errors
///
/// Returns [`CliError::InvalidInput`] if the base name is empty or starts with `.`.
pub fn output_stem(input: &str) -> Result<String, CliError> {
    let name = file_name(input)?;
    match name.split('.').next() {
        Some(stem) if !stem.is_empty() => Ok(stem.to_string()),
        _ => Err(CliError::InvalidInput(format!(
            "cannot derive an output name from '{}'",
            input
        ))),
    }
}

/// Full base name of `input`.
///
/// # Errors
///
/// Returns [`CliError::InvalidInput`] if `input` has no file name component.
pub fn file_name(input: &str) -> Result<String, CliError> {
    Path::new(input)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| CliError::InvalidInput(format!("'{}' does not name a file", input)))
}

/// `<result_dir>/<stem>_res.<extension>` for an aggregation input.
///
/// ```
/// use benchagg_cli::commands::result_path;
/// use std::path::PathBuf;
///
/// assert_eq!(
///     result_path("runs/hashmap.log", "plots", "csv").unwrap(),
///     PathBuf::from("plots/hashmap_res.csv")
/// );
/// ```
pub fn result_path(input: &str, result_dir: &str, extension: &str) -> Result<PathBuf, CliError> {
    let stem = output_stem(input)?;
    Ok(Path::new(result_dir).join(format!("{}_res.{}", stem, extension)))
}

/// Write content to a file or stdout.
///
/// Missing parent directories of `path` are created first.
///
/// # Errors
///
/// Returns [`CliError::Io`] if a directory cannot be created or the write fails.
pub fn write_output(content: &str, path: Option<&Path>) -> Result<(), CliError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| CliError::io_error(parent, e))?;
            }
            fs::write(path, content).map_err(|e| CliError::io_error(path, e))
        }
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}

/// Write several files so that either all of them land or none do.
///
/// Each file is staged as a hidden `.<name>.tmp` sibling of its target. The
/// staged files are renamed into place once every one of them was written.
/// If any step fails, the staged files and the targets renamed so far are
/// removed.
///
/// # Errors
///
/// Returns [`CliError::Io`] naming the path whose write or rename failed.
pub fn write_outputs(outputs: &[(PathBuf, String)]) -> Result<(), CliError> {
    let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(outputs.len());

    for (path, content) in outputs {
        let staging = match staging_path(path) {
            Ok(staging) => staging,
            Err(e) => {
                discard(&staged, 0);
                return Err(e);
            }
        };
        if let Err(e) = write_output(content, Some(&staging)) {
            let _ = fs::remove_file(&staging);
            discard(&staged, 0);
            return Err(e);
        }
        staged.push((staging, path.as_path()));
    }

    for (index, (staging, path)) in staged.iter().enumerate() {
        if let Err(e) = fs::rename(staging, path) {
            discard(&staged, index);
            return Err(CliError::io_error(*path, e));
        }
    }
    Ok(())
}

/// Hidden sibling of `path` used while staging.
fn staging_path(path: &Path) -> Result<PathBuf, CliError> {
    let name = path.file_name().and_then(|name| name.to_str()).ok_or_else(|| {
        CliError::InvalidInput(format!("'{}' does not name a file", path.display()))
    })?;
    Ok(path.with_file_name(format!(".{}.tmp", name)))
}

/// Undo a staged write: targets before `renamed` were already moved into place.
fn discard(staged: &[(PathBuf, &Path)], renamed: usize) {
    for (index, (staging, path)) in staged.iter().enumerate() {
        let leftover: &Path = if index < renamed { path } else { staging };
        if let Err(e) = fs::remove_file(leftover) {
            warn!(path = %leftover.display(), error = %e, "could not remove partial output");
        }
    }
}

/// Bytes produced by a CSV writer, as text.
fn csv_text(bytes: Vec<u8>) -> Result<String, CliError> {
    String::from_utf8(bytes)
        .map_err(|e| CliError::Csv(format!("invalid UTF-8 in CSV output: {}", e)))
}

fn report_written(path: &Path) {
    println!("{} {}", "✓".green().bold(), path.display());
}
