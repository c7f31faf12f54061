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

//! Structured error types for the benchagg CLI.
//!
//! Every command returns `Result<(), CliError>`; `main` prints the message and
//! exits with a failure status.

use benchagg_chart::ChartError;
use benchagg_core::AggError;
use benchagg_csv::CsvError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for benchagg CLI operations.
///
/// # Examples
///
/// ```rust,no_run
/// use benchagg_cli::error::CliError;
///
/// fn read(path: &str) -> Result<String, CliError> {
///     std::fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed (file open, read, write, or directory creation).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Input file exceeds the configured size limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes ({max_mb} MB)")]
    FileTooLarge {
        /// The file path that exceeded the limit
        path: PathBuf,
        /// The actual file size in bytes
        actual: u64,
        /// The maximum allowed file size in bytes
        max: u64,
        /// The maximum allowed file size in MB (for display)
        max_mb: u64,
    },

    /// Parsing or aggregating a benchmark log failed.
    #[error("{path}: {message}")]
    Aggregation {
        /// The input being processed
        path: PathBuf,
        /// The underlying error message
        message: String,
    },

    /// CSV conversion error.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Chart rendering error.
    #[error("Chart error: {0}")]
    Chart(String),

    /// Invalid input provided by the user.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    /// Wrap an aggregation error with the input path.
    pub fn aggregation(path: impl Into<PathBuf>, source: AggError) -> Self {
        Self::Aggregation {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

impl From<CsvError> for CliError {
    fn from(err: CsvError) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<ChartError> for CliError {
    fn from(err: ChartError) -> Self {
        Self::Chart(err.to_string())
    }
}
