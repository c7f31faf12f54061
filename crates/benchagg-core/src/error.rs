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

//! Error types for benchmark log parsing and aggregation.

use std::fmt;
use thiserror::Error;

/// Where in the input an error was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A 1-based line number in a metric-line log.
    Line(usize),
    /// A 0-based block index in a fixed-layout block log.
    Block(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(line) => write!(f, "line {}", line),
            Self::Block(index) => write!(f, "block {}", index),
        }
    }
}

/// Aggregation error types.
///
/// Every variant is fatal: the pipelines never recover locally and never
/// retry, so callers should surface the message and abort the run.
///
/// # Examples
///
/// ```
/// use benchagg_core::{AggError, Location};
///
/// let err = AggError::Parse {
///     location: Location::Line(7),
///     field: "threads".to_string(),
///     message: "invalid integer 'four'".to_string(),
/// };
/// assert_eq!(
///     err.to_string(),
///     "Parse error at line 7 in field 'threads': invalid integer 'four'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum AggError {
    /// The input holds no qualifying records, or its overall shape is wrong.
    ///
    /// ```
    /// use benchagg_core::AggError;
    ///
    /// let err = AggError::DataFormat("no put metrics found".to_string());
    /// assert!(err.to_string().starts_with("Data format error"));
    /// ```
    #[error("Data format error: {0}")]
    DataFormat(String),

    /// A field could not be located or converted to the expected type.
    #[error("Parse error at {location} in field '{field}': {message}")]
    Parse {
        /// Line or block holding the offending field.
        location: Location,
        /// Name of the field being extracted.
        field: String,
        /// What went wrong.
        message: String,
    },

    /// A thread-count bucket lacks a group key present in the reference bucket.
    #[error("Missing key error: group '{group}' has no samples at {threads} threads")]
    MissingKey {
        /// Thread count of the incomplete bucket.
        threads: u32,
        /// Group key without samples.
        group: String,
    },

    /// A group mean cannot be represented as a whole number.
    #[error("Out of range: mean {value} of group '{group}' at {threads} threads exceeds i64")]
    OutOfRange {
        /// Thread count of the bucket.
        threads: u32,
        /// Group key whose mean overflowed.
        group: String,
        /// The unrounded mean.
        value: f64,
    },

    /// Tables handed to the multi-run averager do not line up.
    #[error("Shape mismatch: table {table} has {actual} rows, expected {expected}")]
    ShapeMismatch {
        /// Index of the offending table (0-based).
        table: usize,
        /// Row count of the first table.
        expected: usize,
        /// Row count of the offending table.
        actual: usize,
    },

    /// I/O error while reading the log.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AggError {
    /// Create a parse error for `field` at `location`.
    pub fn parse(location: Location, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            location,
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, AggError>;
