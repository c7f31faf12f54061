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

//! Error types for CSV conversion operations.

use thiserror::Error;

/// CSV conversion error types.
///
/// # Examples
///
/// ```
/// use benchagg_csv::CsvError;
///
/// let err = CsvError::TypeMismatch {
///     column: "max_rss".to_string(),
///     expected: "number".to_string(),
///     value: "abc".to_string(),
///     row: 3,
/// };
///
/// assert_eq!(
///     err.to_string(),
///     "Type mismatch in column 'max_rss' of row 3: expected number, got 'abc'"
/// );
/// ```
#[derive(Debug, Error)]
pub enum CsvError {
    /// Type mismatch when converting values.
    #[error("Type mismatch in column '{column}' of row {row}: expected {expected}, got '{value}'")]
    TypeMismatch {
        /// Column name where the mismatch occurred.
        column: String,
        /// Expected type description.
        expected: String,
        /// Actual value that failed to convert.
        value: String,
        /// Row number where the mismatch occurred (1-based, header excluded).
        row: usize,
    },

    /// Invalid header format or content.
    ///
    /// ```
    /// use benchagg_csv::CsvError;
    ///
    /// let err = CsvError::InvalidHeader {
    ///     position: 2,
    ///     reason: "expected 'usertime', got 'utime'".to_string(),
    /// };
    /// assert!(err.to_string().contains("position 2"));
    /// ```
    #[error("Invalid header at position {position}: {reason}")]
    InvalidHeader {
        /// Position of the invalid header (0-based).
        position: usize,
        /// Reason the header is invalid.
        reason: String,
    },

    /// Row has wrong number of columns.
    #[error("Row width mismatch: expected {expected} columns, got {actual} in row {row}")]
    WidthMismatch {
        /// Expected number of columns.
        expected: usize,
        /// Actual number of columns in the row.
        actual: usize,
        /// Row number where the mismatch occurred (1-based).
        row: usize,
    },

    /// I/O error during CSV reading or writing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from underlying CSV library.
    #[error("CSV library error: {0}")]
    CsvLib(#[from] csv::Error),

    /// Output was not valid UTF-8.
    #[error("Invalid UTF-8 in {context}")]
    InvalidUtf8 {
        /// What was being produced.
        context: String,
    },
}

/// Result type for CSV operations.
pub type Result<T> = std::result::Result<T, CsvError>;
