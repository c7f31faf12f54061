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

//! Error types for chart rendering.

use std::path::PathBuf;
use thiserror::Error;

/// Chart rendering error types.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Nothing to draw: no x keys or no series.
    #[error("Chart has no data: {0}")]
    EmptySeries(String),

    /// A series does not have one value per x key.
    ///
    /// ```
    /// use benchagg_chart::ChartError;
    ///
    /// let err = ChartError::LengthMismatch {
    ///     series: "jemalloc".to_string(),
    ///     expected: 6,
    ///     actual: 5,
    /// };
    /// assert_eq!(
    ///     err.to_string(),
    ///     "Series 'jemalloc' has 5 values, expected 6 (one per x key)"
    /// );
    /// ```
    #[error("Series '{series}' has {actual} values, expected {expected} (one per x key)")]
    LengthMismatch {
        /// Series name.
        series: String,
        /// Number of x keys.
        expected: usize,
        /// Number of values in the series.
        actual: usize,
    },

    /// The y-axis range is empty or not finite.
    #[error("Invalid y range: [{min}, {max}]")]
    InvalidRange {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Writing the image failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// Output path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Writing the SVG markup failed.
    #[error("SVG write error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The rendered markup is not valid UTF-8.
    #[error("Invalid UTF-8 in SVG output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;
