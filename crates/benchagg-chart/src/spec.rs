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

//! Chart description handed to the renderer.

use crate::error::{ChartError, Result};
use benchagg_core::AggregatedTable;

/// Padding added below the smallest and above the largest plotted value.
pub const RANGE_PADDING: f64 = 500.0;

/// X-axis label of throughput charts.
pub const THREADS_LABEL: &str = "Number of threads";

/// Y-axis label of throughput charts.
pub const PUTS_LABEL: &str = "puts/sec in thousands";

/// Transform applied to every value before plotting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueScale {
    /// Plot values as given.
    #[default]
    Identity,
    /// Divide by 1000 and round to the nearest integer.
    Thousands,
}

impl ValueScale {
    /// Apply the transform to one value.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Thousands => to_thousands(value),
        }
    }
}

/// Express a throughput in thousands per second, rounded.
///
/// ```
/// use benchagg_chart::to_thousands;
///
/// assert_eq!(to_thousands(5_500_400.0), 5500.0);
/// assert_eq!(to_thousands(1_499.0), 1.0);
/// ```
pub fn to_thousands(value: f64) -> f64 {
    (value / 1000.0).round()
}

/// Y range `[max(0, min - 500), max + 500]` in thousands.
///
/// `min` and `max` are raw throughput values.
///
/// ```
/// use benchagg_chart::padded_range;
///
/// assert_eq!(padded_range(2_000_000.0, 6_000_000.0), (1500.0, 6500.0));
/// assert_eq!(padded_range(100_000.0, 200_000.0), (0.0, 700.0));
/// ```
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    (
        (to_thousands(min) - RANGE_PADDING).max(0.0),
        to_thousands(max) + RANGE_PADDING,
    )
}

/// One named line of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Legend label.
    pub name: String,
    /// One value per x key, before scaling.
    pub values: Vec<f64>,
}

/// Everything needed to draw a line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// Category labels along the x axis, in plotting order.
    pub x_keys: Vec<String>,
    /// Lines to draw.
    pub series: Vec<Series>,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// Chart title.
    pub title: String,
    /// Y-axis bounds, in scaled units.
    pub y_range: (f64, f64),
    /// Transform applied to series values before plotting.
    pub scale: ValueScale,
}

impl ChartSpec {
    /// Build the per-thread put throughput chart for an aggregated table.
    ///
    /// The x keys are the table's thread counts and there is one series per
    /// group key, plotted in thousands per second.
    ///
    /// ```
    /// use benchagg_chart::{ChartSpec, ValueScale};
    /// use benchagg_core::{GroupAccumulator, MissingKeyPolicy, Sample};
    ///
    /// let samples = [Sample::new(1, "jemalloc", 2_000_000.0), Sample::new(4, "jemalloc", 6_000_000.0)];
    /// let table = GroupAccumulator::from_samples(&samples)
    ///     .aggregate(MissingKeyPolicy::Error)
    ///     .unwrap();
    ///
    /// let spec = ChartSpec::from_table(&table, "skiplist");
    /// assert_eq!(spec.title, "skiplist puts performance: Average throughput per thread");
    /// assert_eq!(spec.x_keys, ["1", "4"]);
    /// assert_eq!(spec.y_range, (1500.0, 6500.0));
    /// assert_eq!(spec.scale, ValueScale::Thousands);
    /// ```
    pub fn from_table(table: &AggregatedTable, data_structure: &str) -> Self {
        let series = table
            .group_keys()
            .iter()
            .map(|key| Series {
                name: key.clone(),
                values: table
                    .series(key)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|v| v as f64)
                    .collect(),
            })
            .collect();
        let (min, max) = table.value_range().unwrap_or((0, 0));

        Self {
            x_keys: table.thread_labels(),
            series,
            x_label: THREADS_LABEL.to_string(),
            y_label: PUTS_LABEL.to_string(),
            title: format!("{} puts performance: Average throughput per thread", data_structure),
            y_range: padded_range(min as f64, max as f64),
            scale: ValueScale::Thousands,
        }
    }

    /// Check that the spec can be drawn.
    ///
    /// # Errors
    ///
    /// - [`ChartError::EmptySeries`] without x keys or series.
    /// - [`ChartError::LengthMismatch`] if a series length differs from the x keys.
    /// - [`ChartError::InvalidRange`] if the y range is empty or not finite.
    pub fn validate(&self) -> Result<()> {
        if self.x_keys.is_empty() {
            return Err(ChartError::EmptySeries("no x keys".to_string()));
        }
        if self.series.is_empty() {
            return Err(ChartError::EmptySeries("no series".to_string()));
        }
        for series in &self.series {
            if series.values.len() != self.x_keys.len() {
                return Err(ChartError::LengthMismatch {
                    series: series.name.clone(),
                    expected: self.x_keys.len(),
                    actual: series.values.len(),
                });
            }
        }
        let (min, max) = self.y_range;
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ChartError::InvalidRange { min, max });
        }
        Ok(())
    }
}
