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

//! SVG line charts of aggregated benchmark throughput.
//!
//! The renderer is a pure function of a [`ChartSpec`]: x keys, named series
//! with one value per key, axis labels, a title and a y range. Values are
//! passed through the spec's [`ValueScale`] before plotting; the throughput
//! charts built by [`ChartSpec::from_table`] plot thousands per second.
//!
//! # Examples
//!
//! ```
//! use benchagg_chart::{ChartSpec, LineChart};
//! use benchagg_core::{aggregate_metric_log, AggregateConfig};
//! use std::io::Cursor;
//!
//! let log = "\
//! metric: put, malloc: jemalloc, threads: 1, avg_throughput: 5000000
//! metric: put, malloc: jemalloc, threads: 4, avg_throughput: 4000000
//! ";
//! let table = aggregate_metric_log(Cursor::new(log), &AggregateConfig::default()).unwrap();
//! let svg = LineChart::default()
//!     .render(&ChartSpec::from_table(&table, "skiplist"))
//!     .unwrap();
//! assert!(svg.contains("skiplist puts performance"));
//! ```

mod error;
mod spec;
mod svg;

pub use error::{ChartError, Result};
pub use spec::{
    padded_range, to_thousands, ChartSpec, Series, ValueScale, PUTS_LABEL, RANGE_PADDING,
    THREADS_LABEL,
};
pub use svg::LineChart;
