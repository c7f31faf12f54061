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

//! Parsing and aggregation of multi-threaded allocator benchmark logs.
//!
//! The benchmark harness runs each data structure at several thread counts
//! against several memory allocators and prints its results as text. This
//! crate turns that text into tables keyed by thread count.
//!
//! # Pipelines
//!
//! - **Metric lines** ([`aggregate_metric_log`]): `metric: put, malloc: ...,
//!   threads: ..., ..., avg_throughput: ...` records are grouped by
//!   (thread count, allocator) and averaged into an [`AggregatedTable`].
//! - **Fixed blocks** ([`parse_blocks`]): four-line blocks carrying thread
//!   count, throughput and resource usage become a [`ResourceTable`].
//! - **Repeated runs** ([`average_tables`]): several resource tables of the
//!   same shape are averaged elementwise.
//!
//! # Examples
//!
//! ```
//! use benchagg_core::{aggregate_metric_log, AggregateConfig};
//! use std::io::Cursor;
//!
//! let log = "\
//! metric: put, malloc: jemalloc, threads: 4, avg_throughput: 1000
//! metric: put, malloc: jemalloc, threads: 4, avg_throughput: 2000
//! metric: put, malloc: jemalloc, threads: 4, avg_throughput: 3000
//! ";
//! let table = aggregate_metric_log(Cursor::new(log), &AggregateConfig::default()).unwrap();
//! assert_eq!(table.series("jemalloc"), Some(vec![2000]));
//! ```
//!
//! # Errors
//!
//! All failures are reported as [`AggError`] and are fatal for the run:
//! [`AggError::DataFormat`] when nothing qualifies, [`AggError::Parse`] for a
//! malformed field and [`AggError::MissingKey`] when a thread count lacks
//! samples for one of the allocators.

mod aggregate;
mod average;
mod block;
mod error;
pub mod field;
mod metric;
mod reader;

pub use aggregate::{
    aggregate_metric_log, mean, round_to_i64, AggregateConfig, AggregatedRow, AggregatedTable,
    GroupAccumulator, GroupBucket, MissingKeyPolicy, THREADS_COLUMN,
};
pub use average::{average_tables, AveragedRow, AveragedTable, DEFAULT_RUNS, RESOURCE_COLUMNS};
pub use block::{
    parse_block, parse_blocks, BlockConfig, ResourceTable, ResourceUsageRow, LINES_PER_BLOCK,
    RESOURCE_FIELDS, RESOURCE_HEADER,
};
pub use error::{AggError, Location, Result};
pub use metric::{
    parse_metric_line, read_samples, MetricFilter, Sample, DEFAULT_METRIC_PREFIX, METRIC_MARKER,
};
pub use reader::LineReader;
