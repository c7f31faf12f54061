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

//! CSV emission and reading for benchmark aggregation tables.
//!
//! # Features
//!
//! - **Aggregated tables**: `threads,<group>...` header, one row per thread count
//! - **Resource tables**: fixed eight-column header, one row per block
//! - **Averaged tables**: same header as resource tables
//! - **Reading**: resource tables can be read back for multi-run averaging
//!
//! # Examples
//!
//! ```
//! use benchagg_core::{aggregate_metric_log, AggregateConfig};
//! use benchagg_csv::aggregated_to_csv;
//! use std::io::Cursor;
//!
//! let log = "metric: put, malloc: jemalloc, threads: 4, avg_throughput: 2000\n";
//! let table = aggregate_metric_log(Cursor::new(log), &AggregateConfig::default()).unwrap();
//! assert_eq!(aggregated_to_csv(&table).unwrap(), "threads,jemalloc\n4,2000\n");
//! ```
//!
//! Numbers are written with Rust's shortest round-trip formatting, so whole
//! floats appear without a fractional part (`10240`, not `10240.0`).

mod error;
mod from_csv;
mod to_csv;

pub use error::{CsvError, Result};
pub use from_csv::{resource_from_csv, resource_from_csv_reader};
pub use to_csv::{
    aggregated_to_csv, aggregated_to_csv_writer, averaged_to_csv, averaged_to_csv_writer,
    resource_to_csv, resource_to_csv_writer, ToCsvConfig,
};
