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

//! benchagg CLI library
//!
//! Argument definitions and command implementations behind the `benchagg`
//! binary. Exposed as a library so the commands can be driven from tests.
//!
//! # Commands
//!
//! - `aggregate`: metric-line log to `<stem>_res.csv` and `<stem>_res.svg`
//! - `extract`: four-line block log to a resource-usage CSV
//! - `average`: elementwise mean of repeated runs
//!
//! # Environment
//!
//! - `BENCHAGG_MAX_FILE_SIZE`: maximum input size in bytes (default 1 GiB)
//! - `RUST_LOG`: log filter, for example `benchagg=debug`

pub mod cli;
pub mod commands;
pub mod error;
