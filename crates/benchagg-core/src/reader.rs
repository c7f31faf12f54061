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

//! Line reader shared by both log pipelines.
//!
//! Benchmark logs are consumed lazily, one line at a time, so memory use is
//! bounded by the aggregated state rather than the log size.

use crate::error::Result;
use std::io::{BufRead, BufReader, Read};

/// Buffered line reader with line number tracking.
///
/// Strips `\n` and `\r\n` terminators. The sequence is finite and cannot be
/// restarted once consumed.
///
/// # Examples
///
/// ```rust
/// use benchagg_core::LineReader;
/// use std::io::Cursor;
///
/// let mut reader = LineReader::new(Cursor::new("first\r\nsecond\n"));
///
/// assert_eq!(reader.next_line().unwrap(), Some((1, "first".to_string())));
/// assert_eq!(reader.next_line().unwrap(), Some((2, "second".to_string())));
/// assert_eq!(reader.next_line().unwrap(), None);
/// ```
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    buffer: String,
}

impl<R: Read> LineReader<R> {
    /// Create a new line reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
            buffer: String::new(),
        }
    }

    /// Number of lines consumed so far.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line, returning its 1-based number and content.
    pub fn next_line(&mut self) -> Result<Option<(usize, String)>> {
        self.buffer.clear();

        if self.reader.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line_number += 1;

        if self.buffer.ends_with('\n') {
            self.buffer.pop();
            if self.buffer.ends_with('\r') {
                self.buffer.pop();
            }
        }

        Ok(Some((self.line_number, self.buffer.clone())))
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}
