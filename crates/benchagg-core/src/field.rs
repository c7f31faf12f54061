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

//! Positional field schema for comma-separated log records.
//!
//! Both log formats carry their values at fixed comma-field positions. A
//! [`FieldSpec`] names one such position, says how the raw value is cut out
//! of the token and how it is converted, and turns every failure (missing
//! field, bad number) into a single [`AggError::Parse`].
//!
//! # Examples
//!
//! ```
//! use benchagg_core::field::{FieldIndex, FieldKind, FieldSpec, ValueShape};
//! use benchagg_core::Location;
//!
//! const THREADS: FieldSpec =
//!     FieldSpec::new("threads", FieldIndex::At(2), ValueShape::Labeled, FieldKind::Int);
//!
//! let tokens: Vec<&str> = "metric: put, malloc: tc, threads: 16".split(',').collect();
//! assert_eq!(THREADS.int(&tokens, Location::Line(1)).unwrap(), 16);
//! ```

use crate::error::{AggError, Location, Result};

/// Position of a field within a split record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldIndex {
    /// Fixed 0-based position.
    At(usize),
    /// The final field, whatever the record length.
    Last,
}

/// How the raw value is cut out of its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// `label: value`, split on the first colon.
    Labeled,
    /// The text after the last space.
    LastWord,
    /// The whole token, trimmed.
    Bare,
}

/// Expected type of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Integer.
    Int,
    /// Finite floating-point number.
    Float,
    /// Floating-point number, or a `%`-suffixed percentage normalized to a fraction.
    Percent,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Int => "integer",
            Self::Float => "number",
            Self::Percent => "number or percentage",
        }
    }
}

/// One field of a positional record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name used in error messages.
    pub name: &'static str,
    /// Position within the record.
    pub index: FieldIndex,
    /// How the value is cut out of the token.
    pub shape: ValueShape,
    /// Expected value type.
    pub kind: FieldKind,
}

impl FieldSpec {
    /// Create a field spec.
    pub const fn new(
        name: &'static str,
        index: FieldIndex,
        shape: ValueShape,
        kind: FieldKind,
    ) -> Self {
        Self {
            name,
            index,
            shape,
            kind,
        }
    }

    /// Locate the raw value of this field in `tokens`.
    ///
    /// The token count is checked before indexing.
    pub fn text<'a>(&self, tokens: &[&'a str], location: Location) -> Result<&'a str> {
        let position = match self.index {
            FieldIndex::At(i) => i,
            FieldIndex::Last => tokens.len().saturating_sub(1),
        };
        let token = tokens.get(position).ok_or_else(|| {
            AggError::parse(
                location,
                self.name,
                format!(
                    "expected at least {} fields, got {}",
                    position + 1,
                    tokens.len()
                ),
            )
        })?;

        Ok(match self.shape {
            ValueShape::Labeled => labeled_value(token),
            ValueShape::LastWord => last_word(token),
            ValueShape::Bare => token.trim(),
        })
    }

    /// Extract this field as an integer.
    pub fn int(&self, tokens: &[&str], location: Location) -> Result<i64> {
        let raw = self.text(tokens, location)?;
        raw.parse::<i64>().map_err(|_| self.invalid(raw, location))
    }

    /// Extract this field as a number, honoring [`FieldKind::Percent`].
    pub fn float(&self, tokens: &[&str], location: Location) -> Result<f64> {
        let raw = self.text(tokens, location)?;
        let parsed = match self.kind {
            FieldKind::Percent => parse_percent(raw),
            _ => parse_float(raw),
        };
        parsed.ok_or_else(|| self.invalid(raw, location))
    }

    fn invalid(&self, raw: &str, location: Location) -> AggError {
        AggError::parse(
            location,
            self.name,
            format!("expected {}, got '{}'", self.kind.describe(), raw),
        )
    }
}

/// Value of a `label: value` token, split on the first colon and trimmed.
///
/// A token without a colon yields the whole token, trimmed.
///
/// ```
/// use benchagg_core::field::labeled_value;
///
/// assert_eq!(labeled_value(" metric: put"), "put");
/// assert_eq!(labeled_value("time: 12:30:01"), "12:30:01");
/// ```
pub fn labeled_value(token: &str) -> &str {
    match token.split_once(':') {
        Some((_, value)) => value.trim(),
        None => token.trim(),
    }
}

/// The text following the last space of a token.
pub fn last_word(token: &str) -> &str {
    token.trim_end().rsplit(' ').next().unwrap_or_default()
}

/// Parse a plain, finite floating-point number.
///
/// `nan` and `inf` are rejected.
///
/// ```
/// use benchagg_core::field::parse_float;
///
/// assert_eq!(parse_float(" 2.5 "), Some(2.5));
/// assert_eq!(parse_float("nan"), None);
/// assert_eq!(parse_float("-inf"), None);
/// ```
pub fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a resource field: `%`-suffixed values become fractions.
///
/// ```
/// use benchagg_core::field::parse_percent;
///
/// assert_eq!(parse_percent("55.5%"), Some(0.555));
/// assert_eq!(parse_percent("1234"), Some(1234.0));
/// assert_eq!(parse_percent("n/a"), None);
/// ```
pub fn parse_percent(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match raw.strip_suffix('%') {
        Some(percent) => parse_float(percent).map(|v| v / 100.0),
        None => parse_float(raw),
    }
}
