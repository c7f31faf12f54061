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

//! Standalone SVG line-chart renderer.
//!
//! ## Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                    title                     │
//! │  y ┌──────────────────────────────┐ ┌──────┐ │
//! │  l │   x──x──x                    │ │legend│ │
//! │  a │          ╲x──x               │ └──────┘ │
//! │  b └──────────────────────────────┘          │
//! │         1    4    8   16  (x label)          │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Markup goes through a [`quick_xml::Writer`], which escapes text content
//! and attribute values.

use crate::error::{ChartError, Result};
use crate::spec::ChartSpec;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Line colors, cycled per series.
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const Y_TICKS: usize = 5;
const MARKER_SIZE: f64 = 4.0;
const SVG_NS: &str = "http://www.w3.org/2000/svg";

type SvgWriter = Writer<Cursor<Vec<u8>>>;
type Attrs<'a> = [(&'a str, String)];

/// Canvas geometry of a line chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineChart {
    /// Image width in pixels.
    pub width: f64,
    /// Image height in pixels.
    pub height: f64,
    /// Space left of the plot area (y labels).
    pub margin_left: f64,
    /// Space right of the plot area (legend).
    pub margin_right: f64,
    /// Space above the plot area (title).
    pub margin_top: f64,
    /// Space below the plot area (x labels).
    pub margin_bottom: f64,
}

impl Default for LineChart {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            margin_left: 80.0,
            margin_right: 170.0,
            margin_top: 50.0,
            margin_bottom: 60.0,
        }
    }
}

impl LineChart {
    fn plot_width(&self) -> f64 {
        self.width - self.margin_left - self.margin_right
    }

    fn plot_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom
    }

    /// X pixel of the `index`-th of `count` evenly spaced categories.
    fn x_at(&self, index: usize, count: usize) -> f64 {
        let step = self.plot_width() / count as f64;
        self.margin_left + step * (index as f64 + 0.5)
    }

    /// Y pixel of a scaled value; values outside the range are clamped to the frame.
    fn y_at(&self, value: f64, (min, max): (f64, f64)) -> f64 {
        let fraction = ((value - min) / (max - min)).clamp(0.0, 1.0);
        self.margin_top + self.plot_height() * (1.0 - fraction)
    }

    /// Render `spec` as SVG text.
    ///
    /// # Errors
    ///
    /// Returns the validation errors of [`ChartSpec::validate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use benchagg_chart::{ChartSpec, LineChart, Series, ValueScale};
    ///
    /// let spec = ChartSpec {
    ///     x_keys: vec!["1".into(), "4".into()],
    ///     series: vec![Series { name: "jemalloc".into(), values: vec![10.0, 20.0] }],
    ///     x_label: "threads".into(),
    ///     y_label: "ops".into(),
    ///     title: "demo".into(),
    ///     y_range: (0.0, 30.0),
    ///     scale: ValueScale::Identity,
    /// };
    /// let svg = LineChart::default().render(&spec).unwrap();
    /// assert!(svg.starts_with("<svg"));
    /// assert!(svg.contains("jemalloc"));
    /// ```
    pub fn render(&self, spec: &ChartSpec) -> Result<String> {
        spec.validate()?;

        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        let view_box = format!("0 0 {} {}", self.width, self.height);
        writer.write_event(Event::Start(element(
            "svg",
            &[
                ("xmlns", SVG_NS.to_string()),
                ("width", self.width.to_string()),
                ("height", self.height.to_string()),
                ("viewBox", view_box),
                ("font-family", "sans-serif".to_string()),
                ("font-size", "12".to_string()),
            ],
        )))?;
        empty(
            &mut writer,
            "rect",
            &[
                ("width", self.width.to_string()),
                ("height", self.height.to_string()),
                ("fill", "white".to_string()),
            ],
        )?;

        self.render_frame(&mut writer, spec)?;
        self.render_series(&mut writer, spec)?;
        self.render_legend(&mut writer, spec)?;

        writer.write_event(Event::End(BytesEnd::new("svg")))?;
        let svg = String::from_utf8(writer.into_inner().into_inner())?;
        debug!(
            series = spec.series.len(),
            points = spec.x_keys.len(),
            bytes = svg.len(),
            "rendered line chart"
        );
        Ok(svg)
    }

    /// Render `spec` and write it to `path`.
    pub fn render_to_file(&self, spec: &ChartSpec, path: &Path) -> Result<()> {
        let svg = self.render(spec)?;
        std::fs::write(path, svg).map_err(|e| ChartError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn render_frame(&self, writer: &mut SvgWriter, spec: &ChartSpec) -> Result<()> {
        let (left, top) = (self.margin_left, self.margin_top);
        let (right, bottom) = (left + self.plot_width(), top + self.plot_height());

        text(
            writer,
            &[
                ("x", (self.width / 2.0).to_string()),
                ("y", (top / 2.0 + 5.0).to_string()),
                ("text-anchor", "middle".to_string()),
                ("font-size", "15".to_string()),
            ],
            &spec.title,
        )?;
        empty(
            writer,
            "rect",
            &[
                ("x", left.to_string()),
                ("y", top.to_string()),
                ("width", self.plot_width().to_string()),
                ("height", self.plot_height().to_string()),
                ("fill", "none".to_string()),
                ("stroke", "black".to_string()),
            ],
        )?;

        let (min, max) = spec.y_range;
        for i in 0..Y_TICKS {
            let value = min + (max - min) * i as f64 / (Y_TICKS - 1) as f64;
            let y = self.y_at(value, spec.y_range);
            empty(
                writer,
                "line",
                &[
                    ("x1", left.to_string()),
                    ("y1", px(y)),
                    ("x2", right.to_string()),
                    ("y2", px(y)),
                    ("stroke", "#e0e0e0".to_string()),
                ],
            )?;
            text(
                writer,
                &[
                    ("x", (left - 6.0).to_string()),
                    ("y", px(y + 4.0)),
                    ("text-anchor", "end".to_string()),
                ],
                &value.round().to_string(),
            )?;
        }

        for (i, key) in spec.x_keys.iter().enumerate() {
            let x = self.x_at(i, spec.x_keys.len());
            empty(
                writer,
                "line",
                &[
                    ("x1", px(x)),
                    ("y1", bottom.to_string()),
                    ("x2", px(x)),
                    ("y2", (bottom + 5.0).to_string()),
                    ("stroke", "black".to_string()),
                ],
            )?;
            text(
                writer,
                &[
                    ("x", px(x)),
                    ("y", (bottom + 18.0).to_string()),
                    ("text-anchor", "middle".to_string()),
                ],
                key,
            )?;
        }

        text(
            writer,
            &[
                ("x", (left + self.plot_width() / 2.0).to_string()),
                ("y", (self.height - 15.0).to_string()),
                ("text-anchor", "middle".to_string()),
            ],
            &spec.x_label,
        )?;
        let y_mid = top + self.plot_height() / 2.0;
        text(
            writer,
            &[
                ("x", "20".to_string()),
                ("y", y_mid.to_string()),
                ("text-anchor", "middle".to_string()),
                ("transform", format!("rotate(-90 20 {y_mid})")),
            ],
            &spec.y_label,
        )
    }

    fn render_series(&self, writer: &mut SvgWriter, spec: &ChartSpec) -> Result<()> {
        let count = spec.x_keys.len();

        for (index, series) in spec.series.iter().enumerate() {
            let color = PALETTE[index % PALETTE.len()];
            let points: Vec<(f64, f64)> = series
                .values
                .iter()
                .enumerate()
                .map(|(i, v)| (self.x_at(i, count), self.y_at(spec.scale.apply(*v), spec.y_range)))
                .collect();

            let line = points
                .iter()
                .map(|(x, y)| format!("{x:.1},{y:.1}"))
                .collect::<Vec<_>>()
                .join(" ");
            empty(
                writer,
                "polyline",
                &[
                    ("points", line),
                    ("fill", "none".to_string()),
                    ("stroke", color.to_string()),
                    ("stroke-width", "1.5".to_string()),
                ],
            )?;

            let m = MARKER_SIZE;
            for (x, y) in &points {
                let cross = format!(
                    "M{:.1},{:.1} L{:.1},{:.1} M{:.1},{:.1} L{:.1},{:.1}",
                    x - m,
                    y - m,
                    x + m,
                    y + m,
                    x - m,
                    y + m,
                    x + m,
                    y - m
                );
                empty(
                    writer,
                    "path",
                    &[
                        ("d", cross),
                        ("stroke", color.to_string()),
                        ("stroke-width", "1.5".to_string()),
                    ],
                )?;
            }
        }
        Ok(())
    }

    fn render_legend(&self, writer: &mut SvgWriter, spec: &ChartSpec) -> Result<()> {
        let x = self.margin_left + self.plot_width() + 15.0;
        let top = self.margin_top;
        let height = 20.0 * spec.series.len() as f64 + 10.0;

        empty(
            writer,
            "rect",
            &[
                ("x", x.to_string()),
                ("y", top.to_string()),
                ("width", (self.margin_right - 25.0).to_string()),
                ("height", height.to_string()),
                ("fill", "white".to_string()),
                ("stroke", "#cccccc".to_string()),
            ],
        )?;
        for (index, series) in spec.series.iter().enumerate() {
            let color = PALETTE[index % PALETTE.len()];
            let y = top + 20.0 * index as f64 + 20.0;
            empty(
                writer,
                "line",
                &[
                    ("x1", (x + 8.0).to_string()),
                    ("y1", y.to_string()),
                    ("x2", (x + 28.0).to_string()),
                    ("y2", y.to_string()),
                    ("stroke", color.to_string()),
                    ("stroke-width", "2".to_string()),
                ],
            )?;
            text(
                writer,
                &[("x", (x + 34.0).to_string()), ("y", (y + 4.0).to_string())],
                &series.name,
            )?;
        }
        Ok(())
    }
}

/// Pixel coordinate with one decimal.
fn px(value: f64) -> String {
    format!("{value:.1}")
}

fn element<'a>(name: &'a str, attrs: &Attrs<'_>) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for (key, value) in attrs {
        elem.push_attribute((*key, value.as_str()));
    }
    elem
}

fn empty(writer: &mut SvgWriter, name: &str, attrs: &Attrs<'_>) -> Result<()> {
    writer.write_event(Event::Empty(element(name, attrs)))?;
    Ok(())
}

/// `<text>` element with escaped content.
fn text(writer: &mut SvgWriter, attrs: &Attrs<'_>, content: &str) -> Result<()> {
    writer.write_event(Event::Start(element("text", attrs)))?;
    writer.write_event(Event::Text(BytesText::new(content)))?;
    writer.write_event(Event::End(BytesEnd::new("text")))?;
    Ok(())
}
