//! Standalone SVG line charts.
//!
//! A `Chart` is a set of index-aligned line series plus optional markers and
//! horizontal reference lines. X positions are bar indices (trading days),
//! not calendar days. Undefined values split a line into separate segments.

use chrono::NaiveDate;

const WIDTH: f64 = 1400.0;
const HEIGHT: f64 = 800.0;
const PAD_LEFT: f64 = 90.0;
const PAD_RIGHT: f64 = 30.0;
const PAD_TOP: f64 = 60.0;
const PAD_BOTTOM: f64 = 70.0;
const Y_TICKS: usize = 5;
const X_TICKS: usize = 6;

#[derive(Debug, Clone)]
pub struct LineSeries {
    pub label: String,
    pub color: &'static str,
    pub dashed: bool,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    TriangleUp,
    TriangleDown,
}

#[derive(Debug, Clone)]
pub struct Markers {
    pub label: String,
    pub color: &'static str,
    pub shape: MarkerShape,
    /// (bar index, y value)
    pub points: Vec<(usize, f64)>,
}

#[derive(Debug, Clone)]
pub struct ReferenceLine {
    pub label: String,
    pub color: &'static str,
    pub y: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Chart {
    pub title: String,
    pub y_label: String,
    pub dates: Vec<NaiveDate>,
    pub lines: Vec<LineSeries>,
    pub markers: Vec<Markers>,
    pub reference_lines: Vec<ReferenceLine>,
    /// Fixed y bounds; computed from the data when `None`.
    pub y_range: Option<(f64, f64)>,
}

struct Frame {
    n: usize,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn plot_width() -> f64 {
        WIDTH - PAD_LEFT - PAD_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - PAD_TOP - PAD_BOTTOM
    }

    fn x(&self, index: usize) -> f64 {
        if self.n > 1 {
            PAD_LEFT + index as f64 * Self::plot_width() / (self.n - 1) as f64
        } else {
            PAD_LEFT + Self::plot_width() / 2.0
        }
    }

    fn y(&self, value: f64) -> f64 {
        HEIGHT - PAD_BOTTOM - (value - self.y_min) / (self.y_max - self.y_min) * Self::plot_height()
    }
}

impl Chart {
    fn y_bounds(&self) -> Option<(f64, f64)> {
        if let Some(range) = self.y_range {
            return Some(range);
        }

        let values = self
            .lines
            .iter()
            .flat_map(|l| l.values.iter().flatten().copied())
            .chain(self.markers.iter().flat_map(|m| m.points.iter().map(|p| p.1)))
            .chain(self.reference_lines.iter().map(|r| r.y))
            .filter(|v| v.is_finite());

        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if min > max {
            return None;
        }
        if max - min > 0.0 {
            let margin = (max - min) * 0.05;
            Some((min - margin, max + margin))
        } else {
            let margin = if min == 0.0 { 1.0 } else { min.abs() * 0.05 };
            Some((min - margin, max + margin))
        }
    }

    pub fn to_svg(&self) -> String {
        let mut svg = String::new();
        push_line(
            &mut svg,
            &format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
                w = WIDTH,
                h = HEIGHT
            ),
        );
        push_line(&mut svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
        push_line(
            &mut svg,
            &format!(
                r#"<text x="{:.1}" y="32" font-size="20" text-anchor="middle">{}</text>"#,
                WIDTH / 2.0,
                escape(&self.title)
            ),
        );

        let n = self.dates.len();
        let Some((y_min, y_max)) = self.y_bounds().filter(|_| n > 0) else {
            push_line(
                &mut svg,
                &format!(
                    r#"<text x="{:.1}" y="{:.1}" font-size="16" text-anchor="middle">No data available.</text>"#,
                    WIDTH / 2.0,
                    HEIGHT / 2.0
                ),
            );
            svg.push_str("</svg>\n");
            return svg;
        };
        let frame = Frame { n, y_min, y_max };

        self.write_axes(&mut svg, &frame);

        for reference in &self.reference_lines {
            let y = frame.y(reference.y);
            push_line(
                &mut svg,
                &format!(
                    r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1.5" stroke-dasharray="6,4"/>"#,
                    PAD_LEFT,
                    y,
                    WIDTH - PAD_RIGHT,
                    y,
                    reference.color
                ),
            );
        }

        for line in &self.lines {
            for segment in segments(&line.values) {
                let points: Vec<String> = segment
                    .iter()
                    .map(|&(i, v)| format!("{:.1},{:.1}", frame.x(i), frame.y(v)))
                    .collect();
                let dash = if line.dashed {
                    r#" stroke-dasharray="6,4""#
                } else {
                    ""
                };
                push_line(
                    &mut svg,
                    &format!(
                        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="1.5"{}/>"#,
                        points.join(" "),
                        line.color,
                        dash
                    ),
                );
            }
        }

        for markers in &self.markers {
            for &(i, v) in &markers.points {
                push_line(
                    &mut svg,
                    &format!(
                        r#"<polygon points="{}" fill="{}"/>"#,
                        triangle(frame.x(i), frame.y(v), markers.shape),
                        markers.color
                    ),
                );
            }
        }

        self.write_legend(&mut svg);
        svg.push_str("</svg>\n");
        svg
    }

    fn write_axes(&self, svg: &mut String, frame: &Frame) {
        let bottom = HEIGHT - PAD_BOTTOM;
        let right = WIDTH - PAD_RIGHT;
        push_line(
            svg,
            &format!(
                r#"<line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="black"/>"#,
                l = PAD_LEFT,
                t = PAD_TOP,
                b = bottom
            ),
        );
        push_line(
            svg,
            &format!(
                r#"<line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="black"/>"#,
                l = PAD_LEFT,
                b = bottom,
                r = right
            ),
        );

        for tick in 0..=Y_TICKS {
            let value = frame.y_min + (frame.y_max - frame.y_min) * tick as f64 / Y_TICKS as f64;
            let y = frame.y(value);
            push_line(
                svg,
                &format!(
                    r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="end">{:.2}</text>"#,
                    PAD_LEFT - 8.0,
                    y + 4.0,
                    value
                ),
            );
        }

        let step = (frame.n / X_TICKS).max(1);
        for i in (0..frame.n).step_by(step) {
            push_line(
                svg,
                &format!(
                    r#"<text x="{:.1}" y="{:.1}" font-size="12" text-anchor="middle">{}</text>"#,
                    frame.x(i),
                    bottom + 20.0,
                    self.dates[i]
                ),
            );
        }

        push_line(
            svg,
            &format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="14" text-anchor="middle">Date</text>"#,
                PAD_LEFT + Frame::plot_width() / 2.0,
                HEIGHT - 20.0
            ),
        );
        push_line(
            svg,
            &format!(
                r#"<text x="24" y="{y:.1}" font-size="14" text-anchor="middle" transform="rotate(-90 24 {y:.1})">{label}</text>"#,
                y = PAD_TOP + Frame::plot_height() / 2.0,
                label = escape(&self.y_label)
            ),
        );
    }

    fn write_legend(&self, svg: &mut String) {
        let entries: Vec<(&str, &str, bool)> = self
            .lines
            .iter()
            .map(|l| (l.label.as_str(), l.color, l.dashed))
            .chain(self.markers.iter().map(|m| (m.label.as_str(), m.color, false)))
            .chain(self.reference_lines.iter().map(|r| (r.label.as_str(), r.color, true)))
            .collect();

        let x = PAD_LEFT + 12.0;
        for (row, (label, color, dashed)) in entries.iter().enumerate() {
            let y = PAD_TOP + 16.0 + row as f64 * 18.0;
            let dash = if *dashed {
                r#" stroke-dasharray="6,4""#
            } else {
                ""
            };
            push_line(
                svg,
                &format!(
                    r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="2"{}/>"#,
                    x,
                    y - 4.0,
                    x + 24.0,
                    y - 4.0,
                    color,
                    dash
                ),
            );
            push_line(
                svg,
                &format!(
                    r#"<text x="{:.1}" y="{:.1}" font-size="12">{}</text>"#,
                    x + 30.0,
                    y,
                    escape(label)
                ),
            );
        }
    }
}

fn push_line(svg: &mut String, line: &str) {
    svg.push_str(line);
    svg.push('\n');
}

/// Runs of consecutive defined values, with their indices.
fn segments(values: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((i, *v)),
            _ => {
                if !current.is_empty() {
                    out.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn triangle(x: f64, y: f64, shape: MarkerShape) -> String {
    let (tip, base) = match shape {
        MarkerShape::TriangleUp => (y - 8.0, y + 6.0),
        MarkerShape::TriangleDown => (y + 8.0, y - 6.0),
    };
    format!(
        "{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}",
        x,
        tip,
        x - 7.0,
        base,
        x + 7.0,
        base
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
