//! Serialization of a [`Drawing`] into an SVG 1.1 document.

use crate::error::{Error, Result};
use crate::interpreter::Drawing;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Largest supported coordinate precision.
pub const MAX_PRECISION: u8 = 10;

/// Stroke attributes applied to every `<polyline>`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgStyle {
    pub stroke: String,
    pub stroke_width: f64,
    pub fill: String,
    pub stroke_linecap: String,
    pub stroke_linejoin: String,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            stroke: "#000".to_string(),
            stroke_width: 1.0,
            fill: "none".to_string(),
            stroke_linecap: "round".to_string(),
            stroke_linejoin: "round".to_string(),
        }
    }
}

/// Document-level output options.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvgOptions {
    /// Extra space around the bounds, in drawing units.
    pub margin: f64,
    /// Digits after the decimal point, `0..=10`.
    pub precision: u8,
    /// Wrap the geometry in a group that mirrors the Y axis, so +Y points up.
    pub flip_y: bool,
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Fill colour of a background rect; `None` or `"none"` omits it.
    pub background: Option<String>,
    pub style: SvgStyle,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            margin: 10.0,
            precision: 3,
            flip_y: true,
            width: None,
            height: None,
            background: None,
            style: SvgStyle::default(),
        }
    }
}

impl SvgOptions {
    pub fn validate(&self) -> Result<()> {
        if !self.margin.is_finite() {
            return Err(invalid("svg.margin", "must be a finite number".to_string()));
        }
        if self.precision > MAX_PRECISION {
            return Err(invalid(
                "svg.precision",
                format!("must be between 0 and {MAX_PRECISION}"),
            ));
        }
        if let Some(width) = self.width
            && !(width.is_finite() && width > 0.0)
        {
            return Err(invalid("svg.width", "must be > 0".to_string()));
        }
        if let Some(height) = self.height
            && !(height.is_finite() && height > 0.0)
        {
            return Err(invalid("svg.height", "must be > 0".to_string()));
        }
        if !(self.style.stroke_width.is_finite() && self.style.stroke_width >= 0.0) {
            return Err(invalid("svg.style.stroke_width", "must be >= 0".to_string()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> Error {
    Error::InvalidConfig { field, reason }
}

/// Writes drawings as standalone SVG documents.
pub struct SvgWriter<'a> {
    options: &'a SvgOptions,
    title: Option<&'a str>,
}

impl<'a> SvgWriter<'a> {
    pub fn new(options: &'a SvgOptions) -> Self {
        Self {
            options,
            title: None,
        }
    }

    /// Adds a `<title>` element (builder pattern).
    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    /// Renders `drawing` to a string.
    ///
    /// The viewBox is the drawing's bounds inflated by the margin.
    ///
    /// # Errors
    ///
    /// [`Error::NoDrawableGeometry`] if there are no polylines, and
    /// [`Error::DegenerateBounds`] if the viewBox has zero width or height.
    pub fn write(&self, drawing: &Drawing) -> Result<String> {
        let rect = match drawing.bounds.rect() {
            Some(rect) if !drawing.polylines.is_empty() => rect.inflate(self.options.margin),
            _ => return Err(Error::NoDrawableGeometry),
        };
        let (width, height) = (rect.width(), rect.height());
        if !(width > 0.0 && height > 0.0) {
            return Err(Error::DegenerateBounds { width, height });
        }

        let opts = self.options;
        let num = |v: f64| format_number(v, opts.precision);
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="{} {} {} {}""#,
            num(rect.min.x),
            num(rect.min.y),
            num(width),
            num(height)
        );
        if let Some(w) = opts.width {
            let _ = write!(out, r#" width="{}""#, num(w));
        }
        if let Some(h) = opts.height {
            let _ = write!(out, r#" height="{}""#, num(h));
        }
        out.push_str(">\n");

        if let Some(title) = self.title {
            let _ = writeln!(out, "  <title>{}</title>", escape(title));
        }

        if let Some(background) = opts
            .background
            .as_deref()
            .filter(|b| !b.eq_ignore_ascii_case("none"))
        {
            let _ = writeln!(
                out,
                r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}" />"#,
                num(rect.min.x),
                num(rect.min.y),
                num(width),
                num(height),
                escape(background)
            );
        }

        let style = &opts.style;
        let style_attr = format!(
            r#"stroke="{}" stroke-width="{}" fill="{}" stroke-linecap="{}" stroke-linejoin="{}""#,
            escape(&style.stroke),
            num(style.stroke_width),
            escape(&style.fill),
            escape(&style.stroke_linecap),
            escape(&style.stroke_linejoin)
        );

        let indent = if opts.flip_y {
            // Mirror about y = (min + max) / 2 so the content stays inside the viewBox.
            let _ = writeln!(
                out,
                r#"  <g transform="translate(0,{}) scale(1,-1)">"#,
                num(rect.min.y + rect.max.y)
            );
            "    "
        } else {
            "  "
        };

        for polyline in &drawing.polylines {
            let points = polyline
                .points
                .iter()
                .map(|p| format!("{},{}", num(p.x), num(p.y)))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(out, r#"{indent}<polyline points="{points}" {style_attr} />"#);
        }

        if opts.flip_y {
            out.push_str("  </g>\n");
        }
        out.push_str("</svg>\n");

        tracing::debug!(
            polylines = drawing.polylines.len(),
            bytes = out.len(),
            "svg written"
        );
        Ok(out)
    }
}

/// Fixed-precision formatting with trailing zeros trimmed and `-0` folded to `0`.
pub fn format_number(value: f64, precision: u8) -> String {
    let s = format!("{:.*}", usize::from(precision), value);
    let s = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    };
    match s.as_str() {
        "" | "-0" => "0".to_string(),
        _ => s,
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
