//! Text runs and label size estimation.
//!
//! Node labels arrive either as plain strings (optionally carrying draw.io
//! HTML markup when the style sets `html=1`) or as pre-split runs. Both end
//! up as a [`TextBlock`]: a list of [`TextRun`] values plus the block
//! alignment resolved from the style.
//!
//! Font metrics are out of scope; [`LabelMetrics`] estimates a label box from
//! character counts with fixed width and line-height factors.
//!
//! ```
//! # use vellum_core::draw::LabelMetrics;
//! let size = LabelMetrics::default().estimate("Hello", 10.0);
//! assert_eq!(size.height(), 14.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    geometry::Size,
    style::{HorizontalAlign, StyleAttributes, StyleDefaults, VerticalAlign},
};

/// One uniformly formatted piece of text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Resolved label content of one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub runs: Vec<TextRun>,
    pub align: HorizontalAlign,
    pub vertical_align: VerticalAlign,
    /// `false` when the label is rotated to run vertically
    pub horizontal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<Color>,
}

impl TextBlock {
    /// Resolves runs against the node style.
    ///
    /// Style-level font attributes fill in whatever a run leaves unset;
    /// `fontStyle` bits are OR-ed into every run. Runs with empty text are
    /// dropped and `None` is returned when nothing remains.
    pub fn resolve(
        runs: Vec<TextRun>,
        attrs: &StyleAttributes,
        defaults: &StyleDefaults,
    ) -> Option<Self> {
        let font_style = attrs.text.font_style.unwrap_or_default();
        let font_size = attrs.font_size(defaults);
        let font_family = attrs.font_family(defaults).to_string();
        let color = attrs.text.font_color.resolve(defaults.font_color);

        let runs: Vec<TextRun> = runs
            .into_iter()
            .filter(|run| !run.text.is_empty())
            .map(|run| TextRun {
                bold: run.bold || font_style.bold,
                italic: run.italic || font_style.italic,
                underline: run.underline || font_style.underline,
                font_size: run.font_size.or(Some(font_size)),
                color: run.color.or(color),
                font_family: run.font_family.or_else(|| Some(font_family.clone())),
                text: run.text,
            })
            .collect();
        if runs.iter().all(|run| run.text.trim().is_empty()) {
            return None;
        }

        Some(Self {
            runs,
            align: attrs.text.align.unwrap_or_default(),
            vertical_align: attrs.text.vertical_align.unwrap_or_default(),
            horizontal: attrs.text.horizontal.unwrap_or(true),
            background: attrs.text.label_background.color(),
        })
    }

    /// Concatenated run text
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    /// Largest font size across runs
    pub fn max_font_size(&self) -> Option<f32> {
        self.runs
            .iter()
            .filter_map(|run| run.font_size)
            .fold(None, |acc, size| Some(acc.map_or(size, |a: f32| a.max(size))))
    }
}

/// Converts a plain label into runs, stripping draw.io HTML when `html` is set.
pub fn runs_from_label(text: &str, html: bool) -> Vec<TextRun> {
    let text = if html {
        strip_html(text)
    } else {
        text.to_string()
    };
    if text.is_empty() {
        Vec::new()
    } else {
        vec![TextRun::plain(text)]
    }
}

/// Removes markup from an HTML label.
///
/// Line breaks (`<br>`) and block closers (`</div>`, `</p>`) become newlines;
/// all other tags are dropped and the common entities are decoded.
pub fn strip_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open..];
        let Some(close) = after.find('>') else {
            out.push_str(after);
            rest = "";
            break;
        };
        let tag = after[1..close].trim().to_ascii_lowercase();
        let name = tag
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace() || c == '/')
            .next()
            .unwrap_or("");
        let is_break = name == "br" || (tag.starts_with('/') && matches!(name, "div" | "p"));
        if is_break && !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        } else if name == "br" {
            out.push('\n');
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);

    decode_entities(out.trim_end_matches('\n'))
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Character-count based label size estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    /// Average glyph width as a multiple of the font size
    pub char_width: f32,
    /// Line height as a multiple of the font size
    pub line_height: f32,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            char_width: 0.6,
            line_height: 1.4,
        }
    }
}

impl LabelMetrics {
    pub fn new(char_width: f32, line_height: f32) -> Self {
        Self {
            char_width,
            line_height,
        }
    }

    /// Estimated box of `text` at `font_size`; empty text gets a 10×10 box.
    pub fn estimate(&self, text: &str, font_size: f32) -> Size {
        if text.trim().is_empty() {
            return Size::new(10.0, 10.0);
        }
        let font_size = if font_size > 0.0 { font_size } else { 12.0 };
        let lines: Vec<&str> = text.lines().collect();
        let longest = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f32;
        let glyph = self.char_width * font_size;

        let width = (longest * glyph + glyph).max(1.5 * font_size);
        let height = (lines.len().max(1) as f32 * self.line_height * font_size).max(1.2 * font_size);
        Size::new(width, height)
    }
}
