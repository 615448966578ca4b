//! Style descriptor parser.
//!
//! A draw.io style is a `;`-separated list of `key` or `key=value` tokens.
//! [`parse_style`] splits it with winnow while tracking byte spans, coerces
//! the keys Vellum understands into [`StyleAttributes`] and keeps every other
//! key verbatim in the passthrough map.
//!
//! Parsing is total: a token that fails typed coercion is reported as a
//! warning diagnostic and a fallback is substituted.

use std::str::FromStr;

use log::trace;
use winnow::{
    Parser as _,
    combinator::opt,
    error::ModalResult,
    stream::{LocatingSlice, Location},
    token::take_till,
};

use vellum_core::{
    color::{Color, ColorValue},
    draw::{MarkerKind, parse_dash_pattern},
    style::{
        Direction, EdgeStyle, ElbowAxis, FontStyle, HorizontalAlign, MarkerAttributes,
        PortAttributes, StyleAttributes, StyleDefaults, UnknownVariant, VerticalAlign,
    },
};

use crate::{
    error::{Diagnostic, ErrorCode},
    span::Span,
};

type Input<'a> = LocatingSlice<&'a str>;

/// Keys that read as `true` when written bare (`rounded;dashed;`).
const FLAG_KEYS: &[&str] = &[
    "rounded",
    "dashed",
    "shadow",
    "html",
    "curved",
    "flipH",
    "flipV",
    "horizontal",
    "backgroundOutline",
    "startFill",
    "endFill",
    "exitPerimeter",
    "entryPerimeter",
];

/// Result of [`parse_style`].
#[derive(Debug, Clone, Default)]
pub struct ParsedStyle {
    pub attributes: StyleAttributes,
    /// Warnings for tokens that failed coercion, in source order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a draw.io style string.
///
/// `defaults` supplies the fallback for numeric keys whose value cannot be
/// read (`strokeWidth=abc` falls back to the default stroke width).
///
/// # Examples
///
/// ```
/// # use vellum_core::{color::Color, style::StyleDefaults};
/// # use vellum_parser::parse_style;
/// let parsed = parse_style("fillColor=#FF0000;rounded=1;arcSize=10", &StyleDefaults::default());
/// let attrs = parsed.attributes;
///
/// assert_eq!(attrs.fill.color.color(), Some(Color::from_rgb8(255, 0, 0)));
/// assert!(attrs.is_rounded());
/// assert_eq!(attrs.geometry.arc_size, Some(10.0));
/// assert!(parsed.diagnostics.is_empty());
/// ```
pub fn parse_style(source: &str, defaults: &StyleDefaults) -> ParsedStyle {
    let tokens = join_data_uris(source, tokenize(source));
    let mut parser = StyleParser::new(source, defaults);
    for (index, token) in tokens.iter().enumerate() {
        parser.apply(token, index == 0);
    }
    trace!(
        tokens = tokens.len(),
        passthrough = parser.attrs.passthrough.len(),
        diagnostics = parser.diagnostics.len();
        "Parsed style"
    );
    ParsedStyle {
        attributes: parser.attrs,
        diagnostics: parser.diagnostics,
    }
}

/// A raw `key[=value]` segment with spans into the style string.
#[derive(Debug, Clone, PartialEq)]
struct RawToken<'a> {
    key: &'a str,
    value: Option<&'a str>,
    span: Span,
    value_span: Span,
}

/// One `;`-terminated segment, trimmed. Empty segments yield `None`.
fn segment<'a>(input: &mut Input<'a>) -> ModalResult<Option<RawToken<'a>>> {
    let start = input.current_token_start();
    let text: &str = take_till(0.., ';').parse_next(input)?;
    let _ = opt(';').parse_next(input)?;
    Ok(split_segment(text, start))
}

fn split_segment(text: &str, start: usize) -> Option<RawToken<'_>> {
    let leading = text.len() - text.trim_start().len();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let begin = start + leading;
    let span = Span::new(begin..begin + trimmed.len());

    let Some(eq) = trimmed.find('=') else {
        return Some(RawToken {
            key: trimmed,
            value: None,
            span,
            value_span: Span::new(span.end()..span.end()),
        });
    };

    let raw_value = &trimmed[eq + 1..];
    let value_leading = raw_value.len() - raw_value.trim_start().len();
    let value = raw_value.trim();
    let value_start = begin + eq + 1 + value_leading;
    Some(RawToken {
        key: trimmed[..eq].trim(),
        value: Some(value),
        span,
        value_span: Span::new(value_start..value_start + value.len()),
    })
}

fn tokenize(source: &str) -> Vec<RawToken<'_>> {
    let mut input = LocatingSlice::new(source);
    let mut tokens = Vec::new();
    while !input.is_empty() {
        match segment(&mut input) {
            Ok(Some(token)) => tokens.push(token),
            Ok(None) => {}
            Err(_) => break,
        }
    }
    tokens
}

/// Rejoins `image=data:<mime>` with a following `base64,<payload>` segment,
/// which the `;` split tore apart.
fn join_data_uris<'a>(source: &'a str, tokens: Vec<RawToken<'a>>) -> Vec<RawToken<'a>> {
    let mut joined: Vec<RawToken<'a>> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.key.starts_with("base64,") {
            if let Some(last) = joined.last_mut() {
                if last.key == "image" && last.value.is_some_and(|v| v.starts_with("data:")) {
                    last.span = last.span.union(token.span);
                    last.value_span = last.value_span.union(token.span);
                    last.value = source.get(last.value_span.to_range());
                    continue;
                }
            }
        }
        joined.push(token);
    }
    joined
}

struct StyleParser<'a> {
    source: &'a str,
    defaults: &'a StyleDefaults,
    attrs: StyleAttributes,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> StyleParser<'a> {
    fn new(source: &'a str, defaults: &'a StyleDefaults) -> Self {
        Self {
            source,
            defaults,
            attrs: StyleAttributes::default(),
            diagnostics: Vec::new(),
        }
    }

    fn apply(&mut self, token: &RawToken<'a>, leading: bool) {
        let value = match token.value {
            Some(value) => value,
            None if leading && !is_known_key(token.key) => {
                self.attrs.shape = Some(token.key.to_string());
                return;
            }
            None if !is_known_key(token.key) => {
                self.attrs.passthrough.insert(token.key.to_string(), None);
                return;
            }
            None => "",
        };

        match token.key {
            "shape" => {
                if !value.is_empty() {
                    self.attrs.shape = Some(value.to_string());
                }
            }
            "image" => {
                if !value.is_empty() {
                    self.attrs.image = Some(value.to_string());
                }
            }

            "fillColor" => self.attrs.fill.color = self.color(token, value),
            "gradientColor" => self.attrs.fill.gradient_color = self.color(token, value),
            "swimlaneFillColor" => self.attrs.fill.swimlane_color = self.color(token, value),
            "strokeColor" => self.attrs.stroke.color = self.color(token, value),
            "fontColor" => self.attrs.text.font_color = self.color(token, value),
            "labelBackgroundColor" => self.attrs.text.label_background = self.color(token, value),

            "opacity" => self.attrs.opacity = self.number(token, value, 0.0, 100.0, None),
            "fillOpacity" => self.attrs.fill.opacity = self.number(token, value, 0.0, 100.0, None),
            "strokeOpacity" => self.attrs.stroke.opacity = self.number(token, value, 0.0, 100.0, None),
            "gradientDirection" => self.attrs.fill.gradient_direction = self.variant(token, value),
            "shadow" => self.attrs.fill.shadow = self.boolean(token, value),

            "strokeWidth" => {
                let fallback = Some(self.defaults.stroke_width);
                self.attrs.stroke.width = self.number(token, value, 0.0, f32::INFINITY, fallback);
            }
            "dashed" => self.attrs.stroke.dashed = self.boolean(token, value),
            "dashPattern" => self.attrs.stroke.dash_pattern = self.dash_pattern(token, value),

            "fontSize" => {
                let fallback = Some(self.defaults.font_size);
                self.attrs.text.font_size = self.number(token, value, 1.0, f32::INFINITY, fallback);
            }
            "fontFamily" => {
                if !value.is_empty() {
                    self.attrs.text.font_family = Some(value.to_string());
                }
            }
            "fontStyle" => self.attrs.text.font_style = self.font_style(token, value),
            "align" => self.attrs.text.align = self.variant::<HorizontalAlign>(token, value),
            "verticalAlign" => self.attrs.text.vertical_align = self.variant::<VerticalAlign>(token, value),
            "whiteSpace" => self.attrs.text.wrap = Some(value == "wrap"),
            "html" => self.attrs.text.html = self.boolean(token, value),
            "horizontal" => self.attrs.text.horizontal = self.boolean(token, value),

            "rotation" => self.attrs.geometry.rotation = self.rotation(token, value),
            "flipH" => self.attrs.geometry.flip_h = self.boolean(token, value),
            "flipV" => self.attrs.geometry.flip_v = self.boolean(token, value),
            "direction" => self.attrs.geometry.direction = self.variant::<Direction>(token, value),
            "rounded" => self.attrs.geometry.rounded = self.boolean(token, value),
            "arcSize" => {
                let fallback = Some(self.defaults.arc_size);
                self.attrs.geometry.arc_size = self.number(token, value, 0.0, 50.0, fallback);
            }
            "size" => self.attrs.geometry.size = self.number(token, value, 0.0, f32::INFINITY, None),
            "dx" => self.attrs.geometry.dx = self.number(token, value, 0.0, f32::INFINITY, None),
            "dy" => self.attrs.geometry.dy = self.number(token, value, 0.0, f32::INFINITY, None),
            "starPoints" => self.attrs.geometry.star_points = self.count(token, value),
            "sides" => self.attrs.geometry.sides = self.count(token, value),
            "backgroundOutline" => self.attrs.geometry.background_outline = self.boolean(token, value),
            "perimeterSpacing" => {
                self.attrs.geometry.perimeter_spacing =
                    self.number(token, value, f32::NEG_INFINITY, f32::INFINITY, None)
            }

            "edgeStyle" => self.attrs.connector.edge_style = self.variant::<EdgeStyle>(token, value),
            "curved" => self.attrs.connector.curved = self.boolean(token, value),
            "elbow" => self.attrs.connector.elbow = self.variant::<ElbowAxis>(token, value),

            "startArrow" | "startFill" | "startSize" => {
                let mut marker = std::mem::take(&mut self.attrs.connector.start);
                self.marker(&mut marker, &token.key[5..], token, value);
                self.attrs.connector.start = marker;
            }
            "endArrow" | "endFill" | "endSize" => {
                let mut marker = std::mem::take(&mut self.attrs.connector.end);
                self.marker(&mut marker, &token.key[3..], token, value);
                self.attrs.connector.end = marker;
            }

            key if key.starts_with("exit") && is_port_key(&key[4..]) => {
                let mut port = self.attrs.connector.exit;
                self.port(&mut port, &key[4..], token, value);
                self.attrs.connector.exit = port;
            }
            key if key.starts_with("entry") && is_port_key(&key[5..]) => {
                let mut port = self.attrs.connector.entry;
                self.port(&mut port, &key[5..], token, value);
                self.attrs.connector.entry = port;
            }

            key => {
                let value = token.value.map(str::to_string);
                self.attrs.passthrough.insert(key.to_string(), value);
            }
        }
    }

    fn marker(
        &mut self,
        marker: &mut MarkerAttributes,
        field: &str,
        token: &RawToken<'_>,
        value: &str,
    ) {
        match field {
            "Arrow" => {
                let kind = value.parse::<MarkerKind>().unwrap_or_else(|err| {
                    self.report(
                        ErrorCode::E101,
                        token,
                        err.to_string(),
                        "not a marker",
                        Some("a classic arrow is drawn instead"),
                    );
                    MarkerKind::Classic
                });
                marker.kind = Some(kind);
            }
            "Fill" => marker.fill = self.boolean(token, value),
            _ => {
                let fallback = Some(self.defaults.marker_size);
                marker.size = self.number(token, value, 0.0, f32::INFINITY, fallback);
            }
        }
    }

    fn port(&mut self, port: &mut PortAttributes, field: &str, token: &RawToken<'_>, value: &str) {
        let unbounded = |parser: &mut Self| {
            parser.number(token, value, f32::NEG_INFINITY, f32::INFINITY, None)
        };
        match field {
            "X" => port.x = unbounded(self),
            "Y" => port.y = unbounded(self),
            "Dx" => port.dx = unbounded(self),
            "Dy" => port.dy = unbounded(self),
            _ => port.perimeter = self.boolean(token, value),
        }
    }

    fn color(&mut self, token: &RawToken<'_>, value: &str) -> ColorValue {
        Color::parse_drawio(value).unwrap_or_else(|message| {
            self.report(
                ErrorCode::E002,
                token,
                message,
                "not a color",
                Some("use `#RGB`, `#RRGGBB`, `rgb(r,g,b)`, `light-dark(a,b)` or `none`"),
            );
            ColorValue::Default
        })
    }

    fn boolean(&mut self, token: &RawToken<'_>, value: &str) -> Option<bool> {
        match value {
            "" | "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            _ => {
                self.report(
                    ErrorCode::E005,
                    token,
                    format!("invalid boolean `{value}` for `{}`", token.key),
                    "expected `0` or `1`",
                    None,
                );
                None
            }
        }
    }

    /// Reads a finite number, clamping into `min..=max`.
    fn number(
        &mut self,
        token: &RawToken<'_>,
        value: &str,
        min: f32,
        max: f32,
        fallback: Option<f32>,
    ) -> Option<f32> {
        let Some(number) = value.parse::<f32>().ok().filter(|n| n.is_finite()) else {
            self.report(
                ErrorCode::E003,
                token,
                format!("invalid number `{value}` for `{}`", token.key),
                "not a number",
                None,
            );
            return fallback;
        };
        let clamped = number.clamp(min, max);
        if clamped != number {
            self.report(
                ErrorCode::E004,
                token,
                format!("`{}` value {number} is out of range", token.key),
                format!("clamped to {clamped}"),
                None,
            );
        }
        Some(clamped)
    }

    fn rotation(&mut self, token: &RawToken<'_>, value: &str) -> Option<f32> {
        self.number(token, value, f32::NEG_INFINITY, f32::INFINITY, None)
            .map(|degrees| degrees.rem_euclid(360.0))
    }

    /// `starPoints`/`sides`: a whole number in `3..=32`.
    fn count(&mut self, token: &RawToken<'_>, value: &str) -> Option<u32> {
        self.number(token, value, 3.0, 32.0, None)
            .map(|n| n.round() as u32)
    }

    fn font_style(&mut self, token: &RawToken<'_>, value: &str) -> Option<FontStyle> {
        match value.parse::<u32>() {
            Ok(bits) => Some(FontStyle::from_bits(bits)),
            Err(_) => {
                self.report(
                    ErrorCode::E003,
                    token,
                    format!("invalid font style bits `{value}`"),
                    "expected a non-negative integer",
                    Some("1 bold, 2 italic, 4 underline, 8 strikethrough"),
                );
                None
            }
        }
    }

    fn dash_pattern(&mut self, token: &RawToken<'_>, value: &str) -> Option<Vec<f32>> {
        match parse_dash_pattern(value) {
            Ok(pattern) => Some(pattern),
            Err(message) => {
                self.report(
                    ErrorCode::E003,
                    token,
                    message,
                    "not a dash pattern",
                    Some("write dash lengths separated by spaces, like `8 4`"),
                );
                None
            }
        }
    }

    fn variant<T: FromStr<Err = UnknownVariant>>(
        &mut self,
        token: &RawToken<'_>,
        value: &str,
    ) -> Option<T> {
        match value.parse::<T>() {
            Ok(variant) => Some(variant),
            Err(err) => {
                self.report(ErrorCode::E006, token, err.to_string(), "not recognized", None);
                None
            }
        }
    }

    fn report(
        &mut self,
        code: ErrorCode,
        token: &RawToken<'_>,
        message: impl Into<String>,
        label: impl Into<String>,
        help: Option<&str>,
    ) {
        let span = if token.value_span.is_empty() {
            token.span
        } else {
            token.value_span
        };
        let mut diagnostic = Diagnostic::warning(message)
            .with_code(code)
            .with_label(span, label)
            .with_snippet(self.source);
        if let Some(help) = help {
            diagnostic = diagnostic.with_help(help);
        }
        self.diagnostics.push(diagnostic);
    }
}

fn is_port_key(field: &str) -> bool {
    matches!(field, "X" | "Y" | "Dx" | "Dy" | "Perimeter")
}

fn is_known_key(key: &str) -> bool {
    FLAG_KEYS.contains(&key)
        || matches!(
            key,
            "shape"
                | "image"
                | "fillColor"
                | "gradientColor"
                | "swimlaneFillColor"
                | "strokeColor"
                | "fontColor"
                | "labelBackgroundColor"
                | "opacity"
                | "fillOpacity"
                | "strokeOpacity"
                | "gradientDirection"
                | "strokeWidth"
                | "dashPattern"
                | "fontSize"
                | "fontFamily"
                | "fontStyle"
                | "align"
                | "verticalAlign"
                | "whiteSpace"
                | "rotation"
                | "direction"
                | "arcSize"
                | "size"
                | "dx"
                | "dy"
                | "starPoints"
                | "sides"
                | "perimeterSpacing"
                | "edgeStyle"
                | "elbow"
                | "startArrow"
                | "endArrow"
                | "startSize"
                | "endSize"
        )
        || key
            .strip_prefix("exit")
            .or_else(|| key.strip_prefix("entry"))
            .is_some_and(is_port_key)
}
