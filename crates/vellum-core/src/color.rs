//! Color handling for Vellum drawings
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, plus [`ColorValue`], the tri-state value a draw.io
//! color attribute can take (explicit color, explicit `none`, or the default
//! sentinel).

use std::{
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::{DynamicColor, Srgb};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_hex().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as "#ff0000",
    /// "rgb(255, 0, 0)" or "red".
    ///
    /// # Examples
    ///
    /// ```
    /// use vellum_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// assert_eq!(red.to_hex(), "#FF0000");
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Creates an opaque color from 8-bit sRGB components.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        let color = color::AlphaColor::<Srgb>::from_rgb8(r, g, b);
        Self {
            color: DynamicColor::from_alpha_color(color),
        }
    }

    /// Creates a new color with the specified alpha value in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha (transparency) component of this color.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// Uppercase `#RRGGBB` representation, as used by presentation formats.
    pub fn to_hex(&self) -> String {
        let rgba = self.color.to_alpha_color::<Srgb>().to_rgba8();
        format!("#{:02X}{:02X}{:02X}", rgba.r, rgba.g, rgba.b)
    }

    /// Parses the draw.io color syntax.
    ///
    /// Accepts `#RGB`, `#RRGGBB`, `rgb(r,g,b)` with components `0..=255`,
    /// `light-dark(a, b)` (the light argument is used), `none`, and the
    /// `default`/`auto` sentinels.
    ///
    /// # Examples
    ///
    /// ```
    /// use vellum_core::color::{Color, ColorValue};
    ///
    /// assert_eq!(Color::parse_drawio("none"), Ok(ColorValue::None));
    /// assert_eq!(Color::parse_drawio("default"), Ok(ColorValue::Default));
    ///
    /// let value = Color::parse_drawio("light-dark(#ff0000, #000000)").unwrap();
    /// assert_eq!(value.color().map(|c| c.to_hex()), Some("#FF0000".to_string()));
    /// ```
    pub fn parse_drawio(raw: &str) -> Result<ColorValue, String> {
        let value = raw.trim();
        let lower = value.to_ascii_lowercase();
        match lower.as_str() {
            "none" => return Ok(ColorValue::None),
            "default" | "auto" | "inherit" => return Ok(ColorValue::Default),
            _ => {}
        }

        if let Some(inner) = strip_call(&lower, "light-dark") {
            let light = split_top_level(inner)
                .into_iter()
                .next()
                .ok_or_else(|| format!("invalid color `{value}`: empty light-dark()"))?;
            return Self::parse_drawio(light);
        }

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex)
                .map(ColorValue::Value)
                .ok_or_else(|| format!("invalid color `{value}`: expected #RGB or #RRGGBB"));
        }

        if let Some(inner) = strip_call(&lower, "rgb") {
            let parts = split_top_level(inner);
            if parts.len() != 3 {
                return Err(format!("invalid color `{value}`: rgb() takes three components"));
            }
            let mut channels = [0u8; 3];
            for (slot, part) in channels.iter_mut().zip(&parts) {
                *slot = part
                    .trim()
                    .parse::<u8>()
                    .map_err(|_| format!("invalid color `{value}`: component `{part}` not in 0..=255"))?;
            }
            return Ok(ColorValue::Value(Self::from_rgb8(
                channels[0],
                channels[1],
                channels[2],
            )));
        }

        Err(format!("invalid color `{value}`"))
    }
}

/// `name(inner)` → `inner`
fn strip_call<'a>(value: &'a str, name: &str) -> Option<&'a str> {
    value
        .strip_prefix(name)?
        .trim_start()
        .strip_prefix('(')?
        .strip_suffix(')')
}

/// Splits on commas that are not nested inside parentheses.
fn split_top_level(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(value[start..idx].trim());
                start = idx + 1;
            }
            _ => {}
        }
    }
    let tail = value[start..].trim();
    if !tail.is_empty() || !parts.is_empty() {
        parts.push(tail);
    }
    parts
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut out = [0u8; 3];
            for (slot, ch) in out.iter_mut().zip(hex.chars()) {
                let digit = channel(&ch.to_string())?;
                *slot = digit * 17;
            }
            Some(Color::from_rgb8(out[0], out[1], out[2]))
        }
        6 => Some(Color::from_rgb8(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::from_rgb8(0, 0, 0)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Color::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// The value of a color attribute after parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColorValue {
    /// Use the family or global default.
    #[default]
    Default,
    /// Explicitly no color (no fill, no stroke).
    None,
    /// An explicit color.
    Value(Color),
}

impl ColorValue {
    /// The explicit color, if any
    pub fn color(self) -> Option<Color> {
        match self {
            ColorValue::Value(color) => Some(color),
            ColorValue::Default | ColorValue::None => None,
        }
    }

    /// Resolves the default sentinel against `fallback`.
    ///
    /// Returns `None` when the attribute explicitly disables the color.
    pub fn resolve(self, fallback: Color) -> Option<Color> {
        match self {
            ColorValue::Default => Some(fallback),
            ColorValue::None => None,
            ColorValue::Value(color) => Some(color),
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, ColorValue::None)
    }
}
