//! Configuration types for Vellum translation.
//!
//! This module provides configuration structures that control global style
//! defaults and how render lists are produced. All types implement
//! [`serde::Deserialize`] for loading from external sources such as a TOML
//! file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style and render settings.
//! - [`StyleConfig`] - Global style defaults used when a node's style leaves a value unset.
//! - [`RenderConfig`] - Image resolution, off-page normalization and label metrics.
//!
//! # Example
//!
//! ```
//! # use vellum::config::AppConfig;
//! let config = AppConfig::default();
//! let defaults = config.style().to_defaults().unwrap();
//! assert_eq!(defaults.stroke_width, 1.0);
//! assert_eq!(config.render().image_dpi(), 192);
//! ```

use serde::Deserialize;

use vellum_core::{color::Color, draw::LabelMetrics, style::StyleDefaults};

/// Top-level configuration combining style and render settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style defaults section.
    #[serde(default)]
    style: StyleConfig,

    /// Render section.
    #[serde(default)]
    render: RenderConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `style` - Global style defaults.
    /// * `render` - Render list options.
    pub fn new(style: StyleConfig, render: RenderConfig) -> Self {
        Self { style, render }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the render configuration.
    pub fn render(&self) -> &RenderConfig {
        &self.render
    }
}

/// Global style defaults.
///
/// Every field is optional; unset fields keep the built-in value of
/// [`StyleDefaults::default`]. Colors are draw.io color strings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    stroke_color: Option<String>,
    fill_color: Option<String>,
    font_color: Option<String>,
    stroke_width: Option<f32>,
    font_size: Option<f32>,
    font_family: Option<String>,
    arc_size: Option<f32>,
    marker_size: Option<f32>,
    /// Background of SVG previews; transparent when unset
    background_color: Option<String>,
}

impl StyleConfig {
    /// Builds the [`StyleDefaults`] threaded through parsing and resolution.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured color cannot be parsed or a
    /// configured size is not a positive number.
    pub fn to_defaults(&self) -> Result<StyleDefaults, String> {
        let mut defaults = StyleDefaults::default();

        if let Some(color) = parse_color("stroke_color", self.stroke_color.as_deref())? {
            defaults.stroke_color = color;
        }
        if let Some(color) = parse_color("fill_color", self.fill_color.as_deref())? {
            defaults.fill_color = color;
        }
        if let Some(color) = parse_color("font_color", self.font_color.as_deref())? {
            defaults.font_color = color;
        }
        if let Some(family) = &self.font_family {
            defaults.font_family = family.clone();
        }
        defaults.stroke_width = positive("stroke_width", self.stroke_width, defaults.stroke_width)?;
        defaults.font_size = positive("font_size", self.font_size, defaults.font_size)?;
        defaults.arc_size = positive("arc_size", self.arc_size, defaults.arc_size)?;
        defaults.marker_size = positive("marker_size", self.marker_size, defaults.marker_size)?;

        Ok(defaults)
    }

    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed
    /// into a valid [`Color`].
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        parse_color("background_color", self.background_color.as_deref())
    }
}

fn parse_color(key: &str, value: Option<&str>) -> Result<Option<Color>, String> {
    value
        .map(Color::new)
        .transpose()
        .map_err(|err| format!("Invalid {key} in config: {err}"))
}

fn positive(key: &str, value: Option<f32>, fallback: f32) -> Result<f32, String> {
    match value {
        None => Ok(fallback),
        Some(value) if value.is_finite() && value > 0.0 => Ok(value),
        Some(value) => Err(format!("Invalid {key} in config: {value} is not a positive number")),
    }
}

fn default_image_dpi() -> u32 {
    192
}

fn default_normalize_offpage() -> bool {
    true
}

fn default_label_char_width() -> f32 {
    0.6
}

fn default_label_line_height() -> f32 {
    1.4
}

/// Options for producing render lists.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Resolution embedded SVG images are rasterized at.
    #[serde(default = "default_image_dpi")]
    image_dpi: u32,

    /// Recenter pages whose content lies completely outside the page.
    #[serde(default = "default_normalize_offpage")]
    normalize_offpage: bool,

    /// Average glyph width as a multiple of the font size.
    #[serde(default = "default_label_char_width")]
    label_char_width: f32,

    /// Line height as a multiple of the font size.
    #[serde(default = "default_label_line_height")]
    label_line_height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_dpi: default_image_dpi(),
            normalize_offpage: default_normalize_offpage(),
            label_char_width: default_label_char_width(),
            label_line_height: default_label_line_height(),
        }
    }
}

impl RenderConfig {
    pub fn image_dpi(&self) -> u32 {
        self.image_dpi
    }

    pub fn normalize_offpage(&self) -> bool {
        self.normalize_offpage
    }

    /// Label size estimator built from the configured factors
    pub fn label_metrics(&self) -> LabelMetrics {
        LabelMetrics::new(self.label_char_width, self.label_line_height)
    }
}
