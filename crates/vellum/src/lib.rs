//! Vellum - draw.io diagrams translated into slide drawing models.
//!
//! Style parsing, shape geometry, connector routing and z-order compositing
//! for documents exported from draw.io. Each page becomes an ordered list of
//! render records with absolute geometry, ready to be emitted as native
//! presentation shapes.

pub mod compose;
pub mod config;
pub mod connect;
pub mod export;
pub mod image_cache;
pub mod render;
pub mod resolve;
pub mod route;
pub mod structure;
pub mod translate;

mod error;

pub use vellum_core::{color, document, draw, geometry, identifier, style};
pub use vellum_parser::error::{Diagnostic, ErrorCode, Severity};

pub use error::VellumError;

use std::sync::Arc;

use log::{debug, info, trace, warn};
use rayon::prelude::*;

use vellum_core::{color::Color, document::Document, style::StyleDefaults};
use vellum_parser::{Span, error::ParseError};

use config::AppConfig;
use export::Exporter;
use image_cache::{ImageCache, Rasterizer};
use render::PageRender;
use translate::TranslateContext;

/// The render lists of one document and the diagnostics collected on the way.
#[derive(Debug, Clone)]
pub struct TranslatedDocument {
    pub pages: Vec<PageRender>,
    pub diagnostics: Vec<Diagnostic>,
}

impl TranslatedDocument {
    /// Finds a page by id or name.
    pub fn page(&self, key: &str) -> Option<&PageRender> {
        self.pages
            .iter()
            .find(|page| page.id == key || page.name == key)
    }
}

/// Entry point for translating draw.io documents.
///
/// A translator owns the configuration and the image cache of one run;
/// embedded vector images are rasterized at most once per distinct content
/// and resolution across every document it translates.
///
/// # Examples
///
/// ```rust
/// use vellum::{Translator, config::AppConfig};
///
/// let source = r#"{"pages": [{"nodes": [
///     {"id": "a", "kind": "vertex", "style": "ellipse;",
///      "geometry": {"x": 0, "y": 0, "width": 80, "height": 40}}
/// ]}]}"#;
///
/// let translator = Translator::new(AppConfig::default()).expect("valid config");
/// let translated = translator.translate_str(source).expect("valid document");
///
/// assert_eq!(translated.pages[0].records.len(), 1);
/// assert!(translated.diagnostics.is_empty());
/// ```
#[derive(Debug)]
pub struct Translator {
    config: AppConfig,
    defaults: StyleDefaults,
    background: Option<Color>,
    images: ImageCache,
}

impl Default for Translator {
    fn default() -> Self {
        let config = AppConfig::default();
        let images = ImageCache::new(config.render().image_dpi());
        Self {
            config,
            defaults: StyleDefaults::default(),
            background: None,
            images,
        }
    }
}

impl Translator {
    /// Creates a translator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VellumError::Config`] when a configured default is invalid.
    pub fn new(config: AppConfig) -> Result<Self, VellumError> {
        let defaults = config.style().to_defaults().map_err(VellumError::Config)?;
        let background = config
            .style()
            .background_color()
            .map_err(VellumError::Config)?;
        let images = ImageCache::new(config.render().image_dpi());
        Ok(Self {
            config,
            defaults,
            background,
            images,
        })
    }

    /// Rasterizes embedded SVG images with `rasterizer`.
    ///
    /// Without a rasterizer image records keep the vector bytes.
    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.images = ImageCache::new(self.config.render().image_dpi()).with_rasterizer(rasterizer);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parses a JSON input tree.
    ///
    /// # Errors
    ///
    /// Returns [`VellumError::Document`] with an `E400` diagnostic pointing at
    /// the position where parsing stopped.
    pub fn parse(&self, source: &str) -> Result<Document, VellumError> {
        debug!(bytes = source.len(); "Parsing document");
        serde_json::from_str(source).map_err(|err| {
            let offset = byte_offset(source, err.line(), err.column());
            let end = (offset + 1).min(source.len()).max(offset);
            let diagnostic = Diagnostic::error(format!("unparsable document: {err}"))
                .with_code(ErrorCode::E400)
                .with_label(Span::new(offset..end), "parsing stopped here");
            VellumError::new_document_error(ParseError::from(diagnostic), source)
        })
    }

    /// Translates every page of a parsed document.
    pub fn translate(&self, document: &Document) -> TranslatedDocument {
        info!(pages = document.pages.len(); "Translating document");
        let ctx = TranslateContext {
            defaults: &self.defaults,
            render: self.config.render(),
            images: &self.images,
        };
        let (pages, diagnostics) = translate::translate_pages(document, ctx);

        info!(
            pages = pages.len(),
            diagnostics = diagnostics.len(),
            cached_images = self.images.len();
            "Document translated"
        );
        TranslatedDocument { pages, diagnostics }
    }

    /// Parses and translates one JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`VellumError::Document`] if the source is not a valid input tree.
    pub fn translate_str(&self, source: &str) -> Result<TranslatedDocument, VellumError> {
        let document = self.parse(source)?;
        Ok(self.translate(&document))
    }

    /// Translates independent documents in parallel.
    ///
    /// Results are returned in input order; an unparsable document yields an
    /// error in its own slot and does not affect the others.
    pub fn translate_batch<S>(&self, sources: &[S]) -> Vec<Result<TranslatedDocument, VellumError>>
    where
        S: AsRef<str> + Sync,
    {
        info!(documents = sources.len(); "Translating batch");
        let results: Vec<Result<TranslatedDocument, VellumError>> = sources
            .par_iter()
            .map(|source| self.translate_str(source.as_ref()))
            .collect();

        let failed = results.iter().filter(|result| result.is_err()).count();
        if failed > 0 {
            warn!(failed = failed, documents = sources.len(); "Some documents could not be translated");
        }
        results
    }

    /// Serializes the render lists of a translated document as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`VellumError::Export`] if serialization fails.
    pub fn render_json(&self, translated: &TranslatedDocument) -> Result<String, VellumError> {
        serde_json::to_string_pretty(&translated.pages)
            .map_err(|err| VellumError::Export(Box::new(err)))
    }

    /// Renders one page as an SVG preview string.
    pub fn render_svg(&self, page: &PageRender) -> String {
        trace!(page = page.id; "Rendering SVG preview");
        export::svg::Svg::new("")
            .with_background(self.background)
            .render_page(page)
            .to_string()
    }

    /// Writes one page as an SVG preview file.
    ///
    /// # Errors
    ///
    /// Returns [`VellumError::Export`] if the page cannot be rendered or the
    /// file cannot be written.
    pub fn export_svg(&self, page: &PageRender, path: &str) -> Result<(), VellumError> {
        let mut exporter = export::svg::Svg::new(path).with_background(self.background);
        exporter.export_page(page)?;
        Ok(())
    }
}

/// Byte offset of a 1-based line and column, clamped to the source length.
fn byte_offset(source: &str, line: usize, column: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(source.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_offset() {
        let source = "{\n  \"pages\": x\n}";
        assert_eq!(byte_offset(source, 1, 1), 0);
        assert_eq!(byte_offset(source, 2, 12), 13);
        assert_eq!(byte_offset(source, 9, 9), source.len());
    }

    #[test]
    fn test_parse_error_has_label() {
        let source = "{\"pages\": [\n  {\"nodes\": 5}\n]}";
        let err = Translator::default().parse(source).unwrap_err();

        let VellumError::Document { err, src } = err else {
            panic!("expected a document error");
        };
        assert_eq!(src, source);
        let diagnostic = &err.diagnostics()[0];
        assert_eq!(diagnostic.code(), Some(ErrorCode::E400));
        assert_eq!(diagnostic.labels().len(), 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config: AppConfig =
            serde_json::from_str(r#"{"style": {"background_color": "nope"}}"#).unwrap();
        assert!(matches!(
            Translator::new(config),
            Err(VellumError::Config(_))
        ));
    }

    #[test]
    fn test_render_svg_string() {
        let translator = Translator::default();
        let translated = translator
            .translate_str(
                r#"{"pages": [{"nodes": [{"id": "a", "kind": "vertex",
                    "geometry": {"x": 0, "y": 0, "width": 10, "height": 10}}]}]}"#,
            )
            .unwrap();

        let svg = translator.render_svg(&translated.pages[0]);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("id=\"a\""));
        assert!(translated.page("page-1").is_some());
    }
}
