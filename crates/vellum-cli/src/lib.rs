//! CLI logic for the Vellum translator.
//!
//! Reads a draw.io input tree, translates it and writes either the JSON
//! render lists or an SVG preview of one page.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, OutputFormat};

use std::{fs, io};

use log::{info, warn};

use vellum::{TranslatedDocument, Translator, VellumError, render::PageRender};

use error_adapter::{DiagnosticAdapter, Reportable};

/// Run the Vellum CLI application
///
/// Translates the input document and writes the selected output. Per-node
/// diagnostics are logged as warnings and do not fail the run.
///
/// # Errors
///
/// Returns `VellumError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Unparsable input documents
/// - Unknown page selections
/// - Export errors
pub fn run(args: &Args) -> Result<(), VellumError> {
    let output = args.output_path();
    info!(
        input_path = args.input,
        output_path = output,
        format:? = args.format;
        "Translating document"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;

    let translator = Translator::new(app_config)?;
    let translated = translator.translate_str(&source)?;
    for diagnostic in &translated.diagnostics {
        let reportable = Reportable::Diagnostic(DiagnosticAdapter::for_warning(diagnostic));
        warn!("{}", error_adapter::render(&reportable));
    }

    match args.format {
        OutputFormat::Json => {
            let json = match &args.page {
                Some(key) => {
                    let page = select_page(&translated, Some(key))?;
                    translator.render_json(&TranslatedDocument {
                        pages: vec![page.clone()],
                        diagnostics: Vec::new(),
                    })?
                }
                None => translator.render_json(&translated)?,
            };
            fs::write(&output, json)?;
        }
        OutputFormat::Svg => {
            let page = select_page(&translated, args.page.as_deref())?;
            translator.export_svg(page, &output)?;
        }
    }

    info!(
        output_file = output,
        pages = translated.pages.len(),
        warnings = translated.diagnostics.len();
        "Output written"
    );

    Ok(())
}

/// Finds a page by id, name or 1-based index; the first page when `key` is unset.
fn select_page<'a>(
    translated: &'a TranslatedDocument,
    key: Option<&str>,
) -> Result<&'a PageRender, VellumError> {
    let page = match key {
        None => translated.pages.first(),
        Some(key) => translated.page(key).or_else(|| {
            key.parse::<usize>()
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| translated.pages.get(index))
        }),
    };
    page.ok_or_else(|| {
        let message = match key {
            Some(key) => format!("page `{key}` not found"),
            None => "document has no pages".to_string(),
        };
        VellumError::Io(io::Error::new(io::ErrorKind::NotFound, message))
    })
}
