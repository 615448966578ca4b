//! Embedded image decoding and the rasterization cache.
//!
//! Image shapes carry their content as a `data:` URI in the `image` style
//! key. SVG content can be handed to a caller supplied [`Rasterizer`]; the
//! result is memoized by [`ImageCache`] under a SHA-256 digest of the SVG
//! bytes and the target DPI, so each distinct image is rasterized at most
//! once per run even when pages are translated in parallel.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

use base64::Engine as _;
use log::debug;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::render::ImageData;

const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// Errors raised while decoding or rasterizing an embedded image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("not a data URI: {0}")]
    InvalidUri(String),

    #[error("invalid base64 image data: {0}")]
    Base64(String),

    #[error("rasterization failed: {0}")]
    Rasterize(String),
}

/// Converts SVG bytes into raster image bytes.
///
/// Implementations are shared between worker threads.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, svg: &[u8], dpi: u32) -> Result<Vec<u8>, ImageError>;
}

impl<F> Rasterizer for F
where
    F: Fn(&[u8], u32) -> Result<Vec<u8>, ImageError> + Send + Sync,
{
    fn rasterize(&self, svg: &[u8], dpi: u32) -> Result<Vec<u8>, ImageError> {
        self(svg, dpi)
    }
}

/// Content of a decoded `data:` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    pub fn is_svg(&self) -> bool {
        self.media_type == SVG_MEDIA_TYPE
    }
}

/// Decodes a `data:[<media type>][;base64],<data>` URI.
///
/// SVG payloads are often base64 encoded without declaring it, or
/// percent-encoded, or plain markup; all three are recognized. Other media
/// types are decoded as declared.
pub fn decode_data_uri(uri: &str) -> Result<DecodedImage, ImageError> {
    let rest = uri
        .trim()
        .strip_prefix("data:")
        .ok_or_else(|| ImageError::InvalidUri(truncate(uri)))?;
    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| ImageError::InvalidUri(truncate(uri)))?;

    let mut params = header.split(';');
    let media_type = match params.next() {
        Some(media_type) if !media_type.is_empty() => media_type.to_ascii_lowercase(),
        _ => "text/plain".to_string(),
    };
    let declared_base64 = params.any(|param| param.eq_ignore_ascii_case("base64"));

    let bytes = if declared_base64 {
        decode_base64(&percent_decode(data))?
    } else if media_type == SVG_MEDIA_TYPE {
        decode_svg_payload(data)
    } else {
        percent_decode(data).into_bytes()
    };

    Ok(DecodedImage { media_type, bytes })
}

fn decode_svg_payload(data: &str) -> Vec<u8> {
    if data.trim_start().starts_with('<') {
        return data.as_bytes().to_vec();
    }
    if let Some(svg) = base64_svg(data) {
        return svg;
    }
    let unescaped = percent_decode(data);
    base64_svg(&unescaped).unwrap_or_else(|| unescaped.into_bytes())
}

/// Decodes `data` as base64 when the result looks like SVG markup.
fn base64_svg(data: &str) -> Option<Vec<u8>> {
    if !looks_like_base64(data) {
        return None;
    }
    let bytes = decode_base64(data).ok()?;
    let head = &bytes[..bytes.len().min(1000)];
    let is_markup = contains(head, b"<svg") || contains(head, b"<?xml");
    is_markup.then_some(bytes)
}

fn looks_like_base64(data: &str) -> bool {
    let head: String = data.chars().filter(|c| !c.is_whitespace()).take(64).collect();
    !head.is_empty()
        && head
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '='))
}

fn decode_base64(data: &str) -> Result<Vec<u8>, ImageError> {
    let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|err| ImageError::Base64(err.to_string()))
}

/// Replaces `%XX` escapes; malformed escapes are kept literally.
fn percent_decode(data: &str) -> String {
    let bytes = data.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut idx = 0;
    while idx < bytes.len() {
        if bytes[idx] == b'%' && idx + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[idx + 1..idx + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(value);
                idx += 3;
                continue;
            }
        }
        out.push(bytes[idx]);
        idx += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|window| window == needle)
}

fn truncate(uri: &str) -> String {
    uri.chars().take(32).collect()
}

type CacheKey = [u8; 32];
type Slot = Arc<OnceLock<Result<Arc<Vec<u8>>, ImageError>>>;

/// Content-addressed memo of rasterized SVG images.
pub struct ImageCache {
    rasterizer: Option<Arc<dyn Rasterizer>>,
    dpi: u32,
    slots: Mutex<HashMap<CacheKey, Slot>>,
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("rasterizer", &self.rasterizer.is_some())
            .field("dpi", &self.dpi)
            .field("entries", &self.len())
            .finish()
    }
}

impl ImageCache {
    /// Creates a cache without a rasterizer; SVG images keep their vector bytes.
    pub fn new(dpi: u32) -> Self {
        Self {
            rasterizer: None,
            dpi,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.rasterizer = Some(rasterizer);
        self
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Number of distinct images seen
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decodes an image URI and rasterizes SVG content when a rasterizer is set.
    pub fn load(&self, uri: &str) -> Result<ImageData, ImageError> {
        let decoded = decode_data_uri(uri)?;
        let Some(rasterizer) = self.rasterizer.as_ref().filter(|_| decoded.is_svg()) else {
            return Ok(ImageData {
                media_type: decoded.media_type,
                rasterized: false,
                bytes: Arc::new(decoded.bytes),
            });
        };

        let bytes = self.rasterize(rasterizer.as_ref(), &decoded.bytes)?;
        Ok(ImageData {
            media_type: "image/png".to_string(),
            rasterized: true,
            bytes,
        })
    }

    /// Runs the rasterizer inside the key's `OnceLock` initializer. Callers
    /// for the same key block until the first finishes; the map lock is
    /// released before that, so distinct keys rasterize in parallel.
    fn rasterize(
        &self,
        rasterizer: &dyn Rasterizer,
        svg: &[u8],
    ) -> Result<Arc<Vec<u8>>, ImageError> {
        let key = cache_key(svg, self.dpi);
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key).or_default())
        };

        slot.get_or_init(|| {
            debug!(bytes = svg.len(), dpi = self.dpi; "Rasterizing embedded SVG");
            rasterizer.rasterize(svg, self.dpi).map(Arc::new)
        })
        .clone()
    }
}

fn cache_key(bytes: &[u8], dpi: u32) -> CacheKey {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.update(dpi.to_le_bytes());
    let digest = hasher.finalize();

    let mut key = [0u8; 32];
    key.copy_from_slice(&digest);
    key
}
