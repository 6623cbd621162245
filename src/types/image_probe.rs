use std::fmt;
use std::sync::LazyLock;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::percent_decode_str;
use regex::Regex;

use crate::domain::Validation;
use crate::registry::Validity;

use super::helpers::{format_number, positive};

const RATIO_TOLERANCE: f64 = 0.01;

static URL_SYNTAX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:\S+$").expect("static url pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    fn ratio(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    MalformedDataUri,
    UnsupportedFormat,
    Truncated,
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::MalformedDataUri => write!(f, "data URI could not be decoded"),
            ProbeError::UnsupportedFormat => write!(f, "unrecognised image format"),
            ProbeError::Truncated => write!(f, "image header is truncated"),
        }
    }
}

impl std::error::Error for ProbeError {}

/// Resolves the pixel size of an image source. `Ok(None)` means the size is
/// unknown and dimension checks are skipped.
pub trait ImageProbe: Send + Sync + fmt::Debug {
    fn probe(&self, source: &str) -> Result<Option<ImageDimensions>, ProbeError>;
}

/// Reads dimensions out of inline `data:image/...` URIs. Remote sources are
/// reported as unknown.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriProbe;

impl ImageProbe for DataUriProbe {
    fn probe(&self, source: &str) -> Result<Option<ImageDimensions>, ProbeError> {
        if !is_data_uri(source) {
            return Ok(None);
        }
        let bytes = decode_data_uri(source)?;
        sniff_dimensions(&bytes).map(Some)
    }
}

pub fn is_data_uri(source: &str) -> bool {
    source.starts_with("data:image/")
}

pub fn is_url(source: &str) -> bool {
    URL_SYNTAX.is_match(source)
}

pub fn decode_data_uri(source: &str) -> Result<Vec<u8>, ProbeError> {
    let rest = source
        .strip_prefix("data:")
        .ok_or(ProbeError::MalformedDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(ProbeError::MalformedDataUri)?;
    if header.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        let compact: String = payload.chars().filter(|ch| !ch.is_whitespace()).collect();
        return STANDARD
            .decode(compact.as_bytes())
            .map_err(|_| ProbeError::MalformedDataUri);
    }
    Ok(percent_decode_str(payload).collect())
}

/// Pixel size from a PNG, GIF, JPEG, BMP or WebP header.
pub fn sniff_dimensions(bytes: &[u8]) -> Result<ImageDimensions, ProbeError> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        let width = be_u32(bytes, 16)?;
        let height = be_u32(bytes, 20)?;
        return Ok(ImageDimensions::new(width, height));
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        let width = le_u16(bytes, 6)? as u32;
        let height = le_u16(bytes, 8)? as u32;
        return Ok(ImageDimensions::new(width, height));
    }
    if bytes.starts_with(b"BM") {
        let width = le_i32(bytes, 18)?.unsigned_abs();
        let height = le_i32(bytes, 22)?.unsigned_abs();
        return Ok(ImageDimensions::new(width, height));
    }
    if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        return sniff_webp(bytes);
    }
    if bytes.starts_with(&[0xFF, 0xD8]) {
        return sniff_jpeg(bytes);
    }
    Err(ProbeError::UnsupportedFormat)
}

fn sniff_webp(bytes: &[u8]) -> Result<ImageDimensions, ProbeError> {
    match bytes.get(12..16) {
        Some(b"VP8 ") => {
            let width = (le_u16(bytes, 26)? & 0x3FFF) as u32;
            let height = (le_u16(bytes, 28)? & 0x3FFF) as u32;
            Ok(ImageDimensions::new(width, height))
        }
        Some(b"VP8L") => {
            let bits = bytes.get(21..25).ok_or(ProbeError::Truncated)?;
            let width = 1 + (bits[0] as u32 | ((bits[1] as u32 & 0x3F) << 8));
            let height = 1
                + ((bits[1] as u32 >> 6) | ((bits[2] as u32) << 2) | ((bits[3] as u32 & 0x0F) << 10));
            Ok(ImageDimensions::new(width, height))
        }
        Some(b"VP8X") => {
            let width = 1 + le_u24(bytes, 24)?;
            let height = 1 + le_u24(bytes, 27)?;
            Ok(ImageDimensions::new(width, height))
        }
        Some(_) => Err(ProbeError::UnsupportedFormat),
        None => Err(ProbeError::Truncated),
    }
}

fn sniff_jpeg(bytes: &[u8]) -> Result<ImageDimensions, ProbeError> {
    let mut offset = 2;
    loop {
        while bytes.get(offset) == Some(&0xFF) && bytes.get(offset + 1) == Some(&0xFF) {
            offset += 1;
        }
        if bytes.get(offset) != Some(&0xFF) {
            return Err(ProbeError::Truncated);
        }
        let marker = *bytes.get(offset + 1).ok_or(ProbeError::Truncated)?;
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let height = be_u16(bytes, offset + 5)? as u32;
            let width = be_u16(bytes, offset + 7)? as u32;
            return Ok(ImageDimensions::new(width, height));
        }
        let length = be_u16(bytes, offset + 2)? as usize;
        offset += 2 + length;
    }
}

fn slice<const N: usize>(bytes: &[u8], offset: usize) -> Result<[u8; N], ProbeError> {
    bytes
        .get(offset..offset + N)
        .and_then(|window| window.try_into().ok())
        .ok_or(ProbeError::Truncated)
}

fn be_u16(bytes: &[u8], offset: usize) -> Result<u16, ProbeError> {
    slice::<2>(bytes, offset).map(u16::from_be_bytes)
}

fn be_u32(bytes: &[u8], offset: usize) -> Result<u32, ProbeError> {
    slice::<4>(bytes, offset).map(u32::from_be_bytes)
}

fn le_u16(bytes: &[u8], offset: usize) -> Result<u16, ProbeError> {
    slice::<2>(bytes, offset).map(u16::from_le_bytes)
}

fn le_u24(bytes: &[u8], offset: usize) -> Result<u32, ProbeError> {
    slice::<3>(bytes, offset).map(|[a, b, c]| u32::from_le_bytes([a, b, c, 0]))
}

fn le_i32(bytes: &[u8], offset: usize) -> Result<i32, ProbeError> {
    slice::<4>(bytes, offset).map(i32::from_le_bytes)
}

/// Syntax check run synchronously on every edit.
pub fn check_source(source: &str) -> Validity {
    if is_url(source) || is_data_uri(source) {
        Validity::Valid
    } else {
        Validity::invalid("Invalid image URL or Base64 data")
    }
}

/// Full asynchronous check: source syntax, then the probed dimensions
/// against the advisory constraints.
pub fn check_image(source: &str, validation: &Validation, probe: &dyn ImageProbe) -> Validity {
    if let Validity::Invalid(message) = check_source(source) {
        return Validity::Invalid(message);
    }
    match probe.probe(source) {
        Err(error) => {
            tracing::debug!(%error, "image probe failed");
            Validity::invalid("Failed to load image")
        }
        Ok(None) => Validity::Valid,
        Ok(Some(dimensions)) => check_dimensions(dimensions, validation),
    }
}

pub fn check_dimensions(dimensions: ImageDimensions, validation: &Validation) -> Validity {
    let width = dimensions.width as f64;
    let height = dimensions.height as f64;

    if let Some(min) = positive(validation, "minWidth")
        && width < min
    {
        return Validity::Invalid(format!("Image width must be at least {}px", format_number(min)));
    }
    if let Some(min) = positive(validation, "minHeight")
        && height < min
    {
        return Validity::Invalid(format!("Image height must be at least {}px", format_number(min)));
    }
    if let Some(max) = positive(validation, "maxWidth")
        && width > max
    {
        return Validity::Invalid(format!("Image width must be at most {}px", format_number(max)));
    }
    if let Some(max) = positive(validation, "maxHeight")
        && height > max
    {
        return Validity::Invalid(format!("Image height must be at most {}px", format_number(max)));
    }

    let ratio = dimensions.ratio();
    match validation.get("aspectRatio").and_then(|value| value.as_str()) {
        Some("square") if (ratio - 1.0).abs() > RATIO_TOLERANCE => {
            return Validity::invalid("Image must be square");
        }
        Some("landscape") if ratio <= 1.0 => return Validity::invalid("Image must be landscape"),
        Some("portrait") if ratio >= 1.0 => return Validity::invalid("Image must be portrait"),
        _ => {
            if let Some(expected) = positive(validation, "aspectRatio")
                && (ratio - expected).abs() > RATIO_TOLERANCE
            {
                return Validity::Invalid(format!(
                    "Image must have an aspect ratio of {}",
                    format_number(expected)
                ));
            }
        }
    }
    Validity::Valid
}

#[cfg(test)]
#[path = "../tests/types/image_probe_tests.rs"]
mod tests;
