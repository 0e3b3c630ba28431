use std::path::Path;

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont};

use crate::error::ContractError;
use crate::layout::TextMeasure;

/// Environment variable consulted when no font path is configured.
pub const FONT_ENV_VAR: &str = "PITCHSIDE_FONT";

/// Regular-weight fonts to try when nothing is configured, in order.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/local/share/fonts/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// A loaded TrueType/OpenType font plus a record of where it came from.
/// Doubles as the layout width measurer.
pub struct ContractFont {
    font: FontVec,
    source: String,
}

impl ContractFont {
    /// Resolve a font: the explicit configured path, then `PITCHSIDE_FONT`,
    /// then a scan of common system locations. Not finding one is an error
    /// the caller can recover from (HTML rendering needs no font).
    pub fn discover(configured: Option<&str>) -> Result<Self, ContractError> {
        if let Some(path) = configured {
            return Self::from_file(path);
        }
        if let Ok(path) = std::env::var(FONT_ENV_VAR) {
            if !path.is_empty() {
                return Self::from_file(&path);
            }
        }
        for candidate in SYSTEM_FONT_CANDIDATES {
            if !Path::new(candidate).is_file() {
                continue;
            }
            match Self::from_file(candidate) {
                Ok(font) => return Ok(font),
                Err(error) => {
                    tracing::warn!(path = %candidate, error = %error, "Skipping unusable system font");
                }
            }
        }
        Err(ContractError::Font(
            "no usable font found; set contracts.font_path or PITCHSIDE_FONT".to_string(),
        ))
    }

    pub fn from_file(path: &str) -> Result<Self, ContractError> {
        if !Path::new(path).is_file() {
            return Err(ContractError::Font(format!("font not found at {path}")));
        }
        let data = std::fs::read(path)?;
        Self::from_vec(data, path)
    }

    pub fn from_vec(data: Vec<u8>, source: &str) -> Result<Self, ContractError> {
        let font = FontVec::try_from_vec(data)
            .map_err(|e| ContractError::Font(format!("invalid font data in {source}: {e}")))?;
        Ok(Self {
            font,
            source: source.to_string(),
        })
    }

    /// Path or label the font was loaded from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn inner(&self) -> &FontVec {
        &self.font
    }
}

impl TextMeasure for ContractFont {
    fn width(&self, text: &str, size: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(size));
        let mut total = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(previous) = prev {
                total += scaled.kern(previous, id);
            }
            total += scaled.h_advance(id);
            prev = Some(id);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_not_a_font() {
        match ContractFont::from_vec(vec![0xDE, 0xAD, 0xBE, 0xEF], "inline") {
            Err(ContractError::Font(message)) => {
                assert!(message.contains("inline"), "message names the source: {message}");
            }
            Err(other) => panic!("expected a font error, got {other}"),
            Ok(_) => panic!("garbage bytes parsed as a font"),
        }
    }

    #[test]
    fn missing_explicit_path_is_a_font_error() {
        match ContractFont::from_file("/nonexistent/pitchside-font.ttf") {
            Err(ContractError::Font(message)) => {
                assert!(message.contains("/nonexistent/pitchside-font.ttf"));
            }
            Err(other) => panic!("expected a font error, got {other}"),
            Ok(_) => panic!("missing file loaded as a font"),
        }
    }
}
