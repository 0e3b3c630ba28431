//! Contract document generation for the pitch marketplace.
//!
//! Agreed [`ContractTerms`] become either a styled HTML page (no font
//! needed) or an A4 PNG rendered at 96 dpi: compose the document model,
//! lay it out against a measuring font, rasterize, and package the bytes
//! as a [`ContractArtifact`] ready for the object store.

pub mod document;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod raster;

pub use document::ContractDocument;
pub use error::ContractError;
pub use fonts::{ContractFont, FONT_ENV_VAR};
pub use layout::{ContractLayout, TextMeasure};
pub use raster::rasterize;

use chrono::Utc;
use pitchside_models::{ContractArtifact, ContractTerms};

/// Compose, lay out and rasterize in one call, issuing the document today.
pub fn render_contract(
    terms: &ContractTerms,
    font: &ContractFont,
    page_width: u32,
    page_height: u32,
) -> Result<ContractArtifact, ContractError> {
    let document = ContractDocument::compose(terms, Utc::now().date_naive());
    let layout =
        ContractLayout::compose(&document, font, page_width as f32, page_height as f32);
    let bytes = raster::rasterize(&layout, font)?;
    Ok(package(terms, bytes))
}

/// Wrap rendered PNG bytes in an artifact with a stable filename.
pub fn package(terms: &ContractTerms, bytes: Vec<u8>) -> ContractArtifact {
    ContractArtifact {
        filename: format!("contract-{}.png", terms.pitch_id),
        content_type: "image/png".to_string(),
        bytes,
    }
}
