//! End-to-end contract rendering.
//!
//! Document and HTML scenarios run everywhere. Raster scenarios first try
//! to discover a system font and skip with a note when none is installed;
//! point `PITCHSIDE_FONT` at any regular-weight TTF to force them on.

use chrono::NaiveDate;
use pitchside_contracts::{
    package, rasterize, render_contract, ContractDocument, ContractFont, ContractLayout,
};
use pitchside_models::{ContractTerms, Currency, TransferType};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn sample_terms() -> ContractTerms {
    ContractTerms {
        pitch_id: Uuid::new_v4(),
        team_name: "Harbour City FC".to_string(),
        agent_name: "R. Okafor".to_string(),
        player_name: "Tunde Adisa".to_string(),
        transfer_type: TransferType::Permanent,
        fee: dec!(2_000_000),
        currency: Currency::Eur,
        salary: Some(dec!(480_000)),
        bonuses: Some("EUR 50,000 per 10 appearances".to_string()),
        duration_months: Some(36),
        additional_terms: None,
    }
}

fn issue_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 14).unwrap()
}

fn png_dimensions(bytes: &[u8]) -> (u32, u32) {
    assert!(bytes.len() > 24, "PNG too short: {} bytes", bytes.len());
    assert_eq!(
        &bytes[..8],
        &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
        "missing PNG signature"
    );
    let width = u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);
    let height = u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]);
    (width, height)
}

// ============================================================
// Scenario 1: HTML representation needs no font
// Expected: a complete styled page carrying the fee schedule
// ============================================================

#[test]
fn html_renders_without_any_font() {
    let document = ContractDocument::compose(&sample_terms(), issue_date());
    let html = document.to_html();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("PLAYER TRANSFER AGREEMENT"));
    assert!(html.contains("Harbour City FC"));
    assert!(html.contains("€2,000,000.00"), "gross fee missing");
    assert!(html.contains("€300,000.00"), "service charge missing");
    assert!(html.contains("€1,700,000.00"), "net line missing");
}

// ============================================================
// Scenario 2: full PNG pipeline
// Terms: permanent transfer, salary, bonuses, 36-month term
// Expected: one A4 page at 96 dpi, packaged as image/png
// ============================================================

#[test]
fn png_renders_one_a4_page_at_96_dpi() {
    let font = match ContractFont::discover(None) {
        Ok(font) => font,
        Err(error) => {
            eprintln!("Skipping: {error}");
            return;
        }
    };

    let terms = sample_terms();
    let artifact = render_contract(&terms, &font, 794, 1123).expect("contract should render");

    assert_eq!(artifact.content_type, "image/png");
    assert_eq!(artifact.filename, format!("contract-{}.png", terms.pitch_id));
    let (width, height) = png_dimensions(&artifact.bytes);
    assert_eq!((width, height), (794, 1123), "typical terms fit one page");
}

// ============================================================
// Scenario 3: layout against the real font measurer
// Expected: single page, no run escaping the horizontal bounds
// ============================================================

#[test]
fn real_font_layout_stays_inside_the_page() {
    let font = match ContractFont::discover(None) {
        Ok(font) => font,
        Err(error) => {
            eprintln!("Skipping: {error}");
            return;
        }
    };

    let document = ContractDocument::compose(&sample_terms(), issue_date());
    let layout = ContractLayout::compose(&document, &font, 794.0, 1123.0);

    assert_eq!(layout.page_count(), 1);
    for run in &layout.pages[0].runs {
        assert!(run.x >= 0.0, "run off the left edge: {run:?}");
        assert!(run.y <= 1123.0, "run below the page: {run:?}");
        let right = run.x + pitchside_contracts::TextMeasure::width(&font, &run.text, run.size);
        assert!(
            right <= 794.0 + 0.5,
            "run past the right edge ({right:.1}px): {:?}",
            run.text
        );
    }
}

// ============================================================
// Scenario 4: overflowing terms
// Inputs: very long additional-terms text
// Expected: pages stacked vertically on one canvas
// ============================================================

#[test]
fn overflowing_terms_stack_pages_vertically() {
    let font = match ContractFont::discover(None) {
        Ok(font) => font,
        Err(error) => {
            eprintln!("Skipping: {error}");
            return;
        }
    };

    let mut terms = sample_terms();
    terms.additional_terms = Some("indemnification and warranty ".repeat(400));

    let document = ContractDocument::compose(&terms, issue_date());
    let layout = ContractLayout::compose(&document, &font, 794.0, 1123.0);
    assert!(
        layout.page_count() >= 2,
        "expected overflow, got {} page(s)",
        layout.page_count()
    );

    let bytes = rasterize(&layout, &font).expect("multi-page raster");
    let (width, height) = png_dimensions(&bytes);
    assert_eq!(width, 794);
    assert_eq!(height, 1123 * layout.page_count() as u32);
}

// ============================================================
// Scenario 5: packaging is independent of rendering
// ============================================================

#[test]
fn package_is_stable_for_equal_terms() {
    let terms = sample_terms();
    let first = package(&terms, vec![9, 9, 9]);
    let second = package(&terms, vec![9, 9, 9]);
    assert_eq!(first, second);
}
