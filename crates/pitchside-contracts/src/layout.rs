//! Raster layout for contract documents.
//!
//! Turns a [`ContractDocument`] into positioned text runs, dividers and table
//! row boxes, paginated to a fixed page size. Layout is separated from
//! rendering so it can be tested with a substitute width measurer and no
//! font on disk.

use std::mem;

use crate::document::ContractDocument;

const MARGIN_X: f32 = 60.0;
const MARGIN_TOP: f32 = 64.0;
const MARGIN_BOTTOM: f32 = 72.0;

const TITLE_SIZE: f32 = 24.0;
const SECTION_SIZE: f32 = 13.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 12.0;
const SMALL_SIZE: f32 = 10.5;

const LINE_FACTOR: f32 = 1.45;
const SECTION_GAP: f32 = 18.0;
const FEE_ROW_HEIGHT: f32 = 26.0;
const SIGNATURE_GAP: f32 = 46.0;

/// Measures rendered text width in pixels at a given size. Implemented by
/// the loaded font; tests substitute a fixed-advance measurer.
pub trait TextMeasure {
    fn width(&self, text: &str, size: f32) -> f32;
}

/// Ink selection for a text run. Actual colours are chosen at raster time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextShade {
    Ink,
    Muted,
}

/// A single line of text with its baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub shade: TextShade,
}

/// A horizontal rule.
#[derive(Debug, Clone, PartialEq)]
pub struct Divider {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
    pub width: f32,
}

/// Background box behind a fee table row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub shaded: bool,
}

/// Draw items for one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub runs: Vec<TextRun>,
    pub dividers: Vec<Divider>,
    pub boxes: Vec<RowBox>,
}

/// The paginated layout of a whole contract.
#[derive(Debug, Clone)]
pub struct ContractLayout {
    pub pages: Vec<PageLayout>,
    pub width: f32,
    pub height: f32,
}

/// Cursor-based flow that breaks to a new page when an item would cross
/// the bottom margin.
struct Flow {
    height: f32,
    pages: Vec<PageLayout>,
    current: PageLayout,
    y: f32,
}

impl Flow {
    fn new(height: f32) -> Self {
        Self {
            height,
            pages: Vec::new(),
            current: PageLayout::default(),
            y: MARGIN_TOP,
        }
    }

    fn ensure(&mut self, needed: f32) {
        if self.y + needed > self.height - MARGIN_BOTTOM {
            self.pages.push(mem::take(&mut self.current));
            self.y = MARGIN_TOP;
        }
    }

    /// Reserve one line of `size`, returning the baseline for it.
    fn line(&mut self, size: f32) -> f32 {
        let advance = size * LINE_FACTOR;
        self.ensure(advance);
        let baseline = self.y + size;
        self.y += advance;
        baseline
    }

    fn gap(&mut self, px: f32) {
        self.y += px;
    }

    fn finish(mut self) -> Vec<PageLayout> {
        self.pages.push(self.current);
        self.pages
    }
}

impl ContractLayout {
    /// Lay out a document onto `page_width` x `page_height` pages. Pure:
    /// geometry depends only on the document, the measurer and the page size.
    pub fn compose(
        document: &ContractDocument,
        metrics: &dyn TextMeasure,
        page_width: f32,
        page_height: f32,
    ) -> Self {
        let content_width = page_width - 2.0 * MARGIN_X;
        let right_edge = page_width - MARGIN_X;
        let mut flow = Flow::new(page_height);

        // Title block, centred.
        let title_width = metrics.width(&document.title, TITLE_SIZE);
        let title_x = (MARGIN_X).max((page_width - title_width) / 2.0);
        let baseline = flow.line(TITLE_SIZE);
        flow.current.runs.push(TextRun {
            text: document.title.clone(),
            x: title_x,
            y: baseline,
            size: TITLE_SIZE,
            shade: TextShade::Ink,
        });

        let subtitle = format!(
            "{} · issued {}",
            document.reference,
            document.issued_on.format("%-d %B %Y")
        );
        let subtitle_width = metrics.width(&subtitle, SMALL_SIZE);
        let baseline = flow.line(SMALL_SIZE);
        flow.current.runs.push(TextRun {
            text: subtitle,
            x: (MARGIN_X).max((page_width - subtitle_width) / 2.0),
            y: baseline,
            size: SMALL_SIZE,
            shade: TextShade::Muted,
        });

        flow.gap(10.0);
        flow.current.dividers.push(Divider {
            x1: MARGIN_X,
            x2: right_edge,
            y: flow.y,
            width: 1.8,
        });
        flow.gap(SECTION_GAP);

        // Parties.
        Self::section_heading(&mut flow, "BETWEEN");
        for party in &document.parties {
            let baseline = flow.line(BODY_SIZE);
            flow.current.runs.push(TextRun {
                text: party.role.clone(),
                x: MARGIN_X,
                y: baseline,
                size: BODY_SIZE,
                shade: TextShade::Muted,
            });
            flow.current.runs.push(TextRun {
                text: party.name.clone(),
                x: MARGIN_X + 180.0,
                y: baseline,
                size: BODY_SIZE,
                shade: TextShade::Ink,
            });
        }
        flow.gap(SECTION_GAP);

        // Numbered clauses.
        for (index, clause) in document.clauses.iter().enumerate() {
            let heading = format!("{}. {}", index + 1, clause.heading);
            let baseline = flow.line(HEADING_SIZE);
            flow.current.runs.push(TextRun {
                text: heading,
                x: MARGIN_X,
                y: baseline,
                size: HEADING_SIZE,
                shade: TextShade::Ink,
            });
            for line in wrap_text(&clause.body, BODY_SIZE, content_width, metrics) {
                let baseline = flow.line(BODY_SIZE);
                flow.current.runs.push(TextRun {
                    text: line,
                    x: MARGIN_X,
                    y: baseline,
                    size: BODY_SIZE,
                    shade: TextShade::Ink,
                });
            }
            flow.gap(6.0);
        }
        flow.gap(SECTION_GAP - 6.0);

        // Fee schedule table.
        Self::section_heading(&mut flow, "FEE SCHEDULE");
        for (index, row) in document.fee_rows.iter().enumerate() {
            flow.ensure(FEE_ROW_HEIGHT);
            let top = flow.y;
            flow.current.boxes.push(RowBox {
                x: MARGIN_X,
                y: top,
                w: content_width,
                h: FEE_ROW_HEIGHT,
                shaded: index % 2 == 1,
            });
            flow.current.dividers.push(Divider {
                x1: MARGIN_X,
                x2: right_edge,
                y: top,
                width: if row.emphasis { 1.8 } else { 0.8 },
            });

            let baseline = top + (FEE_ROW_HEIGHT + BODY_SIZE) / 2.0 - 1.0;
            flow.current.runs.push(TextRun {
                text: row.label.clone(),
                x: MARGIN_X + 8.0,
                y: baseline,
                size: BODY_SIZE,
                shade: TextShade::Ink,
            });
            let amount_width = metrics.width(&row.amount, BODY_SIZE);
            flow.current.runs.push(TextRun {
                text: row.amount.clone(),
                x: right_edge - 8.0 - amount_width,
                y: baseline,
                size: BODY_SIZE,
                shade: TextShade::Ink,
            });
            flow.y += FEE_ROW_HEIGHT;
        }

        // Signature slots, side by side.
        let column_width = content_width / document.signatures.len().max(1) as f32;
        flow.ensure(SIGNATURE_GAP + 3.0 * SMALL_SIZE * LINE_FACTOR);
        flow.gap(SIGNATURE_GAP);
        let rule_y = flow.y;
        let mut label_depth: f32 = 0.0;
        for (index, slot) in document.signatures.iter().enumerate() {
            let x0 = MARGIN_X + index as f32 * column_width;
            flow.current.dividers.push(Divider {
                x1: x0,
                x2: x0 + column_width - 24.0,
                y: rule_y,
                width: 1.0,
            });
            let mut line_y = rule_y + 6.0 + SMALL_SIZE;
            for line in wrap_text(slot, SMALL_SIZE, column_width - 24.0, metrics) {
                flow.current.runs.push(TextRun {
                    text: line,
                    x: x0,
                    y: line_y,
                    size: SMALL_SIZE,
                    shade: TextShade::Muted,
                });
                line_y += SMALL_SIZE * LINE_FACTOR;
            }
            label_depth = label_depth.max(line_y - rule_y);
        }
        flow.y = rule_y + label_depth;

        Self {
            pages: flow.finish(),
            width: page_width,
            height: page_height,
        }
    }

    fn section_heading(flow: &mut Flow, text: &str) {
        let baseline = flow.line(SECTION_SIZE);
        flow.current.runs.push(TextRun {
            text: text.to_string(),
            x: MARGIN_X,
            y: baseline,
            size: SECTION_SIZE,
            shade: TextShade::Muted,
        });
        flow.gap(2.0);
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Greedy word wrap. A single word wider than `max_width` gets its own
/// overflowing line rather than being split mid-word.
fn wrap_text(text: &str, size: f32, max_width: f32, metrics: &dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if metrics.width(&candidate, size) <= max_width {
            line = candidate;
        } else {
            lines.push(mem::replace(&mut line, word.to_string()));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pitchside_models::{ContractTerms, Currency, TransferType};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::*;
    use crate::document::ContractDocument;

    /// Half-em advance per character, no kerning. Close enough to a real
    /// proportional font for layout assertions.
    struct FixedMeasure;

    impl TextMeasure for FixedMeasure {
        fn width(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }
    }

    fn sample_document(additional_terms: Option<String>) -> ContractDocument {
        let terms = ContractTerms {
            pitch_id: Uuid::new_v4(),
            team_name: "Harbour City FC".to_string(),
            agent_name: "R. Okafor".to_string(),
            player_name: "Tunde Adisa".to_string(),
            transfer_type: TransferType::Permanent,
            fee: dec!(2_000_000),
            currency: Currency::Eur,
            salary: Some(dec!(480_000)),
            bonuses: None,
            duration_months: Some(36),
            additional_terms,
        };
        ContractDocument::compose(&terms, NaiveDate::from_ymd_opt(2026, 6, 14).unwrap())
    }

    fn compose(document: &ContractDocument) -> ContractLayout {
        ContractLayout::compose(document, &FixedMeasure, 794.0, 1123.0)
    }

    #[test]
    fn typical_contract_fits_one_page() {
        let layout = compose(&sample_document(None));
        assert_eq!(layout.page_count(), 1);
        assert!(!layout.pages[0].runs.is_empty());
        assert_eq!(layout.pages[0].boxes.len(), 3, "one box per fee row");
    }

    #[test]
    fn all_geometry_stays_inside_the_margins() {
        let layout = compose(&sample_document(None));
        for page in &layout.pages {
            for run in &page.runs {
                assert!(run.x >= MARGIN_X - f32::EPSILON, "run left of margin: {run:?}");
                assert!(run.y >= MARGIN_TOP, "run above margin: {run:?}");
                assert!(
                    run.y <= 1123.0 - MARGIN_BOTTOM + SMALL_SIZE,
                    "run below margin: {run:?}"
                );
            }
            for divider in &page.dividers {
                assert!(divider.x1 >= MARGIN_X - f32::EPSILON);
                assert!(divider.x2 <= 794.0 - MARGIN_X + f32::EPSILON);
            }
        }
    }

    #[test]
    fn fee_amounts_share_a_right_edge() {
        let layout = compose(&sample_document(None));
        let measure = FixedMeasure;
        let page = &layout.pages[0];

        let amount_edges: Vec<f32> = page
            .runs
            .iter()
            .filter(|run| run.text.starts_with('€'))
            .map(|run| run.x + measure.width(&run.text, run.size))
            .collect();
        // Fee, service charge and net rows, plus the amounts quoted in
        // clause bodies are excluded by position: table amounts all end at
        // the same x.
        assert!(amount_edges.len() >= 3);
        let right = 794.0 - MARGIN_X - 8.0;
        let table_edges: Vec<f32> = amount_edges
            .iter()
            .copied()
            .filter(|edge| (edge - right).abs() < 0.01)
            .collect();
        assert_eq!(table_edges.len(), 3, "three right-aligned table amounts");
    }

    #[test]
    fn title_is_centred() {
        let document = sample_document(None);
        let layout = compose(&document);
        let measure = FixedMeasure;

        let title = layout.pages[0]
            .runs
            .iter()
            .find(|run| run.text == document.title)
            .expect("title run present");
        let expected = (794.0 - measure.width(&document.title, TITLE_SIZE)) / 2.0;
        assert!((title.x - expected).abs() < 0.01);
    }

    #[test]
    fn long_additional_terms_overflow_to_a_second_page() {
        let tome = "indemnification ".repeat(600);
        let layout = compose(&sample_document(Some(tome)));
        assert!(
            layout.page_count() >= 2,
            "expected overflow, got {} page(s)",
            layout.page_count()
        );
        // Continuation pages restart below the top margin.
        for page in &layout.pages[1..] {
            for run in &page.runs {
                assert!(run.y >= MARGIN_TOP);
            }
        }
    }

    #[test]
    fn wrap_respects_max_width() {
        let measure = FixedMeasure;
        let text = "the quick brown fox jumps over the lazy dog and keeps on running";
        let lines = wrap_text(text, 12.0, 120.0, &measure);

        assert!(lines.len() > 1);
        for line in &lines {
            assert!(
                measure.width(line, 12.0) <= 120.0,
                "line too wide: {line:?}"
            );
        }
        let rejoined = lines.join(" ");
        assert_eq!(rejoined, text, "wrapping must not lose words");
    }

    #[test]
    fn wrap_gives_oversized_words_their_own_line() {
        let measure = FixedMeasure;
        let lines = wrap_text("a pneumonoultramicroscopicsilicovolcanoconiosis b", 12.0, 60.0, &measure);
        assert_eq!(
            lines,
            vec![
                "a".to_string(),
                "pneumonoultramicroscopicsilicovolcanoconiosis".to_string(),
                "b".to_string()
            ]
        );
    }

    #[test]
    fn wrap_of_empty_text_is_empty() {
        assert!(wrap_text("", 12.0, 100.0, &FixedMeasure).is_empty());
        assert!(wrap_text("   ", 12.0, 100.0, &FixedMeasure).is_empty());
    }
}
