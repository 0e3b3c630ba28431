use rust_decimal::Decimal;
use serde::Serialize;

use pitchside_models::{Currency, Pitch, TransferType};

/// One page of an in-memory listing.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slice `items` into the requested 1-based page. Page 0 is treated as
    /// page 1; requests past the end return empty items with the totals
    /// intact. Never errors.
    pub fn paginate(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total = items.len();
        let total_pages = total.div_ceil(per_page).max(1);
        let start = (page - 1).saturating_mul(per_page);
        let items = if start >= total {
            Vec::new()
        } else {
            items.into_iter().skip(start).take(per_page).collect()
        };
        Self {
            items,
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Filters applied when browsing active pitches. All unset means everything
/// visible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PitchFilter {
    pub transfer_type: Option<TransferType>,
    pub international: Option<bool>,
    pub currency: Option<Currency>,
    pub max_price: Option<Decimal>,
}

impl PitchFilter {
    pub fn matches(&self, pitch: &Pitch) -> bool {
        if let Some(transfer_type) = self.transfer_type {
            if pitch.transfer_type != transfer_type {
                return false;
            }
        }
        if let Some(international) = self.international {
            if pitch.international != international {
                return false;
            }
        }
        if let Some(currency) = self.currency {
            if pitch.currency != currency {
                return false;
            }
        }
        if let Some(max_price) = self.max_price {
            if pitch.asking_price > max_price {
                return false;
            }
        }
        true
    }
}

/// Sort orders for the pitch listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PitchSort {
    #[default]
    Newest,
    Oldest,
    PriceAscending,
    PriceDescending,
}

impl PitchSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::PriceAscending => "price-asc",
            Self::PriceDescending => "price-desc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            "price-asc" => Some(Self::PriceAscending),
            "price-desc" => Some(Self::PriceDescending),
            _ => None,
        }
    }
}
