use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A pitch may tag at most this many videos.
pub const MAX_TAGGED_VIDEOS: usize = 6;
/// A pitch must tag at least this many videos.
pub const MIN_TAGGED_VIDEOS: usize = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransferType {
    Permanent,
    Loan,
}

impl TransferType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permanent => "permanent",
            Self::Loan => "loan",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "permanent" => Some(Self::Permanent),
            "loan" => Some(Self::Loan),
            _ => None,
        }
    }
}

/// Currencies the marketplace prices in. International pitches are limited
/// to the subset returned by [`Currency::international`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Ngn,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Eur => "EUR",
            Self::Gbp => "GBP",
            Self::Ngn => "NGN",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Eur => "€",
            Self::Gbp => "£",
            Self::Ngn => "₦",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            "GBP" => Some(Self::Gbp),
            "NGN" => Some(Self::Ngn),
            _ => None,
        }
    }

    /// Currencies accepted on pitches flagged as international.
    pub fn international() -> [Currency; 3] {
        [Self::Usd, Self::Eur, Self::Gbp]
    }

    /// Render an amount with symbol, thousands separators and two decimal
    /// places, e.g. `€1,250,000.00`.
    pub fn format_amount(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp(2);
        let negative = rounded.is_sign_negative();
        let text = rounded.abs().to_string();
        let (int_part, frac_part) = match text.split_once('.') {
            Some((int, frac)) => (int.to_string(), format!("{frac:0<2}")),
            None => (text, "00".to_string()),
        };

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if negative { "-" } else { "" };
        format!("{sign}{}{grouped}.{frac_part}", self.symbol())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PitchStatus {
    Active,
    Withdrawn,
    Completed,
}

impl PitchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Withdrawn => "withdrawn",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "withdrawn" => Some(Self::Withdrawn),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

/// A transfer pitch as drafted in the creation flow, not yet persisted.
/// Everything optional is optional because the form may be submitted
/// half-filled; the eligibility rules report what is missing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PitchDraft {
    #[serde(default)]
    pub player_id: Option<Uuid>,
    pub transfer_type: TransferType,
    pub asking_price: Decimal,
    pub currency: Currency,
    /// Offered outside the team's own member association.
    #[serde(default)]
    pub international: bool,
    #[serde(default)]
    pub tagged_video_ids: Vec<Uuid>,
}

/// A persisted transfer listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Pitch {
    pub id: Uuid,
    pub team_id: Uuid,
    pub player_id: Uuid,
    pub transfer_type: TransferType,
    pub asking_price: Decimal,
    pub currency: Currency,
    pub international: bool,
    pub tagged_video_ids: Vec<Uuid>,
    pub status: PitchStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn currency_serialization_uses_codes() {
        assert_eq!(serde_json::to_string(&Currency::Usd).unwrap(), "\"USD\"");
        assert_eq!(serde_json::to_string(&Currency::Ngn).unwrap(), "\"NGN\"");
        let parsed: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(parsed, Currency::Eur);
    }

    #[test]
    fn currency_parse_is_case_insensitive() {
        assert_eq!(Currency::parse("gbp"), Some(Currency::Gbp));
        assert_eq!(Currency::parse("XAF"), None);
    }

    #[test]
    fn international_set_excludes_naira() {
        let allowed = Currency::international();
        assert!(allowed.contains(&Currency::Usd));
        assert!(allowed.contains(&Currency::Eur));
        assert!(allowed.contains(&Currency::Gbp));
        assert!(!allowed.contains(&Currency::Ngn));
    }

    #[test]
    fn format_amount_groups_thousands() {
        assert_eq!(
            Currency::Eur.format_amount(dec!(1250000)),
            "€1,250,000.00"
        );
        assert_eq!(Currency::Usd.format_amount(dec!(950.5)), "$950.50");
        assert_eq!(Currency::Ngn.format_amount(dec!(75)), "₦75.00");
    }

    #[test]
    fn format_amount_rounds_and_signs() {
        assert_eq!(Currency::Gbp.format_amount(dec!(1234.567)), "£1,234.57");
        assert_eq!(Currency::Usd.format_amount(dec!(-4200)), "-$4,200.00");
    }

    #[test]
    fn transfer_type_serialization() {
        assert_eq!(
            serde_json::to_string(&TransferType::Permanent).unwrap(),
            "\"permanent\""
        );
        assert_eq!(serde_json::to_string(&TransferType::Loan).unwrap(), "\"loan\"");
    }

    #[test]
    fn draft_defaults_for_omitted_fields() {
        let json = r#"{
            "transfer_type": "loan",
            "asking_price": "50000",
            "currency": "NGN"
        }"#;
        let draft: PitchDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.player_id, None);
        assert!(!draft.international);
        assert!(draft.tagged_video_ids.is_empty());
        assert_eq!(draft.asking_price, dec!(50000));
    }

    #[test]
    fn roundtrip_pitch() {
        let pitch = Pitch {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            player_id: Uuid::new_v4(),
            transfer_type: TransferType::Permanent,
            asking_price: dec!(300000),
            currency: Currency::Usd,
            international: true,
            tagged_video_ids: vec![Uuid::new_v4(), Uuid::new_v4()],
            status: PitchStatus::Active,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&pitch).unwrap();
        let deserialized: Pitch = serde_json::from_str(&json).unwrap();
        assert_eq!(pitch, deserialized);
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert_eq!(PitchStatus::parse("active"), Some(PitchStatus::Active));
        assert_eq!(PitchStatus::parse("expired"), None);
    }
}
