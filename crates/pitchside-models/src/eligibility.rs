use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pitch::Currency;
use crate::player::PlayerField;
use crate::team::SubscriptionTier;

/// One reason a draft pitch may not be created. Variants appear in the order
/// the rules are evaluated; the full list is reported, never just the first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IneligibilityReason {
    SubscriptionInactive,
    ContactViolations { warnings: u32 },
    InsufficientVideos { have: u32, need: u32 },
    MonthlyLimitReached { used: u32, quota: u32 },
    NoPlayerSelected,
    MissingPlayerField { field: PlayerField },
    InvalidVideoSelection { selected: usize },
    InternationalNeedsUpgrade { tier: SubscriptionTier },
    CurrencyNotInternational { currency: Currency },
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubscriptionInactive => write!(f, "team subscription is not active"),
            Self::ContactViolations { warnings } => write!(
                f,
                "team is blocked due to contact violations ({warnings} warnings)"
            ),
            Self::InsufficientVideos { have, need } => write!(
                f,
                "team video library has {have} of the {need} required videos"
            ),
            Self::MonthlyLimitReached { used, quota } => {
                write!(f, "monthly pitch limit reached ({used} of {quota} used)")
            }
            Self::NoPlayerSelected => write!(f, "no player selected"),
            Self::MissingPlayerField { field } => {
                write!(f, "player profile is missing: {}", field.label())
            }
            Self::InvalidVideoSelection { selected } => write!(
                f,
                "{selected} videos tagged; a pitch needs between 1 and 6"
            ),
            Self::InternationalNeedsUpgrade { tier } => write!(
                f,
                "international transfers require a premium or enterprise subscription (current tier: {})",
                tier.as_str()
            ),
            Self::CurrencyNotInternational { currency } => write!(
                f,
                "international transfers must use USD, EUR or GBP (got {})",
                currency.code()
            ),
        }
    }
}

/// The decision output of the pitch eligibility rules: a verdict plus every
/// violated rule, so callers can show all problems at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EligibilityReport {
    pub eligible: bool,
    pub reasons: Vec<IneligibilityReason>,
}

impl EligibilityReport {
    pub fn from_reasons(reasons: Vec<IneligibilityReason>) -> Self {
        Self {
            eligible: reasons.is_empty(),
            reasons,
        }
    }

    /// Human-readable form of every violation, in rule order.
    pub fn messages(&self) -> Vec<String> {
        self.reasons.iter().map(|r| r.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligible_iff_no_reasons() {
        let clean = EligibilityReport::from_reasons(vec![]);
        assert!(clean.eligible);
        assert!(clean.messages().is_empty());

        let blocked =
            EligibilityReport::from_reasons(vec![IneligibilityReason::SubscriptionInactive]);
        assert!(!blocked.eligible);
        assert_eq!(blocked.reasons.len(), 1);
    }

    #[test]
    fn reason_display_strings() {
        assert_eq!(
            IneligibilityReason::ContactViolations { warnings: 3 }.to_string(),
            "team is blocked due to contact violations (3 warnings)"
        );
        assert_eq!(
            IneligibilityReason::MissingPlayerField {
                field: PlayerField::DateOfBirth
            }
            .to_string(),
            "player profile is missing: date of birth"
        );
        assert_eq!(
            IneligibilityReason::CurrencyNotInternational {
                currency: Currency::Ngn
            }
            .to_string(),
            "international transfers must use USD, EUR or GBP (got NGN)"
        );
    }

    #[test]
    fn roundtrip_report() {
        let report = EligibilityReport::from_reasons(vec![
            IneligibilityReason::InsufficientVideos { have: 2, need: 5 },
            IneligibilityReason::MonthlyLimitReached { used: 5, quota: 5 },
            IneligibilityReason::InternationalNeedsUpgrade {
                tier: SubscriptionTier::Basic,
            },
        ]);

        let json = serde_json::to_string(&report).unwrap();
        let deserialized: EligibilityReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, deserialized);
    }

    #[test]
    fn reason_serializes_with_code_tag() {
        let json = serde_json::to_string(&IneligibilityReason::NoPlayerSelected).unwrap();
        assert_eq!(json, r#"{"code":"no_player_selected"}"#);

        let json =
            serde_json::to_string(&IneligibilityReason::InvalidVideoSelection { selected: 9 })
                .unwrap();
        assert_eq!(json, r#"{"code":"invalid_video_selection","selected":9}"#);
    }
}
