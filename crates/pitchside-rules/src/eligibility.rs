use pitchside_models::pitch::{Currency, PitchDraft};
use pitchside_models::team::{SubscriptionStatus, SubscriptionTier};
use pitchside_models::{EligibilityReport, IneligibilityReason, Player, TeamRequirements};

use crate::profile::missing_fields;

pub use pitchside_models::pitch::{MAX_TAGGED_VIDEOS, MIN_TAGGED_VIDEOS};

/// Contact warnings at which a team is blocked from pitching.
pub const MAX_CONTACT_WARNINGS: u32 = 3;

/// Minimum size of a team's video library before it may pitch at all.
pub const MIN_TEAM_VIDEOS: u32 = 5;

/// Currencies accepted on international pitches.
pub const INTERNATIONAL_CURRENCIES: [Currency; 3] = [Currency::Usd, Currency::Eur, Currency::Gbp];

/// Evaluate a draft pitch against the full rule set.
///
/// Pure: no I/O, no clock, no mutation. Rules run in a fixed order and
/// every violated rule is reported rather than stopping at the first, so a
/// caller can surface the complete list of problems at once. The same
/// snapshot, player and draft always produce the same report.
pub fn evaluate_pitch(
    requirements: &TeamRequirements,
    player: Option<&Player>,
    draft: &PitchDraft,
) -> EligibilityReport {
    let mut reasons = Vec::new();

    if requirements.status != SubscriptionStatus::Active {
        reasons.push(IneligibilityReason::SubscriptionInactive);
    }

    if requirements.contact_warnings >= MAX_CONTACT_WARNINGS {
        reasons.push(IneligibilityReason::ContactViolations {
            warnings: requirements.contact_warnings,
        });
    }

    if requirements.video_count < MIN_TEAM_VIDEOS {
        reasons.push(IneligibilityReason::InsufficientVideos {
            have: requirements.video_count,
            need: MIN_TEAM_VIDEOS,
        });
    }

    if requirements.pitches_this_month >= requirements.monthly_pitch_quota {
        reasons.push(IneligibilityReason::MonthlyLimitReached {
            used: requirements.pitches_this_month,
            quota: requirements.monthly_pitch_quota,
        });
    }

    match player {
        None => reasons.push(IneligibilityReason::NoPlayerSelected),
        Some(player) => {
            for field in missing_fields(player) {
                reasons.push(IneligibilityReason::MissingPlayerField { field });
            }
        }
    }

    let selected = draft.tagged_video_ids.len();
    if !(MIN_TAGGED_VIDEOS..=MAX_TAGGED_VIDEOS).contains(&selected) {
        reasons.push(IneligibilityReason::InvalidVideoSelection { selected });
    }

    if draft.international {
        if requirements.tier == SubscriptionTier::Basic {
            reasons.push(IneligibilityReason::InternationalNeedsUpgrade {
                tier: requirements.tier,
            });
        }
        if !INTERNATIONAL_CURRENCIES.contains(&draft.currency) {
            reasons.push(IneligibilityReason::CurrencyNotInternational {
                currency: draft.currency,
            });
        }
    }

    EligibilityReport::from_reasons(reasons)
}
