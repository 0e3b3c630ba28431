use pitchside_models::{Player, PlayerField};

/// The required profile fields `player` has not filled in, reported in
/// declaration order. This is the one implementation behind both roster
/// completeness indicators and pitch eligibility. Whitespace-only strings
/// count as missing.
pub fn missing_fields(player: &Player) -> Vec<PlayerField> {
    PlayerField::ALL
        .into_iter()
        .filter(|field| !field_is_set(player, *field))
        .collect()
}

fn field_is_set(player: &Player, field: PlayerField) -> bool {
    match field {
        PlayerField::FullName => !player.full_name.trim().is_empty(),
        PlayerField::Position => is_filled(&player.position),
        PlayerField::Citizenship => is_filled(&player.citizenship),
        PlayerField::DateOfBirth => player.date_of_birth.is_some(),
        PlayerField::Height => player.height_cm.is_some(),
        PlayerField::Weight => player.weight_kg.is_some(),
        PlayerField::Bio => is_filled(&player.bio),
        PlayerField::MarketValue => player.market_value.is_some(),
    }
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use super::*;

    fn complete_player() -> Player {
        Player {
            id: Uuid::new_v4(),
            team_id: Uuid::new_v4(),
            full_name: "Tunde Adisa".to_string(),
            position: Some("striker".to_string()),
            citizenship: Some("Nigeria".to_string()),
            date_of_birth: Some(NaiveDate::from_ymd_opt(2001, 3, 14).unwrap()),
            height_cm: Some(183),
            weight_kg: Some(76),
            bio: Some("Two-footed forward".to_string()),
            market_value: Some(dec!(1_500_000)),
            photo_path: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn complete_profile_has_no_missing_fields() {
        assert!(missing_fields(&complete_player()).is_empty());
    }

    #[test]
    fn missing_fields_in_declaration_order() {
        let mut player = complete_player();
        player.market_value = None;
        player.position = None;
        player.date_of_birth = None;

        assert_eq!(
            missing_fields(&player),
            vec![
                PlayerField::Position,
                PlayerField::DateOfBirth,
                PlayerField::MarketValue,
            ]
        );
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut player = complete_player();
        player.bio = Some("   ".to_string());
        player.full_name = " ".to_string();

        let missing = missing_fields(&player);
        assert!(missing.contains(&PlayerField::Bio));
        assert!(missing.contains(&PlayerField::FullName));
    }

    #[test]
    fn entirely_blank_profile_misses_everything_but_name() {
        let mut player = complete_player();
        player.position = None;
        player.citizenship = None;
        player.date_of_birth = None;
        player.height_cm = None;
        player.weight_kg = None;
        player.bio = None;
        player.market_value = None;

        assert_eq!(missing_fields(&player).len(), 7);
    }
}
