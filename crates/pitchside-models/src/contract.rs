use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pitch::{Currency, TransferType};

/// Everything the document generator needs to draft a transfer contract.
/// Fee and salary amounts are decimals in the pitch currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContractTerms {
    pub pitch_id: Uuid,
    pub team_name: String,
    pub agent_name: String,
    pub player_name: String,
    pub transfer_type: TransferType,
    pub fee: Decimal,
    pub currency: Currency,
    #[serde(default)]
    pub salary: Option<Decimal>,
    #[serde(default)]
    pub bonuses: Option<String>,
    #[serde(default)]
    pub duration_months: Option<u32>,
    #[serde(default)]
    pub additional_terms: Option<String>,
}

/// A packaged contract document, ready for object storage or attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractArtifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn roundtrip_terms() {
        let terms = ContractTerms {
            pitch_id: Uuid::new_v4(),
            team_name: "Harbour City FC".to_string(),
            agent_name: "R. Okafor".to_string(),
            player_name: "Tunde Adisa".to_string(),
            transfer_type: TransferType::Permanent,
            fee: dec!(2_500_000),
            currency: Currency::Eur,
            salary: Some(dec!(480_000)),
            bonuses: Some("EUR 50,000 per 10 appearances".to_string()),
            duration_months: Some(36),
            additional_terms: None,
        };

        let json = serde_json::to_string(&terms).unwrap();
        let deserialized: ContractTerms = serde_json::from_str(&json).unwrap();
        assert_eq!(terms, deserialized);
    }

    #[test]
    fn optional_terms_default_empty() {
        let json = format!(
            r#"{{
                "pitch_id": "{}",
                "team_name": "Harbour City FC",
                "agent_name": "R. Okafor",
                "player_name": "Tunde Adisa",
                "transfer_type": "loan",
                "fee": "750000",
                "currency": "GBP"
            }}"#,
            Uuid::new_v4(),
        );

        let terms: ContractTerms = serde_json::from_str(&json).unwrap();
        assert_eq!(terms.transfer_type, TransferType::Loan);
        assert!(terms.salary.is_none());
        assert!(terms.duration_months.is_none());
    }
}
