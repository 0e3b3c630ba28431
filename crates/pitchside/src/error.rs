use thiserror::Error;

use pitchside_contracts::ContractError;
use pitchside_models::EligibilityReport;
use pitchside_rules::ContactViolation;
use pitchside_store::StoreError;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The draft failed validation. The report carries every violated rule
    /// so callers can show all problems at once.
    #[error("pitch is not eligible: {}", .0.messages().join("; "))]
    Ineligible(EligibilityReport),

    #[error("message blocked: body contains {0}")]
    MessageBlocked(ContactViolation),

    #[error("operation cancelled")]
    Cancelled,

    #[error("operation timed out")]
    Timeout,
}
