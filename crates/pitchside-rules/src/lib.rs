pub mod charges;
pub mod eligibility;
pub mod profile;
pub mod screening;

pub use charges::{net_to_team, service_charge, SERVICE_CHARGE_PERCENT};
pub use eligibility::{
    evaluate_pitch, INTERNATIONAL_CURRENCIES, MAX_CONTACT_WARNINGS, MAX_TAGGED_VIDEOS,
    MIN_TAGGED_VIDEOS, MIN_TEAM_VIDEOS,
};
pub use profile::missing_fields;
pub use screening::{screen_contact_info, ContactViolation};
