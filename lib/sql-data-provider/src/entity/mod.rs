pub mod authorisation;
pub mod consent;
pub mod consent_psu;
pub mod consent_usage;
pub mod payment;
pub mod payment_psu;
pub mod secure_data;
