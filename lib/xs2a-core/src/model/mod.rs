pub mod authorisation;
pub mod consent;
pub mod payment;
pub mod psu;
pub mod secure_data;
pub mod tpp;
