pub mod banking_adapter;
pub mod secure_data_vault;
