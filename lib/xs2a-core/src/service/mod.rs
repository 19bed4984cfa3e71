pub mod authorisation;
pub(crate) mod common_validator;
pub mod consent;
pub mod error;
pub mod payment;

#[cfg(test)]
pub(crate) mod test_utilities;
