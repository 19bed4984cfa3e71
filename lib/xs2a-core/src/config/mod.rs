use thiserror::Error;

pub mod core_config;

#[derive(Debug, Error)]
pub enum ConfigParsingError {
    #[error("Config parsing error: {0}")]
    GeneralParsingError(String),
}

#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("No SCA approach configured")]
    MissingScaApproach,
    #[error("Duplicate SCA approach `{0}`")]
    DuplicateScaApproach(String),
    #[error("Invalid value of `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[cfg(test)]
mod test;
