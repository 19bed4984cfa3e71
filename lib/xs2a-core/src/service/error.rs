use shared_types::{AuthorisationId, ConsentId, PaymentId};
use thiserror::Error;

use crate::config::ConfigValidationError;
use crate::error::{ErrorCode, ErrorCodeMixin, ErrorKind};
use crate::model::authorisation::{AuthorisationKind, ScaApproach, ScaStatus};
use crate::model::consent::ConsentStatus;
use crate::model::payment::TransactionStatus;
use crate::provider::banking_adapter::error::BankingAdapterError;
use crate::repository::error::DataLayerError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Mapping error: `{0}`")]
    MappingError(String),

    #[error(transparent)]
    EntityNotFound(#[from] EntityNotFoundError),
    #[error(transparent)]
    Expired(#[from] ExpiredError),
    #[error(transparent)]
    BusinessLogic(#[from] BusinessLogicError),
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("SCA of authorisation `{authorisation_id}` failed: {source}")]
    ScaFailed {
        authorisation_id: AuthorisationId,
        source: BankingAdapterError,
    },

    #[error("Config validation error `{0}`")]
    Config(#[from] ConfigValidationError),
    #[error(transparent)]
    Repository(DataLayerError),
}

#[derive(Debug, Error)]
pub enum EntityNotFoundError {
    #[error("Consent `{0}` not found")]
    Consent(ConsentId),
    #[error("Payment `{0}` not found")]
    Payment(PaymentId),
    #[error("Authorisation `{0}` not found")]
    Authorisation(AuthorisationId),
}

#[derive(Debug, Error)]
pub enum ExpiredError {
    #[error("Authorisation `{0}` expired")]
    Authorisation(AuthorisationId),
    #[error("Redirect URL of authorisation `{authorisation_id}` expired")]
    Redirect {
        authorisation_id: AuthorisationId,
        nok_redirect_uri: Option<String>,
    },
    #[error("Consent `{0}` expired")]
    Consent(ConsentId),
}

#[derive(Debug, Error)]
pub enum BusinessLogicError {
    #[error("Authorisation `{authorisation_id}` already finalised with status {status}")]
    AuthorisationFinalised {
        authorisation_id: AuthorisationId,
        status: ScaStatus,
    },
    #[error("Stage `{stage}` not allowed in SCA status {status}")]
    InvalidScaStage {
        status: ScaStatus,
        stage: &'static str,
    },
    #[error("Invalid SCA status transition {from} -> {to}")]
    InvalidScaTransition { from: ScaStatus, to: ScaStatus },
    #[error("Authorisation `{0}` was modified concurrently")]
    ConcurrentModification(AuthorisationId),
    #[error("Consent `{consent_id}` has status {status}")]
    InvalidConsentStatus {
        consent_id: ConsentId,
        status: ConsentStatus,
    },
    #[error("Payment `{payment_id}` has transaction status {status}")]
    InvalidTransactionStatus {
        payment_id: PaymentId,
        status: TransactionStatus,
    },
    #[error("Access limit of consent `{0}` exceeded")]
    AccessExceeded(ConsentId),
    #[error("PSU already authorised this resource")]
    PsuAlreadyAuthorised,
    #[error("Consent `{0}` kept changing while applying an authorisation outcome")]
    ConcurrentConsentModification(ConsentId),
    #[error("Payment `{0}` kept changing while applying an authorisation outcome")]
    ConcurrentPaymentModification(PaymentId),
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing or incomplete PSU identity")]
    MissingPsuIdentity,
    #[error("PSU identity does not match the authorisation")]
    PsuIdentityMismatch,
    #[error("Incomplete TPP identity")]
    IncompleteTppIdentity,
    #[error("Unknown SCA method `{0}`")]
    UnknownScaMethod(String),
    #[error("Authorisation kind {0} not allowed here")]
    InvalidAuthorisationKind(AuthorisationKind),
    #[error("SCA approach {0} not supported")]
    ScaApproachNotSupported(ScaApproach),
    #[error("Invalid consent request: {0}")]
    InvalidConsentRequest(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EntityNotFound(_) => ErrorKind::NotFound,
            Self::Expired(_) => ErrorKind::Expired,
            Self::BusinessLogic(_) => ErrorKind::InvalidState,
            Self::Validation(_) => ErrorKind::InvalidArgument,
            Self::ScaFailed { .. } => ErrorKind::AdapterFailure,
            Self::MappingError(_) | Self::Config(_) | Self::Repository(_) => ErrorKind::Internal,
        }
    }

    /// Where the PSU's browser should be sent after an expired redirect
    pub fn redirect_uri(&self) -> Option<&str> {
        match self {
            Self::Expired(ExpiredError::Redirect {
                nok_redirect_uri, ..
            }) => nok_redirect_uri.as_deref(),
            _ => None,
        }
    }
}

impl ErrorCodeMixin for ServiceError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::EntityNotFound(error) => error.error_code(),
            Self::Expired(error) => error.error_code(),
            Self::BusinessLogic(error) => error.error_code(),
            Self::Validation(error) => error.error_code(),
            Self::ScaFailed { .. } => ErrorCode::BR_0040,
            Self::Config(_) => ErrorCode::BR_0050,
            Self::Repository(error) => error.error_code(),
            Self::MappingError(_) => ErrorCode::BR_0055,
        }
    }
}

impl ErrorCodeMixin for EntityNotFoundError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Consent(_) => ErrorCode::BR_0001,
            Self::Payment(_) => ErrorCode::BR_0002,
            Self::Authorisation(_) => ErrorCode::BR_0003,
        }
    }
}

impl ErrorCodeMixin for ExpiredError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Authorisation(_) => ErrorCode::BR_0010,
            Self::Redirect { .. } => ErrorCode::BR_0011,
            Self::Consent(_) => ErrorCode::BR_0012,
        }
    }
}

impl ErrorCodeMixin for BusinessLogicError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::AuthorisationFinalised { .. } => ErrorCode::BR_0020,
            Self::InvalidScaStage { .. } | Self::InvalidScaTransition { .. } => {
                ErrorCode::BR_0021
            }
            Self::ConcurrentModification(_) => ErrorCode::BR_0022,
            Self::InvalidConsentStatus { .. } => ErrorCode::BR_0023,
            Self::InvalidTransactionStatus { .. } => ErrorCode::BR_0024,
            Self::AccessExceeded(_) => ErrorCode::BR_0025,
            Self::PsuAlreadyAuthorised => ErrorCode::BR_0026,
            Self::ConcurrentConsentModification(_) => ErrorCode::BR_0027,
            Self::ConcurrentPaymentModification(_) => ErrorCode::BR_0028,
        }
    }
}

impl ErrorCodeMixin for ValidationError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingPsuIdentity => ErrorCode::BR_0030,
            Self::PsuIdentityMismatch => ErrorCode::BR_0031,
            Self::IncompleteTppIdentity => ErrorCode::BR_0032,
            Self::UnknownScaMethod(_) => ErrorCode::BR_0033,
            Self::InvalidAuthorisationKind(_) => ErrorCode::BR_0034,
            Self::ScaApproachNotSupported(_) => ErrorCode::BR_0035,
            Self::InvalidConsentRequest(_) => ErrorCode::BR_0036,
        }
    }
}

impl From<DataLayerError> for ServiceError {
    fn from(value: DataLayerError) -> Self {
        Self::Repository(value)
    }
}
