use super::dto::CreatePaymentRequestDTO;
use crate::model::payment::Payment;
use crate::service::error::{BusinessLogicError, ServiceError, ValidationError};

pub(super) fn validate_create_request(request: &CreatePaymentRequestDTO) -> Result<(), ServiceError> {
    if !request.tpp.is_complete() {
        return Err(ValidationError::IncompleteTppIdentity.into());
    }

    if request
        .psu_identity
        .as_ref()
        .is_some_and(|psu| !psu.is_complete())
    {
        return Err(ValidationError::MissingPsuIdentity.into());
    }

    Ok(())
}

pub(crate) fn throw_if_payment_finalised(payment: &Payment) -> Result<(), ServiceError> {
    if payment.transaction_status.is_finalised() {
        return Err(BusinessLogicError::InvalidTransactionStatus {
            payment_id: payment.id,
            status: payment.transaction_status,
        }
        .into());
    }

    Ok(())
}

/// Only payments still waiting for the PSU can be authorised
pub(crate) fn throw_if_payment_confirmed(payment: &Payment) -> Result<(), ServiceError> {
    if !payment.transaction_status.is_not_confirmed() {
        return Err(BusinessLogicError::InvalidTransactionStatus {
            payment_id: payment.id,
            status: payment.transaction_status,
        }
        .into());
    }

    Ok(())
}
