use time::Date;

use super::dto::CreateConsentRequestDTO;
use crate::model::consent::{Consent, ConsentStatus};
use crate::model::psu::PsuIdentity;
use crate::service::error::{BusinessLogicError, ServiceError, ValidationError};

pub(super) fn validate_create_request(
    request: &CreateConsentRequestDTO,
    today: Date,
) -> Result<(), ServiceError> {
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

    if request.valid_until < today {
        return Err(
            ValidationError::InvalidConsentRequest("validUntil lies in the past".to_owned()).into(),
        );
    }

    if request.recurring && request.frequency_per_day == 0 {
        return Err(ValidationError::InvalidConsentRequest(
            "frequencyPerDay must be positive".to_owned(),
        )
        .into());
    }

    Ok(())
}

/// Recurring consents are capped by the configured maximum, one-off consents allow one access
pub(super) fn bounded_frequency_per_day(
    request: &CreateConsentRequestDTO,
    max_frequency_per_day: u32,
) -> u32 {
    if !request.recurring {
        return 1;
    }

    match max_frequency_per_day {
        0 => request.frequency_per_day,
        max => request.frequency_per_day.min(max),
    }
}

pub(super) fn throw_if_not_usable(consent: &Consent) -> Result<(), ServiceError> {
    if consent.status != ConsentStatus::Valid {
        return Err(BusinessLogicError::InvalidConsentStatus {
            consent_id: consent.id,
            status: consent.status,
        }
        .into());
    }

    Ok(())
}

pub(super) fn throw_if_access_exceeded(
    consent: &Consent,
    resource_uri: &str,
    today: Date,
) -> Result<(), ServiceError> {
    if !consent.recurring {
        return Ok(());
    }

    let used_today = consent
        .usages
        .iter()
        .filter(|usage| usage.usage_date == today && usage.resource_uri == resource_uri)
        .count();

    if used_today >= consent.frequency_per_day as usize {
        return Err(BusinessLogicError::AccessExceeded(consent.id).into());
    }

    Ok(())
}

/// Old consents can only be looked up for a fully identified PSU set and TPP
pub(super) fn validate_termination_source(consent: &Consent) -> Result<(), ServiceError> {
    if consent.psu_identities.is_empty()
        || !consent.psu_identities.iter().all(PsuIdentity::is_complete)
    {
        return Err(ValidationError::MissingPsuIdentity.into());
    }

    if !consent.tpp.is_complete() {
        return Err(ValidationError::IncompleteTppIdentity.into());
    }

    Ok(())
}
