use shared_types::ConsentId;
use time::{Date, Duration, OffsetDateTime};

use super::dto::{CreateConsentRequestDTO, CreateConsentResponseDTO};
use crate::model::consent::{Consent, ConsentStatus};

/// Clamps the requested expiry date to the configured consent lifetime.
///
/// A lifetime of 0 days means unlimited. Otherwise the last valid day is
/// `creation_date + lifetime_days - 1`.
pub fn adjust_valid_until(requested: Date, lifetime_days: u32, creation_date: Date) -> Date {
    if lifetime_days == 0 {
        return requested;
    }

    let last_valid_day = creation_date
        .checked_add(Duration::days(i64::from(lifetime_days) - 1))
        .unwrap_or(Date::MAX);

    requested.min(last_valid_day)
}

pub(super) fn consent_from_request(
    request: CreateConsentRequestDTO,
    valid_until: Date,
    frequency_per_day: u32,
    now: OffsetDateTime,
) -> Consent {
    Consent {
        id: ConsentId::new_v4(),
        instance_id: request.instance_id,
        status: ConsentStatus::Received,
        valid_until,
        created_date: now,
        last_modified: now,
        frequency_per_day,
        recurring: request.recurring,
        one_access_type: request.one_access_type,
        multilevel_sca_required: false,
        tpp: request.tpp,
        psu_identities: request.psu_identity.into_iter().collect(),
        usages: vec![],
    }
}

impl From<&Consent> for CreateConsentResponseDTO {
    fn from(value: &Consent) -> Self {
        Self {
            id: value.id,
            status: value.status,
            valid_until: value.valid_until,
            frequency_per_day: value.frequency_per_day,
        }
    }
}
