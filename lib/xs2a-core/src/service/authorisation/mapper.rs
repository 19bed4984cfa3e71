use shared_types::AuthorisationId;
use time::OffsetDateTime;

use super::dto::{
    StartAuthorisationRequestDTO, StartAuthorisationResponseDTO, UpdatePsuDataResponseDTO,
};
use crate::config::core_config::ScaConfig;
use crate::model::authorisation::{Authorisation, AuthorisationKind, ScaApproach, ScaStatus};
use crate::model::psu::PsuIdentity;
use crate::model::tpp::TppIdentity;
use crate::provider::banking_adapter::model::{BusinessObject, SpiContext};

pub(super) fn authorisation_from_request(
    request: StartAuthorisationRequestDTO,
    sca_approach: ScaApproach,
    sca_status: ScaStatus,
    config: &ScaConfig,
    now: OffsetDateTime,
) -> Authorisation {
    Authorisation {
        id: AuthorisationId::new_v4(),
        kind: request.kind,
        parent: request.parent,
        instance_id: request.instance_id,
        sca_status,
        sca_approach,
        psu_identity: request.psu_identity,
        chosen_sca_method: None,
        redirect_url_expiration_timestamp: now + config.redirect_url_expiration_time,
        authorisation_expiration_timestamp: now + config.authorisation_expiration_time,
        created_date: now,
        last_modified: now,
    }
}

impl From<&Authorisation> for StartAuthorisationResponseDTO {
    fn from(value: &Authorisation) -> Self {
        Self {
            authorisation_id: value.id,
            sca_status: value.sca_status,
            sca_approach: value.sca_approach,
            redirect_id: (value.sca_approach == ScaApproach::Redirect).then_some(value.id),
            redirect_url_expiration_timestamp: value.redirect_url_expiration_timestamp,
        }
    }
}

impl UpdatePsuDataResponseDTO {
    pub(super) fn new(authorisation_id: AuthorisationId, sca_status: ScaStatus) -> Self {
        Self {
            authorisation_id,
            sca_status,
            available_sca_methods: vec![],
            chosen_sca_method: None,
            challenge_data: None,
            psu_message: None,
        }
    }
}

pub(super) fn spi_context(
    authorisation: &Authorisation,
    psu_identity: Option<&PsuIdentity>,
    business_object: &BusinessObject,
) -> SpiContext {
    SpiContext {
        instance_id: authorisation.instance_id.to_owned(),
        authorisation_id: authorisation.id,
        psu_identity: psu_identity.cloned(),
        tpp: business_object.tpp().to_owned(),
    }
}

/// Cancellations prefer the dedicated cancellation URI
pub(super) fn nok_redirect_uri(kind: AuthorisationKind, tpp: &TppIdentity) -> Option<String> {
    match kind {
        AuthorisationKind::Create => tpp.nok_redirect_uri.to_owned(),
        AuthorisationKind::Cancel => tpp
            .cancel_nok_redirect_uri
            .to_owned()
            .or_else(|| tpp.nok_redirect_uri.to_owned()),
    }
}
