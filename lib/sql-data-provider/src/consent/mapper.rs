use sea_orm::{NotSet, Set};
use xs2a_core::model::consent::{Consent, ConsentUsage};
use xs2a_core::model::psu::PsuIdentity;

use crate::entity::{consent, consent_psu, consent_usage};
use crate::mapper::TppColumns;

pub(super) fn consent_from_models(
    model: consent::Model,
    psus: Vec<consent_psu::Model>,
    usages: Vec<consent_usage::Model>,
) -> Consent {
    Consent {
        id: model.external_id,
        instance_id: model.instance_id,
        status: model.status.into(),
        valid_until: model.valid_until,
        created_date: model.created_date,
        last_modified: model.last_modified,
        frequency_per_day: model.frequency_per_day,
        recurring: model.recurring,
        one_access_type: model.one_access_type,
        multilevel_sca_required: model.multilevel_sca_required,
        tpp: TppColumns {
            authorisation_number: model.tpp_authorisation_number,
            authority_id: model.tpp_authority_id,
            redirect_uri: model.tpp_redirect_uri,
            nok_redirect_uri: model.tpp_nok_redirect_uri,
            cancel_redirect_uri: model.tpp_cancel_redirect_uri,
            cancel_nok_redirect_uri: model.tpp_cancel_nok_redirect_uri,
        }
        .into(),
        psu_identities: psus.into_iter().map(Into::into).collect(),
        usages: usages.into_iter().map(Into::into).collect(),
    }
}

impl From<consent_psu::Model> for PsuIdentity {
    fn from(value: consent_psu::Model) -> Self {
        Self {
            psu_id: value.psu_id,
            psu_id_type: value.psu_id_type,
            psu_corporate_id: value.psu_corporate_id,
            psu_corporate_id_type: value.psu_corporate_id_type,
        }
    }
}

impl From<consent_usage::Model> for ConsentUsage {
    fn from(value: consent_usage::Model) -> Self {
        Self {
            usage_date: value.usage_date,
            resource_uri: value.resource_uri,
            created_date: value.created_date,
        }
    }
}

pub(super) fn consent_to_active_model(value: &Consent) -> consent::ActiveModel {
    consent::ActiveModel {
        id: NotSet,
        external_id: Set(value.id),
        instance_id: Set(value.instance_id.to_owned()),
        status: Set(value.status.into()),
        valid_until: Set(value.valid_until),
        created_date: Set(value.created_date),
        last_modified: Set(value.last_modified),
        frequency_per_day: Set(value.frequency_per_day),
        recurring: Set(value.recurring),
        one_access_type: Set(value.one_access_type),
        multilevel_sca_required: Set(value.multilevel_sca_required),
        tpp_authorisation_number: Set(value.tpp.authorisation_number.to_owned()),
        tpp_authority_id: Set(value.tpp.authority_id.to_owned()),
        tpp_redirect_uri: Set(value.tpp.redirect_uri.to_owned()),
        tpp_nok_redirect_uri: Set(value.tpp.nok_redirect_uri.to_owned()),
        tpp_cancel_redirect_uri: Set(value.tpp.cancel_redirect_uri.to_owned()),
        tpp_cancel_nok_redirect_uri: Set(value.tpp.cancel_nok_redirect_uri.to_owned()),
    }
}

pub(super) fn psu_to_active_model(consent_id: i32, value: PsuIdentity) -> consent_psu::ActiveModel {
    consent_psu::ActiveModel {
        id: NotSet,
        consent_id: Set(consent_id),
        psu_id: Set(value.psu_id),
        psu_id_type: Set(value.psu_id_type),
        psu_corporate_id: Set(value.psu_corporate_id),
        psu_corporate_id_type: Set(value.psu_corporate_id_type),
    }
}

pub(super) fn usage_to_active_model(
    consent_id: i32,
    value: ConsentUsage,
) -> consent_usage::ActiveModel {
    consent_usage::ActiveModel {
        id: NotSet,
        consent_id: Set(consent_id),
        usage_date: Set(value.usage_date),
        resource_uri: Set(value.resource_uri),
        created_date: Set(value.created_date),
    }
}
