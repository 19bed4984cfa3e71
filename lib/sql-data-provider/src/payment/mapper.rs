use sea_orm::{NotSet, Set};
use xs2a_core::model::payment::Payment;
use xs2a_core::model::psu::PsuIdentity;

use crate::entity::{payment, payment_psu};
use crate::mapper::TppColumns;

pub(super) fn payment_from_models(model: payment::Model, psus: Vec<payment_psu::Model>) -> Payment {
    Payment {
        id: model.external_id,
        instance_id: model.instance_id,
        transaction_status: model.transaction_status.into(),
        payment_type: model.payment_type.into(),
        payment_product: model.payment_product,
        multilevel_sca_required: model.multilevel_sca_required,
        created_date: model.created_date,
        last_modified: model.last_modified,
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
    }
}

impl From<payment_psu::Model> for PsuIdentity {
    fn from(value: payment_psu::Model) -> Self {
        Self {
            psu_id: value.psu_id,
            psu_id_type: value.psu_id_type,
            psu_corporate_id: value.psu_corporate_id,
            psu_corporate_id_type: value.psu_corporate_id_type,
        }
    }
}

pub(super) fn payment_to_active_model(value: &Payment) -> payment::ActiveModel {
    payment::ActiveModel {
        id: NotSet,
        external_id: Set(value.id),
        instance_id: Set(value.instance_id.to_owned()),
        transaction_status: Set(value.transaction_status.into()),
        payment_type: Set(value.payment_type.into()),
        payment_product: Set(value.payment_product.to_owned()),
        multilevel_sca_required: Set(value.multilevel_sca_required),
        created_date: Set(value.created_date),
        last_modified: Set(value.last_modified),
        tpp_authorisation_number: Set(value.tpp.authorisation_number.to_owned()),
        tpp_authority_id: Set(value.tpp.authority_id.to_owned()),
        tpp_redirect_uri: Set(value.tpp.redirect_uri.to_owned()),
        tpp_nok_redirect_uri: Set(value.tpp.nok_redirect_uri.to_owned()),
        tpp_cancel_redirect_uri: Set(value.tpp.cancel_redirect_uri.to_owned()),
        tpp_cancel_nok_redirect_uri: Set(value.tpp.cancel_nok_redirect_uri.to_owned()),
    }
}

pub(super) fn psu_to_active_model(payment_id: i32, value: PsuIdentity) -> payment_psu::ActiveModel {
    payment_psu::ActiveModel {
        id: NotSet,
        payment_id: Set(payment_id),
        psu_id: Set(value.psu_id),
        psu_id_type: Set(value.psu_id_type),
        psu_corporate_id: Set(value.psu_corporate_id),
        psu_corporate_id_type: Set(value.psu_corporate_id_type),
    }
}
