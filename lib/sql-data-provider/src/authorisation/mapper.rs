use sea_orm::{NotSet, Set};
use xs2a_core::model::authorisation::{Authorisation, AuthorisationParent};

use crate::entity::authorisation;
use crate::mapper::psu_identity_from_columns;

pub(super) fn authorisation_from_model(
    model: authorisation::Model,
    parent: AuthorisationParent,
) -> Authorisation {
    Authorisation {
        id: model.external_id,
        kind: model.kind.into(),
        parent,
        instance_id: model.instance_id,
        sca_status: model.sca_status.into(),
        sca_approach: model.sca_approach.into(),
        psu_identity: psu_identity_from_columns(
            model.psu_id,
            model.psu_id_type,
            model.psu_corporate_id,
            model.psu_corporate_id_type,
        ),
        chosen_sca_method: model.chosen_sca_method,
        redirect_url_expiration_timestamp: model.redirect_url_expiration_timestamp,
        authorisation_expiration_timestamp: model.authorisation_expiration_timestamp,
        created_date: model.created_date,
        last_modified: model.last_modified,
    }
}

/// Parent columns are filled in by the caller once the internal id is resolved
pub(super) fn authorisation_to_active_model(value: Authorisation) -> authorisation::ActiveModel {
    let psu = value.psu_identity;

    authorisation::ActiveModel {
        id: NotSet,
        external_id: Set(value.id),
        kind: Set(value.kind.into()),
        consent_id: Set(None),
        payment_id: Set(None),
        instance_id: Set(value.instance_id),
        sca_status: Set(value.sca_status.into()),
        sca_approach: Set(value.sca_approach.into()),
        psu_id: Set(psu.as_ref().map(|psu| psu.psu_id.to_owned())),
        psu_id_type: Set(psu.as_ref().and_then(|psu| psu.psu_id_type.to_owned())),
        psu_corporate_id: Set(psu.as_ref().and_then(|psu| psu.psu_corporate_id.to_owned())),
        psu_corporate_id_type: Set(psu.and_then(|psu| psu.psu_corporate_id_type)),
        chosen_sca_method: Set(value.chosen_sca_method),
        redirect_url_expiration_timestamp: Set(value.redirect_url_expiration_timestamp),
        authorisation_expiration_timestamp: Set(value.authorisation_expiration_timestamp),
        created_date: Set(value.created_date),
        last_modified: Set(value.last_modified),
    }
}
