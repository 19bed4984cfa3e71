use sea_orm::{DbErr, SqlErr};
use xs2a_core::model::psu::PsuIdentity;
use xs2a_core::model::tpp::TppIdentity;
use xs2a_core::repository::error::DataLayerError;

pub(crate) fn to_data_layer_error(e: DbErr) -> DataLayerError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DataLayerError::AlreadyExists,
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => DataLayerError::IncorrectParameters,
        Some(_) | None => {
            tracing::error!("Database error: {e}");
            DataLayerError::Db(e.into())
        }
    }
}

pub(crate) fn to_update_data_layer_error(err: DbErr) -> DataLayerError {
    match err {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => DataLayerError::RecordNotUpdated,
        e => to_data_layer_error(e),
    }
}

/// Flattened TPP columns shared by consent and payment tables
pub(crate) struct TppColumns {
    pub authorisation_number: String,
    pub authority_id: String,
    pub redirect_uri: Option<String>,
    pub nok_redirect_uri: Option<String>,
    pub cancel_redirect_uri: Option<String>,
    pub cancel_nok_redirect_uri: Option<String>,
}

impl From<TppColumns> for TppIdentity {
    fn from(value: TppColumns) -> Self {
        Self {
            authorisation_number: value.authorisation_number,
            authority_id: value.authority_id,
            redirect_uri: value.redirect_uri,
            nok_redirect_uri: value.nok_redirect_uri,
            cancel_redirect_uri: value.cancel_redirect_uri,
            cancel_nok_redirect_uri: value.cancel_nok_redirect_uri,
        }
    }
}

pub(crate) fn psu_identity_from_columns(
    psu_id: Option<String>,
    psu_id_type: Option<String>,
    psu_corporate_id: Option<String>,
    psu_corporate_id_type: Option<String>,
) -> Option<PsuIdentity> {
    psu_id.map(|psu_id| PsuIdentity {
        psu_id,
        psu_id_type,
        psu_corporate_id,
        psu_corporate_id_type,
    })
}
