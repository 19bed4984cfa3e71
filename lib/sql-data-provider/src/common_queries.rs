use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use shared_types::{ConsentId, PaymentId};
use xs2a_core::repository::error::DataLayerError;

use crate::entity::{consent, payment};
use crate::mapper::to_data_layer_error;

pub(crate) async fn consent_internal_id(
    db: &impl ConnectionTrait,
    id: &ConsentId,
) -> Result<Option<i32>, DataLayerError> {
    consent::Entity::find()
        .select_only()
        .column(consent::Column::Id)
        .filter(consent::Column::ExternalId.eq(id))
        .into_tuple::<i32>()
        .one(db)
        .await
        .map_err(to_data_layer_error)
}

pub(crate) async fn payment_internal_id(
    db: &impl ConnectionTrait,
    id: &PaymentId,
) -> Result<Option<i32>, DataLayerError> {
    payment::Entity::find()
        .select_only()
        .column(payment::Column::Id)
        .filter(payment::Column::ExternalId.eq(id))
        .into_tuple::<i32>()
        .one(db)
        .await
        .map_err(to_data_layer_error)
}
