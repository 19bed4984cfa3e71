use autometrics::autometrics;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QueryTrait, Set,
    TransactionTrait,
};
use shared_types::PaymentId;
use time::OffsetDateTime;
use xs2a_core::model::payment::{Payment, UpdatePaymentRequest};
use xs2a_core::model::psu::PsuIdentity;
use xs2a_core::repository::error::DataLayerError;
use xs2a_core::repository::payment_repository::PaymentRepository;

use super::PaymentProvider;
use super::mapper::{payment_from_models, payment_to_active_model, psu_to_active_model};
use crate::common_queries::payment_internal_id;
use crate::entity::{payment, payment_psu};
use crate::mapper::{to_data_layer_error, to_update_data_layer_error};

#[autometrics]
#[async_trait::async_trait]
impl PaymentRepository for PaymentProvider {
    async fn create_payment(&self, request: Payment) -> Result<PaymentId, DataLayerError> {
        let txn = self.db.begin().await.map_err(to_data_layer_error)?;

        let model = payment_to_active_model(&request)
            .insert(&txn)
            .await
            .map_err(to_data_layer_error)?;

        if !request.psu_identities.is_empty() {
            payment_psu::Entity::insert_many(
                request
                    .psu_identities
                    .into_iter()
                    .map(|psu| psu_to_active_model(model.id, psu)),
            )
            .exec(&txn)
            .await
            .map_err(to_data_layer_error)?;
        }

        txn.commit().await.map_err(to_data_layer_error)?;

        Ok(model.external_id)
    }

    async fn get_payment(&self, id: &PaymentId) -> Result<Option<Payment>, DataLayerError> {
        let Some(model) = payment::Entity::find()
            .filter(payment::Column::ExternalId.eq(id))
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)?
        else {
            return Ok(None);
        };

        let psus = payment_psu::Entity::find()
            .filter(payment_psu::Column::PaymentId.eq(model.id))
            .order_by_asc(payment_psu::Column::Id)
            .all(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(Some(payment_from_models(model, psus)))
    }

    async fn update_payment(
        &self,
        id: &PaymentId,
        request: UpdatePaymentRequest,
    ) -> Result<(), DataLayerError> {
        let update_model = payment::ActiveModel {
            last_modified: Set(OffsetDateTime::now_utc()),
            transaction_status: request
                .transaction_status
                .map(|status| Set(status.into()))
                .unwrap_or_default(),
            multilevel_sca_required: request
                .multilevel_sca_required
                .map(Set)
                .unwrap_or_default(),
            ..Default::default()
        };

        let result = payment::Entity::update_many()
            .set(update_model)
            .filter(payment::Column::ExternalId.eq(id))
            .apply_if(request.expected_transaction_status, |query, status| {
                query.filter(
                    payment::Column::TransactionStatus
                        .eq(payment::TransactionStatus::from(status)),
                )
            })
            .exec(&self.db)
            .await
            .map_err(to_update_data_layer_error)?;

        if result.rows_affected == 0 {
            return Err(DataLayerError::RecordNotUpdated);
        }

        Ok(())
    }

    async fn add_psu_identity(
        &self,
        id: &PaymentId,
        psu_identity: PsuIdentity,
    ) -> Result<(), DataLayerError> {
        let payment_id = payment_internal_id(&self.db, id)
            .await?
            .ok_or(DataLayerError::IncorrectParameters)?;

        psu_to_active_model(payment_id, psu_identity)
            .insert(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(())
    }
}
