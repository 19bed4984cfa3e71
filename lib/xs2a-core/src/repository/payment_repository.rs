use shared_types::PaymentId;

use super::error::DataLayerError;
use crate::model::payment::{Payment, UpdatePaymentRequest};
use crate::model::psu::PsuIdentity;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create_payment(&self, request: Payment) -> Result<PaymentId, DataLayerError>;

    async fn get_payment(&self, id: &PaymentId) -> Result<Option<Payment>, DataLayerError>;

    async fn update_payment(
        &self,
        id: &PaymentId,
        request: UpdatePaymentRequest,
    ) -> Result<(), DataLayerError>;

    async fn add_psu_identity(
        &self,
        id: &PaymentId,
        psu_identity: PsuIdentity,
    ) -> Result<(), DataLayerError>;
}
