use shared_types::ConsentId;

use super::error::DataLayerError;
use crate::model::consent::{Consent, ConsentUsage, OldConsentsQuery, UpdateConsentRequest};
use crate::model::psu::PsuIdentity;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait ConsentRepository: Send + Sync {
    async fn create_consent(&self, request: Consent) -> Result<ConsentId, DataLayerError>;

    async fn get_consent(&self, id: &ConsentId) -> Result<Option<Consent>, DataLayerError>;

    /// Consents of the same TPP and instance whose PSU-id set equals `query.psu_ids`
    async fn get_old_consents(
        &self,
        query: OldConsentsQuery,
    ) -> Result<Vec<Consent>, DataLayerError>;

    async fn update_consent(
        &self,
        id: &ConsentId,
        request: UpdateConsentRequest,
    ) -> Result<(), DataLayerError>;

    async fn add_psu_identity(
        &self,
        id: &ConsentId,
        psu_identity: PsuIdentity,
    ) -> Result<(), DataLayerError>;

    async fn add_consent_usage(
        &self,
        id: &ConsentId,
        usage: ConsentUsage,
    ) -> Result<(), DataLayerError>;
}
