use shared_types::AuthorisationId;

use super::error::DataLayerError;
use crate::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaStatus, UpdateAuthorisationRequest,
};

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait AuthorisationRepository: Send + Sync {
    async fn create_authorisation(
        &self,
        request: Authorisation,
    ) -> Result<AuthorisationId, DataLayerError>;

    async fn get_authorisation(
        &self,
        id: &AuthorisationId,
    ) -> Result<Option<Authorisation>, DataLayerError>;

    async fn get_authorisations_by_parent(
        &self,
        parent: &AuthorisationParent,
        kind: AuthorisationKind,
    ) -> Result<Vec<Authorisation>, DataLayerError>;

    /// Compare-and-set on the current SCA status.
    ///
    /// Fails with [`DataLayerError::RecordNotUpdated`] if the stored status is no longer
    /// `expected_status`, so only one of several concurrent transitions wins.
    async fn update_authorisation(
        &self,
        id: &AuthorisationId,
        expected_status: ScaStatus,
        request: UpdateAuthorisationRequest,
    ) -> Result<(), DataLayerError>;
}
