use super::error::DataLayerError;
use crate::model::secure_data::SecureDataOwner;

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait SecureDataRepository: Send + Sync {
    /// Replaces the stored blob of the owner.
    ///
    /// Fails with [`DataLayerError::IncorrectParameters`] if the owner does not exist.
    async fn upsert_secure_data(
        &self,
        owner: &SecureDataOwner,
        data: Vec<u8>,
    ) -> Result<(), DataLayerError>;

    /// `None` if the owner does not exist or nothing was stored yet
    async fn get_secure_data(
        &self,
        owner: &SecureDataOwner,
    ) -> Result<Option<Vec<u8>>, DataLayerError>;
}
