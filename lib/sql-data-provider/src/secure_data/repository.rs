use autometrics::autometrics;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, NotSet, QueryFilter, QuerySelect, Set};
use time::OffsetDateTime;
use xs2a_core::model::secure_data::SecureDataOwner;
use xs2a_core::repository::error::DataLayerError;
use xs2a_core::repository::secure_data_repository::SecureDataRepository;

use super::SecureDataProvider;
use crate::common_queries::{consent_internal_id, payment_internal_id};
use crate::entity::secure_data;
use crate::mapper::to_data_layer_error;

impl SecureDataProvider {
    async fn owner_key(
        &self,
        owner: &SecureDataOwner,
    ) -> Result<Option<(secure_data::OwnerType, i32)>, DataLayerError> {
        Ok(match owner {
            SecureDataOwner::Consent(id) => consent_internal_id(&self.db, id)
                .await?
                .map(|id| (secure_data::OwnerType::Consent, id)),
            SecureDataOwner::Payment(id) => payment_internal_id(&self.db, id)
                .await?
                .map(|id| (secure_data::OwnerType::Payment, id)),
        })
    }
}

#[autometrics]
#[async_trait::async_trait]
impl SecureDataRepository for SecureDataProvider {
    async fn upsert_secure_data(
        &self,
        owner: &SecureDataOwner,
        data: Vec<u8>,
    ) -> Result<(), DataLayerError> {
        let (owner_type, owner_id) = self
            .owner_key(owner)
            .await?
            .ok_or(DataLayerError::IncorrectParameters)?;

        let now = OffsetDateTime::now_utc();
        let model = secure_data::ActiveModel {
            id: NotSet,
            owner_type: Set(owner_type),
            owner_id: Set(owner_id),
            value: Set(data),
            created_date: Set(now),
            last_modified: Set(now),
        };

        secure_data::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    secure_data::Column::OwnerType,
                    secure_data::Column::OwnerId,
                ])
                .update_columns([secure_data::Column::Value, secure_data::Column::LastModified])
                .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(())
    }

    async fn get_secure_data(
        &self,
        owner: &SecureDataOwner,
    ) -> Result<Option<Vec<u8>>, DataLayerError> {
        let Some((owner_type, owner_id)) = self.owner_key(owner).await? else {
            return Ok(None);
        };

        secure_data::Entity::find()
            .select_only()
            .column(secure_data::Column::Value)
            .filter(secure_data::Column::OwnerType.eq(owner_type))
            .filter(secure_data::Column::OwnerId.eq(owner_id))
            .into_tuple::<Vec<u8>>()
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)
    }
}
