use std::collections::HashSet;

use autometrics::autometrics;
use itertools::Itertools;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QueryTrait, Set, TransactionTrait,
};
use shared_types::ConsentId;
use time::OffsetDateTime;
use xs2a_core::model::consent::{Consent, ConsentUsage, OldConsentsQuery, UpdateConsentRequest};
use xs2a_core::model::psu::PsuIdentity;
use xs2a_core::repository::consent_repository::ConsentRepository;
use xs2a_core::repository::error::DataLayerError;

use super::ConsentProvider;
use super::mapper::{
    consent_from_models, consent_to_active_model, psu_to_active_model, usage_to_active_model,
};
use crate::common_queries::consent_internal_id;
use crate::entity::{consent, consent_psu, consent_usage};
use crate::mapper::{to_data_layer_error, to_update_data_layer_error};

impl ConsentProvider {
    async fn load_children(
        db: &impl ConnectionTrait,
        models: Vec<consent::Model>,
    ) -> Result<Vec<Consent>, DataLayerError> {
        let ids: Vec<i32> = models.iter().map(|model| model.id).collect();

        let mut psus = consent_psu::Entity::find()
            .filter(consent_psu::Column::ConsentId.is_in(ids.clone()))
            .order_by_asc(consent_psu::Column::Id)
            .all(db)
            .await
            .map_err(to_data_layer_error)?
            .into_iter()
            .into_group_map_by(|psu| psu.consent_id);

        let mut usages = consent_usage::Entity::find()
            .filter(consent_usage::Column::ConsentId.is_in(ids))
            .order_by_asc(consent_usage::Column::Id)
            .all(db)
            .await
            .map_err(to_data_layer_error)?
            .into_iter()
            .into_group_map_by(|usage| usage.consent_id);

        Ok(models
            .into_iter()
            .map(|model| {
                let psus = psus.remove(&model.id).unwrap_or_default();
                let usages = usages.remove(&model.id).unwrap_or_default();
                consent_from_models(model, psus, usages)
            })
            .collect())
    }
}

#[autometrics]
#[async_trait::async_trait]
impl ConsentRepository for ConsentProvider {
    async fn create_consent(&self, request: Consent) -> Result<ConsentId, DataLayerError> {
        let txn = self.db.begin().await.map_err(to_data_layer_error)?;

        let model = consent_to_active_model(&request)
            .insert(&txn)
            .await
            .map_err(to_data_layer_error)?;

        if !request.psu_identities.is_empty() {
            consent_psu::Entity::insert_many(
                request
                    .psu_identities
                    .into_iter()
                    .map(|psu| psu_to_active_model(model.id, psu)),
            )
            .exec(&txn)
            .await
            .map_err(to_data_layer_error)?;
        }

        if !request.usages.is_empty() {
            consent_usage::Entity::insert_many(
                request
                    .usages
                    .into_iter()
                    .map(|usage| usage_to_active_model(model.id, usage)),
            )
            .exec(&txn)
            .await
            .map_err(to_data_layer_error)?;
        }

        txn.commit().await.map_err(to_data_layer_error)?;

        Ok(model.external_id)
    }

    async fn get_consent(&self, id: &ConsentId) -> Result<Option<Consent>, DataLayerError> {
        let Some(model) = consent::Entity::find()
            .filter(consent::Column::ExternalId.eq(id))
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)?
        else {
            return Ok(None);
        };

        Ok(Self::load_children(&self.db, vec![model]).await?.pop())
    }

    async fn get_old_consents(
        &self,
        query: OldConsentsQuery,
    ) -> Result<Vec<Consent>, DataLayerError> {
        if query.psu_ids.is_empty() || query.statuses.is_empty() {
            return Ok(vec![]);
        }

        let statuses = query
            .statuses
            .into_iter()
            .map(consent::ConsentStatus::from)
            .collect::<Vec<_>>();

        let models = consent::Entity::find()
            .filter(consent::Column::InstanceId.eq(query.instance_id))
            .filter(consent::Column::TppAuthorisationNumber.eq(query.tpp_authorisation_number))
            .filter(consent::Column::TppAuthorityId.eq(query.tpp_authority_id))
            .filter(consent::Column::Status.is_in(statuses))
            .filter(consent::Column::ExternalId.ne(&query.exclude))
            .filter(
                consent::Column::Id.in_subquery(
                    Query::select()
                        .column(consent_psu::Column::ConsentId)
                        .from(consent_psu::Entity)
                        .and_where(consent_psu::Column::PsuId.is_in(query.psu_ids.clone()))
                        .to_owned(),
                ),
            )
            .order_by_asc(consent::Column::Id)
            .all(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        let expected: HashSet<&str> = query.psu_ids.iter().map(String::as_str).collect();

        Ok(Self::load_children(&self.db, models)
            .await?
            .into_iter()
            .filter(|consent| {
                let psu_ids: HashSet<&str> = consent
                    .psu_identities
                    .iter()
                    .map(|psu| psu.psu_id.as_str())
                    .collect();
                psu_ids == expected
            })
            .collect())
    }

    async fn update_consent(
        &self,
        id: &ConsentId,
        request: UpdateConsentRequest,
    ) -> Result<(), DataLayerError> {
        let update_model = consent::ActiveModel {
            last_modified: Set(OffsetDateTime::now_utc()),
            status: request
                .status
                .map(|status| Set(status.into()))
                .unwrap_or_default(),
            multilevel_sca_required: request
                .multilevel_sca_required
                .map(Set)
                .unwrap_or_default(),
            ..Default::default()
        };

        let result = consent::Entity::update_many()
            .set(update_model)
            .filter(consent::Column::ExternalId.eq(id))
            .apply_if(request.expected_status, |query, status| {
                query.filter(consent::Column::Status.eq(consent::ConsentStatus::from(status)))
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
        id: &ConsentId,
        psu_identity: PsuIdentity,
    ) -> Result<(), DataLayerError> {
        let consent_id = consent_internal_id(&self.db, id)
            .await?
            .ok_or(DataLayerError::IncorrectParameters)?;

        psu_to_active_model(consent_id, psu_identity)
            .insert(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(())
    }

    async fn add_consent_usage(
        &self,
        id: &ConsentId,
        usage: ConsentUsage,
    ) -> Result<(), DataLayerError> {
        let consent_id = consent_internal_id(&self.db, id)
            .await?
            .ok_or(DataLayerError::IncorrectParameters)?;

        usage_to_active_model(consent_id, usage)
            .insert(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(())
    }
}
