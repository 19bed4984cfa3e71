use autometrics::autometrics;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use shared_types::{AuthorisationId, ConsentId, PaymentId};
use time::OffsetDateTime;
use xs2a_core::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaStatus, UpdateAuthorisationRequest,
};
use xs2a_core::repository::authorisation_repository::AuthorisationRepository;
use xs2a_core::repository::error::DataLayerError;

use super::AuthorisationProvider;
use super::mapper::{authorisation_from_model, authorisation_to_active_model};
use crate::common_queries::{consent_internal_id, payment_internal_id};
use crate::entity::{authorisation, consent, payment};
use crate::mapper::{to_data_layer_error, to_update_data_layer_error};

impl AuthorisationProvider {
    async fn resolve_parent(
        &self,
        model: &authorisation::Model,
    ) -> Result<AuthorisationParent, DataLayerError> {
        match (model.consent_id, model.payment_id) {
            (Some(consent_id), None) => consent::Entity::find_by_id(consent_id)
                .select_only()
                .column(consent::Column::ExternalId)
                .into_tuple::<ConsentId>()
                .one(&self.db)
                .await
                .map_err(to_data_layer_error)?
                .map(AuthorisationParent::Consent)
                .ok_or(DataLayerError::MappingError),
            (None, Some(payment_id)) => payment::Entity::find_by_id(payment_id)
                .select_only()
                .column(payment::Column::ExternalId)
                .into_tuple::<PaymentId>()
                .one(&self.db)
                .await
                .map_err(to_data_layer_error)?
                .map(AuthorisationParent::Payment)
                .ok_or(DataLayerError::MappingError),
            _ => {
                tracing::error!("Authorisation {} has no unique parent", model.external_id);
                Err(DataLayerError::MappingError)
            }
        }
    }
}

#[autometrics]
#[async_trait::async_trait]
impl AuthorisationRepository for AuthorisationProvider {
    async fn create_authorisation(
        &self,
        request: Authorisation,
    ) -> Result<AuthorisationId, DataLayerError> {
        let parent = request.parent;
        let mut model = authorisation_to_active_model(request);

        match parent {
            AuthorisationParent::Consent(id) => {
                let consent_id = consent_internal_id(&self.db, &id)
                    .await?
                    .ok_or(DataLayerError::IncorrectParameters)?;
                model.consent_id = Set(Some(consent_id));
            }
            AuthorisationParent::Payment(id) => {
                let payment_id = payment_internal_id(&self.db, &id)
                    .await?
                    .ok_or(DataLayerError::IncorrectParameters)?;
                model.payment_id = Set(Some(payment_id));
            }
        }

        let model = model
            .insert(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(model.external_id)
    }

    async fn get_authorisation(
        &self,
        id: &AuthorisationId,
    ) -> Result<Option<Authorisation>, DataLayerError> {
        let Some(model) = authorisation::Entity::find()
            .filter(authorisation::Column::ExternalId.eq(id))
            .one(&self.db)
            .await
            .map_err(to_data_layer_error)?
        else {
            return Ok(None);
        };

        let parent = self.resolve_parent(&model).await?;
        Ok(Some(authorisation_from_model(model, parent)))
    }

    async fn get_authorisations_by_parent(
        &self,
        parent: &AuthorisationParent,
        kind: AuthorisationKind,
    ) -> Result<Vec<Authorisation>, DataLayerError> {
        let filter = match parent {
            AuthorisationParent::Consent(id) => consent_internal_id(&self.db, id)
                .await?
                .map(|consent_id| authorisation::Column::ConsentId.eq(consent_id)),
            AuthorisationParent::Payment(id) => payment_internal_id(&self.db, id)
                .await?
                .map(|payment_id| authorisation::Column::PaymentId.eq(payment_id)),
        };

        let Some(filter) = filter else {
            return Ok(vec![]);
        };

        let models = authorisation::Entity::find()
            .filter(filter)
            .filter(authorisation::Column::Kind.eq(authorisation::AuthorisationKind::from(kind)))
            .order_by_asc(authorisation::Column::CreatedDate)
            .order_by_asc(authorisation::Column::Id)
            .all(&self.db)
            .await
            .map_err(to_data_layer_error)?;

        Ok(models
            .into_iter()
            .map(|model| authorisation_from_model(model, *parent))
            .collect())
    }

    async fn update_authorisation(
        &self,
        id: &AuthorisationId,
        expected_status: ScaStatus,
        request: UpdateAuthorisationRequest,
    ) -> Result<(), DataLayerError> {
        let mut update_model = authorisation::ActiveModel {
            last_modified: Set(OffsetDateTime::now_utc()),
            sca_status: request
                .sca_status
                .map(|status| Set(status.into()))
                .unwrap_or_default(),
            chosen_sca_method: request
                .chosen_sca_method
                .map(|method| Set(Some(method)))
                .unwrap_or_default(),
            ..Default::default()
        };

        if let Some(psu) = request.psu_identity {
            update_model.psu_id = Set(Some(psu.psu_id));
            update_model.psu_id_type = Set(psu.psu_id_type);
            update_model.psu_corporate_id = Set(psu.psu_corporate_id);
            update_model.psu_corporate_id_type = Set(psu.psu_corporate_id_type);
        }

        let result = authorisation::Entity::update_many()
            .set(update_model)
            .filter(authorisation::Column::ExternalId.eq(id))
            .filter(
                authorisation::Column::ScaStatus
                    .eq(authorisation::ScaStatus::from(expected_status)),
            )
            .exec(&self.db)
            .await
            .map_err(to_update_data_layer_error)?;

        if result.rows_affected == 0 {
            tracing::debug!("Authorisation {id} is no longer in status {expected_status}");
            return Err(DataLayerError::RecordNotUpdated);
        }

        Ok(())
    }
}
