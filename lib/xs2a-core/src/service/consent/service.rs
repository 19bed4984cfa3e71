use shared_types::ConsentId;
use time::OffsetDateTime;

use super::ConsentService;
use super::dto::{CreateConsentRequestDTO, CreateConsentResponseDTO};
use super::mapper::{adjust_valid_until, consent_from_request};
use super::validator::{
    bounded_frequency_per_day, throw_if_access_exceeded, throw_if_not_usable,
    validate_create_request,
};
use crate::model::consent::{Consent, ConsentStatus, ConsentUsage, UpdateConsentRequest};
use crate::model::psu::PsuIdentity;
use crate::repository::error::DataLayerError;
use crate::service::error::{BusinessLogicError, EntityNotFoundError, ServiceError};

impl ConsentService {
    /// Stores a new AIS consent in status RECEIVED
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn create_consent(
        &self,
        request: CreateConsentRequestDTO,
    ) -> Result<CreateConsentResponseDTO, ServiceError> {
        let now = OffsetDateTime::now_utc();
        validate_create_request(&request, now.date())?;

        let valid_until = adjust_valid_until(
            request.valid_until,
            self.config.consent.lifetime_days,
            now.date(),
        );
        let frequency_per_day =
            bounded_frequency_per_day(&request, self.config.consent.max_frequency_per_day);

        let consent = consent_from_request(request, valid_until, frequency_per_day, now);
        let response = CreateConsentResponseDTO::from(&consent);

        let id = self.consent_repository.create_consent(consent).await?;
        tracing::info!(consent_id = %id, "Consent created");

        Ok(response)
    }

    /// Returns the consent, expiring it first if it is no longer usable
    ///
    /// # Arguments
    ///
    /// * `id` - external consent id
    /// * `instance_id` - tenant the consent must belong to
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_consent(
        &self,
        id: &ConsentId,
        instance_id: &str,
    ) -> Result<Consent, ServiceError> {
        let consent = self.load_consent(id, Some(instance_id)).await?;
        self.expire_if_needed(consent).await
    }

    pub async fn get_consent_status(
        &self,
        id: &ConsentId,
        instance_id: &str,
    ) -> Result<ConsentStatus, ServiceError> {
        Ok(self.get_consent(id, instance_id).await?.status)
    }

    /// Expiry-on-read without tenant check, used by the authorisation flows
    pub async fn get_with_expiry_check(&self, id: &ConsentId) -> Result<Consent, ServiceError> {
        let consent = self.load_consent(id, None).await?;
        self.expire_if_needed(consent).await
    }

    /// Termination of the consent by the TPP
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn revoke_consent(&self, id: &ConsentId, instance_id: &str) -> Result<(), ServiceError> {
        let consent = self.get_consent(id, instance_id).await?;

        if consent.status.is_finalised() {
            return Err(BusinessLogicError::InvalidConsentStatus {
                consent_id: consent.id,
                status: consent.status,
            }
            .into());
        }

        self.set_status(&consent, ConsentStatus::TerminatedByTpp)
            .await
    }

    /// Counts a successful data access made under the consent.
    ///
    /// Recurring consents are limited to `frequency_per_day` accesses of the same resource per
    /// day. A one-off consent becomes EXPIRED on the next read after its first usage.
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn record_usage(
        &self,
        id: &ConsentId,
        instance_id: &str,
        resource_uri: &str,
    ) -> Result<(), ServiceError> {
        let consent = self.get_consent(id, instance_id).await?;
        throw_if_not_usable(&consent)?;

        let now = OffsetDateTime::now_utc();
        throw_if_access_exceeded(&consent, resource_uri, now.date())?;

        self.consent_repository
            .add_consent_usage(
                id,
                ConsentUsage {
                    usage_date: now.date(),
                    resource_uri: resource_uri.to_owned(),
                    created_date: now,
                },
            )
            .await?;

        Ok(())
    }

    /// Adding a PSU that is already part of the consent is a no-op
    pub(crate) async fn add_psu_identity(
        &self,
        id: &ConsentId,
        psu_identity: PsuIdentity,
    ) -> Result<(), ServiceError> {
        match self
            .consent_repository
            .add_psu_identity(id, psu_identity)
            .await
        {
            Ok(()) => tracing::info!(consent_id = %id, "PSU added to consent"),
            Err(DataLayerError::AlreadyExists) => {
                tracing::debug!(consent_id = %id, "PSU already part of consent");
            }
            Err(error) => return Err(error.into()),
        }

        Ok(())
    }

    async fn load_consent(
        &self,
        id: &ConsentId,
        instance_id: Option<&str>,
    ) -> Result<Consent, ServiceError> {
        let consent = self
            .consent_repository
            .get_consent(id)
            .await?
            .ok_or(EntityNotFoundError::Consent(*id))?;

        if instance_id.is_some_and(|instance_id| instance_id != consent.instance_id) {
            return Err(EntityNotFoundError::Consent(*id).into());
        }

        Ok(consent)
    }

    async fn expire_if_needed(&self, mut consent: Consent) -> Result<Consent, ServiceError> {
        let now = OffsetDateTime::now_utc();
        if !self.is_expired(&consent, now) {
            return Ok(consent);
        }

        self.set_status(&consent, ConsentStatus::Expired).await?;
        consent.status = ConsentStatus::Expired;
        consent.last_modified = now;

        Ok(consent)
    }

    fn is_expired(&self, consent: &Consent, now: OffsetDateTime) -> bool {
        if consent.status.is_finalised() {
            return false;
        }

        let used_one_off = !consent.recurring && !consent.usages.is_empty();

        let window = self.config.consent.not_confirmed_expiration_time;
        let not_confirmed = matches!(
            consent.status,
            ConsentStatus::Received | ConsentStatus::PartiallyAuthorised
        ) && window.is_positive()
            && consent.created_date + window <= now;

        used_one_off || not_confirmed || consent.valid_until < now.date()
    }

    pub(super) async fn set_status(
        &self,
        consent: &Consent,
        status: ConsentStatus,
    ) -> Result<(), ServiceError> {
        self.consent_repository
            .update_consent(
                &consent.id,
                UpdateConsentRequest {
                    status: Some(status),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(consent_id = %consent.id, from = %consent.status, to = %status, "Consent status changed");
        Ok(())
    }
}
