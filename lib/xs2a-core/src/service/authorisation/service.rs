use std::future::Future;

use shared_types::AuthorisationId;
use time::OffsetDateTime;

use super::AuthorisationService;
use super::dto::{
    ScaStageInput, StartAuthorisationRequestDTO, StartAuthorisationResponseDTO,
    UpdatePsuDataRequestDTO, UpdatePsuDataResponseDTO,
};
use super::mapper::authorisation_from_request;
use super::validator::{
    needs_forced_expiry, throw_if_finalised, throw_if_not_owned, throw_if_psu_already_authorised,
};
use crate::config::ConfigValidationError;
use crate::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaApproach, ScaStatus,
    UpdateAuthorisationRequest,
};
use crate::model::consent::ConsentStatus;
use crate::model::psu::PsuIdentity;
use crate::provider::banking_adapter::error::BankingAdapterError;
use crate::provider::banking_adapter::model::BusinessObject;
use crate::provider::secure_data_vault::VaultHandle;
use crate::repository::error::DataLayerError;
use crate::service::error::{
    BusinessLogicError, EntityNotFoundError, ExpiredError, ServiceError, ValidationError,
};
use crate::service::payment::validator::{throw_if_payment_confirmed, throw_if_payment_finalised};

impl AuthorisationService {
    /// Opens a new SCA attempt for a consent or payment
    ///
    /// # Arguments
    ///
    /// * `request` - parent, kind, preferred approach and optional PSU
    #[tracing::instrument(level = "debug", skip_all, err(Debug))]
    pub async fn start_authorisation(
        &self,
        request: StartAuthorisationRequestDTO,
    ) -> Result<StartAuthorisationResponseDTO, ServiceError> {
        if request.kind == AuthorisationKind::Cancel
            && matches!(request.parent, AuthorisationParent::Consent(_))
        {
            return Err(ValidationError::InvalidAuthorisationKind(request.kind).into());
        }

        let sca_approach = self.resolve_sca_approach(request.sca_approach)?;
        let business_object = self
            .load_business_object(&request.parent, request.kind, &request.instance_id)
            .await?;

        if let Some(psu_identity) = &request.psu_identity {
            if !psu_identity.is_complete() {
                return Err(ValidationError::MissingPsuIdentity.into());
            }

            let existing = self
                .authorisation_repository
                .get_authorisations_by_parent(&request.parent, request.kind)
                .await?;
            throw_if_psu_already_authorised(&existing, psu_identity)?;

            self.merge_psu_identity(&request.parent, &business_object, psu_identity)
                .await?;
        }

        let sca_status = match (&request.psu_identity, sca_approach) {
            (Some(_), approach) if approach != ScaApproach::Redirect => ScaStatus::PsuIdentified,
            _ => ScaStatus::Received,
        };

        let authorisation = authorisation_from_request(
            request,
            sca_approach,
            sca_status,
            &self.config.sca,
            OffsetDateTime::now_utc(),
        );
        let response = StartAuthorisationResponseDTO::from(&authorisation);

        self.authorisation_repository
            .create_authorisation(authorisation)
            .await?;
        tracing::info!(
            authorisation_id = %response.authorisation_id,
            approach = %response.sca_approach,
            status = %response.sca_status,
            "Authorisation started"
        );

        Ok(response)
    }

    /// Executes one SCA step.
    ///
    /// Expiry and terminal status are checked before anything else, the banking adapter is
    /// only reached for a usable authorisation.
    #[tracing::instrument(level = "debug", skip_all, fields(authorisation_id = %request.authorisation_id), err(Debug))]
    pub async fn update_psu_data(
        &self,
        request: UpdatePsuDataRequestDTO,
    ) -> Result<UpdatePsuDataResponseDTO, ServiceError> {
        let authorisation = self
            .get_usable_authorisation(
                &request.authorisation_id,
                Some(&request.parent),
                &request.instance_id,
            )
            .await?;

        let business_object = self
            .load_business_object(
                &authorisation.parent,
                authorisation.kind,
                &authorisation.instance_id,
            )
            .await?;

        // the bank's own page drives everything after identification
        let embedded = authorisation.sca_approach != ScaApproach::Redirect;

        match (authorisation.sca_status, request.input) {
            (ScaStatus::Received, ScaStageInput::PsuIdentification { psu_identity }) => {
                self.identify_psu(authorisation, business_object, psu_identity)
                    .await
            }
            (
                ScaStatus::Received | ScaStatus::PsuIdentified,
                ScaStageInput::PsuAuthentication {
                    psu_identity,
                    password,
                },
            ) if embedded => {
                self.authenticate_psu(authorisation, business_object, psu_identity, password)
                    .await
            }
            (ScaStatus::PsuAuthenticated, ScaStageInput::ScaMethodSelection { method_id })
                if embedded =>
            {
                self.select_sca_method(authorisation, business_object, method_id)
                    .await
            }
            (
                ScaStatus::ScaMethodSelected | ScaStatus::Started,
                ScaStageInput::TransactionAuthorisation { confirmation_code },
            ) if embedded => {
                self.confirm_authorisation(authorisation, business_object, confirmation_code)
                    .await
            }
            (status, input) => Err(BusinessLogicError::InvalidScaStage {
                status,
                stage: input.stage_name(),
            }
            .into()),
        }
    }

    /// Current SCA status, an authorisation past its deadline reads as FAILED
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_sca_status(
        &self,
        authorisation_id: &AuthorisationId,
        parent: &AuthorisationParent,
        instance_id: &str,
    ) -> Result<ScaStatus, ServiceError> {
        let authorisation = self
            .get_owned_authorisation(authorisation_id, Some(parent), instance_id)
            .await?;

        if !needs_forced_expiry(&authorisation, OffsetDateTime::now_utc()) {
            return Ok(authorisation.sca_status);
        }

        match self.force_failed(&authorisation).await {
            Ok(()) => Ok(ScaStatus::Failed),
            Err(ServiceError::BusinessLogic(BusinessLogicError::ConcurrentModification(_))) => {
                Ok(self
                    .get_owned_authorisation(authorisation_id, Some(parent), instance_id)
                    .await?
                    .sca_status)
            }
            Err(error) => Err(error),
        }
    }

    /// Ids of all authorisations of the given kind started for the consent or payment
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_authorisations(
        &self,
        parent: &AuthorisationParent,
        kind: AuthorisationKind,
        instance_id: &str,
    ) -> Result<Vec<AuthorisationId>, ServiceError> {
        match parent {
            AuthorisationParent::Consent(id) => {
                self.consent_service.get_consent(id, instance_id).await?;
            }
            AuthorisationParent::Payment(id) => {
                self.payment_service.get_payment(id, instance_id).await?;
            }
        }

        Ok(self
            .authorisation_repository
            .get_authorisations_by_parent(parent, kind)
            .await?
            .into_iter()
            .map(|authorisation| authorisation.id)
            .collect())
    }

    fn resolve_sca_approach(
        &self,
        requested: Option<ScaApproach>,
    ) -> Result<ScaApproach, ServiceError> {
        match requested {
            Some(approach) if self.config.sca.supports(approach) => Ok(approach),
            Some(approach) => Err(ValidationError::ScaApproachNotSupported(approach).into()),
            None => self
                .config
                .sca
                .default_approach()
                .ok_or(ServiceError::Config(ConfigValidationError::MissingScaApproach)),
        }
    }

    pub(super) async fn get_owned_authorisation(
        &self,
        id: &AuthorisationId,
        parent: Option<&AuthorisationParent>,
        instance_id: &str,
    ) -> Result<Authorisation, ServiceError> {
        let authorisation = self
            .authorisation_repository
            .get_authorisation(id)
            .await?
            .ok_or(EntityNotFoundError::Authorisation(*id))?;

        throw_if_not_owned(&authorisation, parent, instance_id)?;

        Ok(authorisation)
    }

    /// Stage entry check, precedes any adapter call
    async fn get_usable_authorisation(
        &self,
        id: &AuthorisationId,
        parent: Option<&AuthorisationParent>,
        instance_id: &str,
    ) -> Result<Authorisation, ServiceError> {
        let authorisation = self.get_owned_authorisation(id, parent, instance_id).await?;
        throw_if_finalised(&authorisation)?;
        self.throw_if_expired(&authorisation).await?;

        Ok(authorisation)
    }

    pub(super) async fn throw_if_expired(
        &self,
        authorisation: &Authorisation,
    ) -> Result<(), ServiceError> {
        if !needs_forced_expiry(authorisation, OffsetDateTime::now_utc()) {
            return Ok(());
        }

        if let Err(error) = self.force_failed(authorisation).await {
            tracing::warn!(authorisation_id = %authorisation.id, "Failed to expire authorisation: {error}");
        }

        Err(ExpiredError::Authorisation(authorisation.id).into())
    }

    /// Loads the consent or payment and checks it can still be authorised
    pub(super) async fn load_business_object(
        &self,
        parent: &AuthorisationParent,
        kind: AuthorisationKind,
        instance_id: &str,
    ) -> Result<BusinessObject, ServiceError> {
        match parent {
            AuthorisationParent::Consent(id) => {
                let consent = self.consent_service.get_consent(id, instance_id).await?;

                match consent.status {
                    ConsentStatus::Received | ConsentStatus::PartiallyAuthorised => {
                        Ok(BusinessObject::Consent(consent))
                    }
                    ConsentStatus::Expired => Err(ExpiredError::Consent(*id).into()),
                    status => Err(BusinessLogicError::InvalidConsentStatus {
                        consent_id: *id,
                        status,
                    }
                    .into()),
                }
            }
            AuthorisationParent::Payment(id) => {
                let payment = self.payment_service.get_payment(id, instance_id).await?;

                match kind {
                    AuthorisationKind::Create => throw_if_payment_confirmed(&payment)?,
                    AuthorisationKind::Cancel => throw_if_payment_finalised(&payment)?,
                }

                Ok(BusinessObject::Payment(payment))
            }
        }
    }

    /// Compare-and-set transition; loses with `ConcurrentModification` if the stored status
    /// moved on in the meantime
    pub(super) async fn advance(
        &self,
        authorisation: &Authorisation,
        next: ScaStatus,
        request: UpdateAuthorisationRequest,
    ) -> Result<(), ServiceError> {
        let from = authorisation.sca_status;
        if !from.can_transition_to(next) {
            return Err(BusinessLogicError::InvalidScaTransition { from, to: next }.into());
        }

        let result = self
            .authorisation_repository
            .update_authorisation(
                &authorisation.id,
                from,
                UpdateAuthorisationRequest {
                    sca_status: Some(next),
                    ..request
                },
            )
            .await;

        match result {
            Ok(()) => {}
            Err(DataLayerError::RecordNotUpdated) => {
                return Err(BusinessLogicError::ConcurrentModification(authorisation.id).into());
            }
            Err(error) => return Err(error.into()),
        }

        tracing::info!(authorisation_id = %authorisation.id, %from, to = %next, "SCA status changed");
        Ok(())
    }

    pub(super) async fn force_failed(
        &self,
        authorisation: &Authorisation,
    ) -> Result<(), ServiceError> {
        tracing::info!(authorisation_id = %authorisation.id, "Authorisation expired");
        self.advance(authorisation, ScaStatus::Failed, Default::default())
            .await
    }

    /// Marks the authorisation FAILED and wraps the adapter error for the caller
    pub(super) async fn fail_sca(
        &self,
        authorisation: &Authorisation,
        source: BankingAdapterError,
    ) -> ServiceError {
        tracing::warn!(authorisation_id = %authorisation.id, "SCA failed: {source}");

        if let Err(error) = self
            .advance(authorisation, ScaStatus::Failed, Default::default())
            .await
        {
            tracing::warn!(authorisation_id = %authorisation.id, "Failed to mark authorisation as failed: {error}");
        }

        ServiceError::ScaFailed {
            authorisation_id: authorisation.id,
            source,
        }
    }

    /// Adapter failure and timeout are reported the same way
    pub(super) async fn call_adapter<T>(
        &self,
        call: impl Future<Output = Result<T, BankingAdapterError>>,
    ) -> Result<T, BankingAdapterError> {
        match self.config.sca.adapter_timeout {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .unwrap_or(Err(BankingAdapterError::Timeout)),
            None => call.await,
        }
    }

    pub(super) fn vault_handle(&self, authorisation: &Authorisation) -> VaultHandle {
        self.vault.handle(authorisation.parent.into())
    }

    /// Adds a PSU that is not yet part of the consent/payment PSU set
    pub(super) async fn merge_psu_identity(
        &self,
        parent: &AuthorisationParent,
        business_object: &BusinessObject,
        psu_identity: &PsuIdentity,
    ) -> Result<(), ServiceError> {
        if business_object.psu_identities().contains(psu_identity) {
            return Ok(());
        }

        match parent {
            AuthorisationParent::Consent(id) => {
                self.consent_service
                    .add_psu_identity(id, psu_identity.to_owned())
                    .await
            }
            AuthorisationParent::Payment(id) => {
                self.payment_service
                    .add_psu_identity(id, psu_identity.to_owned())
                    .await
            }
        }
    }
}
