use shared_types::AuthorisationId;
use time::OffsetDateTime;

use super::AuthorisationService;
use super::dto::{
    CompleteRedirectRequestDTO, RedirectConsentDTO, RedirectPaymentDTO, UpdatePsuDataResponseDTO,
};
use super::mapper::nok_redirect_uri;
use super::validator::throw_if_finalised;
use crate::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaApproach, ScaStatus,
};
use crate::service::error::{BusinessLogicError, EntityNotFoundError, ExpiredError, ServiceError};

impl AuthorisationService {
    /// Consent behind a redirect id, as shown on the bank hosted SCA page
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_consent_by_redirect_id(
        &self,
        redirect_id: &AuthorisationId,
        instance_id: &str,
    ) -> Result<RedirectConsentDTO, ServiceError> {
        let authorisation = self
            .get_owned_authorisation(redirect_id, None, instance_id)
            .await?;

        let AuthorisationParent::Consent(consent_id) = authorisation.parent else {
            return Err(EntityNotFoundError::Authorisation(*redirect_id).into());
        };

        let consent = self
            .consent_service
            .get_consent(&consent_id, instance_id)
            .await?;
        self.throw_if_redirect_expired(
            &authorisation,
            nok_redirect_uri(authorisation.kind, &consent.tpp),
        )
        .await?;

        Ok(RedirectConsentDTO {
            authorisation,
            consent,
        })
    }

    /// Payment behind a redirect id of an initiation authorisation.
    ///
    /// Finalised authorisations are still resolved here, unlike cancellation lookups.
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_payment_by_redirect_id(
        &self,
        redirect_id: &AuthorisationId,
        instance_id: &str,
    ) -> Result<RedirectPaymentDTO, ServiceError> {
        let authorisation = self
            .get_owned_authorisation(redirect_id, None, instance_id)
            .await?;

        self.resolve_redirect_payment(authorisation, AuthorisationKind::Create, instance_id)
            .await
    }

    /// Payment behind a redirect id of a cancellation authorisation; a FINALISED
    /// cancellation can't be resolved anymore
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn get_payment_cancellation_by_redirect_id(
        &self,
        redirect_id: &AuthorisationId,
        instance_id: &str,
    ) -> Result<RedirectPaymentDTO, ServiceError> {
        let authorisation = self
            .get_owned_authorisation(redirect_id, None, instance_id)
            .await?;

        if authorisation.sca_status == ScaStatus::Finalised {
            return Err(EntityNotFoundError::Authorisation(*redirect_id).into());
        }

        self.resolve_redirect_payment(authorisation, AuthorisationKind::Cancel, instance_id)
            .await
    }

    /// Callback of the bank hosted SCA page carrying the code to verify
    #[tracing::instrument(level = "debug", skip_all, fields(redirect_id = %request.redirect_id), err(Debug))]
    pub async fn complete_redirect_authorisation(
        &self,
        request: CompleteRedirectRequestDTO,
    ) -> Result<UpdatePsuDataResponseDTO, ServiceError> {
        let authorisation = self
            .get_owned_authorisation(&request.redirect_id, None, &request.instance_id)
            .await?;
        throw_if_finalised(&authorisation)?;

        if authorisation.sca_approach != ScaApproach::Redirect {
            return Err(BusinessLogicError::InvalidScaStage {
                status: authorisation.sca_status,
                stage: "redirect completion",
            }
            .into());
        }

        let business_object = self
            .load_business_object(
                &authorisation.parent,
                authorisation.kind,
                &authorisation.instance_id,
            )
            .await?;

        self.throw_if_redirect_expired(
            &authorisation,
            nok_redirect_uri(authorisation.kind, business_object.tpp()),
        )
        .await?;
        self.throw_if_expired(&authorisation).await?;

        self.confirm_authorisation(authorisation, business_object, request.confirmation_code)
            .await
    }

    async fn resolve_redirect_payment(
        &self,
        authorisation: Authorisation,
        kind: AuthorisationKind,
        instance_id: &str,
    ) -> Result<RedirectPaymentDTO, ServiceError> {
        let AuthorisationParent::Payment(payment_id) = authorisation.parent else {
            return Err(EntityNotFoundError::Authorisation(authorisation.id).into());
        };

        if authorisation.kind != kind {
            return Err(EntityNotFoundError::Authorisation(authorisation.id).into());
        }

        let payment = self
            .payment_service
            .get_payment(&payment_id, instance_id)
            .await?;
        self.throw_if_redirect_expired(&authorisation, nok_redirect_uri(kind, &payment.tpp))
            .await?;

        Ok(RedirectPaymentDTO {
            authorisation,
            payment,
        })
    }

    /// An expired redirect fails the authorisation once and hands back the TPP's nok URI
    async fn throw_if_redirect_expired(
        &self,
        authorisation: &Authorisation,
        nok_redirect_uri: Option<String>,
    ) -> Result<(), ServiceError> {
        if !authorisation.is_redirect_expired(OffsetDateTime::now_utc()) {
            return Ok(());
        }

        if !authorisation.sca_status.is_finalised() {
            if let Err(error) = self.force_failed(authorisation).await {
                tracing::warn!(authorisation_id = %authorisation.id, "Failed to expire redirect: {error}");
            }
        }

        Err(ExpiredError::Redirect {
            authorisation_id: authorisation.id,
            nok_redirect_uri,
        }
        .into())
    }
}
