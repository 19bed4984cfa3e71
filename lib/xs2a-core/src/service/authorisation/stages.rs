use secrecy::SecretString;

use super::AuthorisationService;
use super::dto::UpdatePsuDataResponseDTO;
use super::mapper::spi_context;
use super::validator::{
    outcome_fits_parent, throw_if_no_signing_psu, throw_if_psu_already_authorised,
    validate_psu_identity,
};
use crate::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaApproach, ScaStatus,
    UpdateAuthorisationRequest,
};
use crate::model::consent::ConsentStatus;
use crate::model::payment::TransactionStatus;
use crate::model::psu::PsuIdentity;
use crate::provider::banking_adapter::DecoupledSca;
use crate::provider::banking_adapter::error::BankingAdapterError;
use crate::provider::banking_adapter::model::{
    BusinessObject, ScaMethod, ScaOutcomeStatus, ScaVerificationResult,
};
use crate::service::error::{ServiceError, ValidationError};

/// Successful end of an authorisation
enum ScaSuccess {
    Exempted,
    Verified(ScaVerificationResult),
}

impl AuthorisationService {
    pub(super) async fn identify_psu(
        &self,
        authorisation: Authorisation,
        business_object: BusinessObject,
        psu_identity: PsuIdentity,
    ) -> Result<UpdatePsuDataResponseDTO, ServiceError> {
        validate_psu_identity(&authorisation, &psu_identity)?;
        self.throw_if_psu_signed_before(&authorisation, &psu_identity)
            .await?;

        self.merge_psu_identity(&authorisation.parent, &business_object, &psu_identity)
            .await?;
        self.advance(
            &authorisation,
            ScaStatus::PsuIdentified,
            UpdateAuthorisationRequest {
                psu_identity: Some(psu_identity),
                ..Default::default()
            },
        )
        .await?;

        Ok(UpdatePsuDataResponseDTO::new(
            authorisation.id,
            ScaStatus::PsuIdentified,
        ))
    }

    /// Received stage: PSU login, then SCA method lookup
    pub(super) async fn authenticate_psu(
        &self,
        mut authorisation: Authorisation,
        business_object: BusinessObject,
        psu_identity: PsuIdentity,
        password: SecretString,
    ) -> Result<UpdatePsuDataResponseDTO, ServiceError> {
        validate_psu_identity(&authorisation, &psu_identity)?;
        self.throw_if_psu_signed_before(&authorisation, &psu_identity)
            .await?;

        let context = spi_context(&authorisation, Some(&psu_identity), &business_object);
        let vault = self.vault_handle(&authorisation);

        let result = match self
            .call_adapter(self.banking_adapter.authorise_psu(
                &context,
                &psu_identity,
                &password,
                &business_object,
                &vault,
            ))
            .await
        {
            Ok(result) => result,
            Err(error) => return Err(self.fail_sca(&authorisation, error).await),
        };

        self.merge_psu_identity(&authorisation.parent, &business_object, &psu_identity)
            .await?;

        if result.sca_exempted {
            self.advance(
                &authorisation,
                ScaStatus::Exempted,
                UpdateAuthorisationRequest {
                    psu_identity: Some(psu_identity),
                    ..Default::default()
                },
            )
            .await?;
            self.apply_parent_outcome(&authorisation, ScaSuccess::Exempted)
                .await?;

            return Ok(UpdatePsuDataResponseDTO::new(
                authorisation.id,
                ScaStatus::Exempted,
            ));
        }

        let methods = match self
            .call_adapter(self.banking_adapter.request_available_sca_methods(
                &context,
                &business_object,
                &vault,
            ))
            .await
        {
            Ok(methods) if methods.is_empty() => {
                let error = BankingAdapterError::failure("No SCA method available");
                return Err(self.fail_sca(&authorisation, error).await);
            }
            Ok(methods) => methods,
            Err(error) => return Err(self.fail_sca(&authorisation, error).await),
        };

        self.advance(
            &authorisation,
            ScaStatus::PsuAuthenticated,
            UpdateAuthorisationRequest {
                psu_identity: Some(psu_identity.to_owned()),
                ..Default::default()
            },
        )
        .await?;
        authorisation.sca_status = ScaStatus::PsuAuthenticated;
        authorisation.psu_identity = Some(psu_identity);

        match <[ScaMethod; 1]>::try_from(methods) {
            Ok([method]) => {
                self.start_sca_method(authorisation, business_object, method)
                    .await
            }
            Err(methods) => Ok(UpdatePsuDataResponseDTO {
                available_sca_methods: methods,
                ..UpdatePsuDataResponseDTO::new(authorisation.id, ScaStatus::PsuAuthenticated)
            }),
        }
    }

    /// Method-selection stage with the PSU's choice out of several methods
    pub(super) async fn select_sca_method(
        &self,
        authorisation: Authorisation,
        business_object: BusinessObject,
        method_id: String,
    ) -> Result<UpdatePsuDataResponseDTO, ServiceError> {
        let context = spi_context(
            &authorisation,
            authorisation.psu_identity.as_ref(),
            &business_object,
        );
        let vault = self.vault_handle(&authorisation);

        let methods = match self
            .call_adapter(self.banking_adapter.request_available_sca_methods(
                &context,
                &business_object,
                &vault,
            ))
            .await
        {
            Ok(methods) => methods,
            Err(error) => return Err(self.fail_sca(&authorisation, error).await),
        };

        let Some(method) = methods
            .into_iter()
            .find(|method| method.method_id == method_id)
        else {
            return Err(ValidationError::UnknownScaMethod(method_id).into());
        };

        self.start_sca_method(authorisation, business_object, method)
            .await
    }

    /// Method-selected stage: either hands over to the bank's decoupled channel or asks
    /// the bank for a challenge
    async fn start_sca_method(
        &self,
        authorisation: Authorisation,
        business_object: BusinessObject,
        method: ScaMethod,
    ) -> Result<UpdatePsuDataResponseDTO, ServiceError> {
        let context = spi_context(
            &authorisation,
            authorisation.psu_identity.as_ref(),
            &business_object,
        );
        let vault = self.vault_handle(&authorisation);

        if method.decoupled || authorisation.sca_approach == ScaApproach::Decoupled {
            let handler = match self.banking_adapter.decoupled_sca() {
                DecoupledSca::Supported(handler) => handler,
                DecoupledSca::Unsupported => {
                    return Err(self
                        .fail_sca(&authorisation, BankingAdapterError::NotSupported)
                        .await);
                }
            };

            let result = match self
                .call_adapter(handler.start_sca_decoupled(
                    &context,
                    &authorisation.id,
                    &Some(method.method_id.to_owned()),
                    &business_object,
                    &vault,
                ))
                .await
            {
                Ok(result) => result,
                Err(error) => return Err(self.fail_sca(&authorisation, error).await),
            };

            self.advance(
                &authorisation,
                ScaStatus::Started,
                UpdateAuthorisationRequest {
                    chosen_sca_method: Some(method.method_id.to_owned()),
                    ..Default::default()
                },
            )
            .await?;

            return Ok(UpdatePsuDataResponseDTO {
                chosen_sca_method: Some(method),
                psu_message: Some(result.psu_message),
                ..UpdatePsuDataResponseDTO::new(authorisation.id, ScaStatus::Started)
            });
        }

        let result = match self
            .call_adapter(self.banking_adapter.request_authorisation_code(
                &context,
                &method.method_id,
                &business_object,
                &vault,
            ))
            .await
        {
            Ok(result) => result,
            Err(error) => return Err(self.fail_sca(&authorisation, error).await),
        };

        self.advance(
            &authorisation,
            ScaStatus::ScaMethodSelected,
            UpdateAuthorisationRequest {
                chosen_sca_method: Some(result.selected_method.method_id.to_owned()),
                ..Default::default()
            },
        )
        .await?;

        Ok(UpdatePsuDataResponseDTO {
            chosen_sca_method: Some(result.selected_method),
            challenge_data: result.challenge_data,
            ..UpdatePsuDataResponseDTO::new(authorisation.id, ScaStatus::ScaMethodSelected)
        })
    }

    /// Confirmation stage; the parent is only touched after a successful verification
    pub(super) async fn confirm_authorisation(
        &self,
        authorisation: Authorisation,
        business_object: BusinessObject,
        confirmation_code: SecretString,
    ) -> Result<UpdatePsuDataResponseDTO, ServiceError> {
        throw_if_no_signing_psu(&authorisation, &business_object)?;

        let context = spi_context(
            &authorisation,
            authorisation.psu_identity.as_ref(),
            &business_object,
        );
        let vault = self.vault_handle(&authorisation);

        let result = match self
            .call_adapter(self.banking_adapter.verify_sca_authorisation(
                &context,
                &confirmation_code,
                &business_object,
                &vault,
            ))
            .await
        {
            Ok(result) => result,
            Err(error) => return Err(self.fail_sca(&authorisation, error).await),
        };

        if !outcome_fits_parent(authorisation.kind, &authorisation.parent, &result.status) {
            let error =
                BankingAdapterError::failure(format!("Unexpected SCA outcome {:?}", result.status));
            return Err(self.fail_sca(&authorisation, error).await);
        }

        // a concurrent confirmation loses here, before the parent is touched
        self.advance(&authorisation, ScaStatus::Finalised, Default::default())
            .await?;
        self.apply_parent_outcome(&authorisation, ScaSuccess::Verified(result))
            .await?;

        Ok(UpdatePsuDataResponseDTO::new(
            authorisation.id,
            ScaStatus::Finalised,
        ))
    }

    /// Only checked when a PSU gets assigned to the authorisation
    async fn throw_if_psu_signed_before(
        &self,
        authorisation: &Authorisation,
        psu_identity: &PsuIdentity,
    ) -> Result<(), ServiceError> {
        if authorisation.psu_identity.is_some() {
            return Ok(());
        }

        let authorisations = self
            .authorisation_repository
            .get_authorisations_by_parent(&authorisation.parent, authorisation.kind)
            .await?;

        throw_if_psu_already_authorised(&authorisations, psu_identity)
    }

    /// Runs after the authorisation reached its terminal status. The authorisation stays
    /// terminal when the parent update fails, such a failure is logged and returned.
    async fn apply_parent_outcome(
        &self,
        authorisation: &Authorisation,
        success: ScaSuccess,
    ) -> Result<(), ServiceError> {
        let result = self.update_parent(authorisation, success).await;

        if let Err(error) = &result {
            tracing::error!(
                authorisation_id = %authorisation.id,
                parent = %authorisation.parent,
                "Authorisation is terminal but its outcome was not applied: {error}"
            );
        }

        result
    }

    async fn update_parent(
        &self,
        authorisation: &Authorisation,
        success: ScaSuccess,
    ) -> Result<(), ServiceError> {
        match (authorisation.kind, authorisation.parent, success) {
            (AuthorisationKind::Cancel, AuthorisationParent::Payment(id), _) => {
                self.payment_service.apply_cancellation_outcome(&id).await?;
            }
            (_, AuthorisationParent::Consent(id), ScaSuccess::Exempted) => {
                self.consent_service
                    .apply_authorisation_outcome(&id, ConsentStatus::Valid, false)
                    .await?;
            }
            (
                _,
                AuthorisationParent::Consent(id),
                ScaSuccess::Verified(ScaVerificationResult {
                    status: ScaOutcomeStatus::Consent(status),
                    multilevel_sca_required,
                }),
            ) => {
                self.consent_service
                    .apply_authorisation_outcome(&id, status, multilevel_sca_required)
                    .await?;
            }
            (_, AuthorisationParent::Payment(id), ScaSuccess::Exempted) => {
                self.payment_service
                    .apply_authorisation_outcome(
                        &id,
                        TransactionStatus::AcceptedCustomerProfile,
                        false,
                    )
                    .await?;
            }
            (
                _,
                AuthorisationParent::Payment(id),
                ScaSuccess::Verified(ScaVerificationResult {
                    status: ScaOutcomeStatus::Transaction(status),
                    multilevel_sca_required,
                }),
            ) => {
                self.payment_service
                    .apply_authorisation_outcome(&id, status, multilevel_sca_required)
                    .await?;
            }
            (_, parent, ScaSuccess::Verified(result)) => {
                return Err(ServiceError::MappingError(format!(
                    "SCA outcome {:?} does not fit {parent}",
                    result.status
                )));
            }
        }

        Ok(())
    }
}
