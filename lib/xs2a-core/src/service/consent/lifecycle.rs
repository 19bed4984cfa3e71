use std::collections::HashSet;

use shared_types::ConsentId;

use super::ConsentService;
use super::validator::validate_termination_source;
use crate::model::authorisation::{AuthorisationKind, AuthorisationParent};
use crate::model::consent::{Consent, ConsentStatus, OldConsentsQuery, UpdateConsentRequest};
use crate::model::psu::PsuIdentity;
use crate::repository::error::DataLayerError;
use crate::service::common_validator::{
    OUTCOME_UPDATE_ATTEMPTS, all_required_psus_authorised, multilevel_sca_needed,
};
use crate::service::error::{BusinessLogicError, EntityNotFoundError, ServiceError};

const ACTIVE_STATUSES: [ConsentStatus; 3] = [
    ConsentStatus::Received,
    ConsentStatus::PartiallyAuthorised,
    ConsentStatus::Valid,
];

impl ConsentService {
    /// Updates the consent after one of its authorisations succeeded.
    ///
    /// A status other than VALID reported by the bank is taken over as is. A VALID consent
    /// stays PARTIALLY_AUTHORISED until every required PSU signed. Once VALID, older consents
    /// of the same PSUs and TPP are terminated.
    ///
    /// The new status is written only if the consent still has the status it was computed
    /// from, otherwise it is recomputed from a fresh read.
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub(crate) async fn apply_authorisation_outcome(
        &self,
        id: &ConsentId,
        reported_status: ConsentStatus,
        multilevel_reported: bool,
    ) -> Result<ConsentStatus, ServiceError> {
        for _ in 0..OUTCOME_UPDATE_ATTEMPTS {
            let consent = self
                .consent_repository
                .get_consent(id)
                .await?
                .ok_or(EntityNotFoundError::Consent(*id))?;

            if reported_status != ConsentStatus::Valid {
                self.set_status(&consent, reported_status).await?;
                return Ok(reported_status);
            }

            let Some(new_status) = self
                .try_apply_valid_outcome(&consent, multilevel_reported)
                .await?
            else {
                tracing::debug!(consent_id = %id, "Consent changed concurrently, recomputing outcome");
                continue;
            };

            if new_status == ConsentStatus::Valid {
                if let Err(error) = self.terminate_old_consents(id).await {
                    tracing::warn!(consent_id = %id, "Failed to terminate old consents: {error}");
                }
            }

            return Ok(new_status);
        }

        Err(BusinessLogicError::ConcurrentConsentModification(*id).into())
    }

    /// `None` if the stored status moved on since `consent` was read
    async fn try_apply_valid_outcome(
        &self,
        consent: &Consent,
        multilevel_reported: bool,
    ) -> Result<Option<ConsentStatus>, ServiceError> {
        let multilevel = multilevel_sca_needed(
            self.config.sca.multilevel_sca_enabled,
            &consent.psu_identities,
            multilevel_reported,
        );

        // a VALID consent is never downgraded
        let new_status = if multilevel && consent.status != ConsentStatus::Valid {
            let authorisations = self
                .authorisation_repository
                .get_authorisations_by_parent(
                    &AuthorisationParent::Consent(consent.id),
                    AuthorisationKind::Create,
                )
                .await?;

            if all_required_psus_authorised(
                &consent.psu_identities,
                &authorisations,
                multilevel_reported,
            ) {
                ConsentStatus::Valid
            } else {
                ConsentStatus::PartiallyAuthorised
            }
        } else {
            ConsentStatus::Valid
        };

        let multilevel_flag_changed = multilevel && !consent.multilevel_sca_required;
        if !multilevel_flag_changed && new_status == consent.status {
            return Ok(Some(new_status));
        }

        let result = self
            .consent_repository
            .update_consent(
                &consent.id,
                UpdateConsentRequest {
                    status: Some(new_status),
                    multilevel_sca_required: multilevel_flag_changed.then_some(true),
                    expected_status: Some(consent.status),
                },
            )
            .await;

        match result {
            Ok(()) => {}
            Err(DataLayerError::RecordNotUpdated) => return Ok(None),
            Err(error) => return Err(error.into()),
        }

        tracing::info!(consent_id = %consent.id, from = %consent.status, to = %new_status, multilevel, "Consent authorisation applied");
        Ok(Some(new_status))
    }

    /// Terminates active consents of the same PSU set, TPP and instance.
    ///
    /// Returns `true` if at least one consent was terminated. Consents with global access
    /// never terminate others.
    #[tracing::instrument(level = "debug", skip(self), err(Debug))]
    pub async fn terminate_old_consents(&self, new_consent_id: &ConsentId) -> Result<bool, ServiceError> {
        let consent = self
            .consent_repository
            .get_consent(new_consent_id)
            .await?
            .ok_or(EntityNotFoundError::Consent(*new_consent_id))?;

        validate_termination_source(&consent)?;

        if consent.one_access_type {
            return Ok(false);
        }

        let query = OldConsentsQuery {
            psu_ids: consent
                .psu_identities
                .iter()
                .map(|psu| psu.psu_id.to_owned())
                .collect(),
            tpp_authorisation_number: consent.tpp.authorisation_number.to_owned(),
            tpp_authority_id: consent.tpp.authority_id.to_owned(),
            instance_id: consent.instance_id.to_owned(),
            statuses: ACTIVE_STATUSES.to_vec(),
            exclude: consent.id,
        };

        let psu_set: HashSet<&PsuIdentity> = consent.psu_identities.iter().collect();

        let old_consents: Vec<_> = self
            .consent_repository
            .get_old_consents(query)
            .await?
            .into_iter()
            .filter(|old| old.psu_identities.iter().collect::<HashSet<_>>() == psu_set)
            .collect();

        for old in &old_consents {
            self.set_status(old, ConsentStatus::TerminatedByTpp).await?;
        }

        if !old_consents.is_empty() {
            tracing::info!(consent_id = %new_consent_id, terminated = old_consents.len(), "Old consents terminated");
        }

        Ok(!old_consents.is_empty())
    }
}
