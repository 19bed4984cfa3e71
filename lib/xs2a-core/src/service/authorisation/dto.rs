use secrecy::SecretString;
use shared_types::AuthorisationId;
use time::OffsetDateTime;

use crate::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaApproach, ScaStatus,
};
use crate::model::consent::Consent;
use crate::model::payment::Payment;
use crate::model::psu::PsuIdentity;
use crate::provider::banking_adapter::model::{ChallengeData, ScaMethod};

#[derive(Clone, Debug)]
pub struct StartAuthorisationRequestDTO {
    pub parent: AuthorisationParent,
    pub instance_id: String,
    pub kind: AuthorisationKind,
    /// Falls back to the bank's preferred approach
    pub sca_approach: Option<ScaApproach>,
    pub psu_identity: Option<PsuIdentity>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StartAuthorisationResponseDTO {
    pub authorisation_id: AuthorisationId,
    pub sca_status: ScaStatus,
    pub sca_approach: ScaApproach,
    /// Correlation id of the bank hosted SCA page, redirect approach only
    pub redirect_id: Option<AuthorisationId>,
    pub redirect_url_expiration_timestamp: OffsetDateTime,
}

/// PSU input of one SCA step
#[derive(Debug)]
pub enum ScaStageInput {
    PsuIdentification {
        psu_identity: PsuIdentity,
    },
    PsuAuthentication {
        psu_identity: PsuIdentity,
        password: SecretString,
    },
    ScaMethodSelection {
        method_id: String,
    },
    TransactionAuthorisation {
        confirmation_code: SecretString,
    },
}

impl ScaStageInput {
    pub fn stage_name(&self) -> &'static str {
        match self {
            Self::PsuIdentification { .. } => "PSU identification",
            Self::PsuAuthentication { .. } => "PSU authentication",
            Self::ScaMethodSelection { .. } => "SCA method selection",
            Self::TransactionAuthorisation { .. } => "transaction authorisation",
        }
    }
}

#[derive(Debug)]
pub struct UpdatePsuDataRequestDTO {
    pub authorisation_id: AuthorisationId,
    pub parent: AuthorisationParent,
    pub instance_id: String,
    pub input: ScaStageInput,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UpdatePsuDataResponseDTO {
    pub authorisation_id: AuthorisationId,
    pub sca_status: ScaStatus,
    /// Filled when the PSU has to pick one of several methods
    pub available_sca_methods: Vec<ScaMethod>,
    pub chosen_sca_method: Option<ScaMethod>,
    pub challenge_data: Option<ChallengeData>,
    /// Shown to the PSU while a decoupled SCA is running
    pub psu_message: Option<String>,
}

#[derive(Debug)]
pub struct CompleteRedirectRequestDTO {
    pub redirect_id: AuthorisationId,
    pub instance_id: String,
    pub confirmation_code: SecretString,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedirectConsentDTO {
    pub authorisation: Authorisation,
    pub consent: Consent,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RedirectPaymentDTO {
    pub authorisation: Authorisation,
    pub payment: Payment,
}
