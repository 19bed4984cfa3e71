use shared_types::AuthorisationId;

use crate::model::consent::{Consent, ConsentStatus};
use crate::model::payment::{Payment, TransactionStatus};
use crate::model::psu::PsuIdentity;
use crate::model::tpp::TppIdentity;

/// Request scoped data handed to every adapter call
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SpiContext {
    pub instance_id: String,
    pub authorisation_id: AuthorisationId,
    pub psu_identity: Option<PsuIdentity>,
    pub tpp: TppIdentity,
}

/// Snapshot of the consent or payment being authorised
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BusinessObject {
    Consent(Consent),
    Payment(Payment),
}

impl BusinessObject {
    pub fn tpp(&self) -> &TppIdentity {
        match self {
            Self::Consent(consent) => &consent.tpp,
            Self::Payment(payment) => &payment.tpp,
        }
    }

    pub fn psu_identities(&self) -> &[PsuIdentity] {
        match self {
            Self::Consent(consent) => &consent.psu_identities,
            Self::Payment(payment) => &payment.psu_identities,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PsuAuthorisationResult {
    /// The bank decided no second factor is needed
    pub sca_exempted: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScaMethod {
    pub method_id: String,
    pub r#type: String,
    pub name: String,
    pub decoupled: bool,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ChallengeData {
    pub data: Option<String>,
    pub additional_information: Option<String>,
    pub code_length: Option<u32>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorisationCodeResult {
    pub selected_method: ScaMethod,
    pub challenge_data: Option<ChallengeData>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecoupledScaResult {
    pub psu_message: String,
}

/// Status of the business object as determined by the bank after a successful SCA
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScaOutcomeStatus {
    Consent(ConsentStatus),
    Transaction(TransactionStatus),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScaVerificationResult {
    pub status: ScaOutcomeStatus,
    pub multilevel_sca_required: bool,
}
