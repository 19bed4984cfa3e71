use shared_types::{AuthorisationId, ConsentId, PaymentId};
use strum::{Display, EnumString};
use time::OffsetDateTime;

use super::psu::PsuIdentity;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Authorisation {
    pub id: AuthorisationId,
    pub kind: AuthorisationKind,
    pub parent: AuthorisationParent,
    pub instance_id: String,
    pub sca_status: ScaStatus,
    pub sca_approach: ScaApproach,
    pub psu_identity: Option<PsuIdentity>,
    pub chosen_sca_method: Option<String>,
    pub redirect_url_expiration_timestamp: OffsetDateTime,
    pub authorisation_expiration_timestamp: OffsetDateTime,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
}

impl Authorisation {
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        self.authorisation_expiration_timestamp <= now
    }

    pub fn is_redirect_expired(&self, now: OffsetDateTime) -> bool {
        self.redirect_url_expiration_timestamp <= now
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthorisationKind {
    Create,
    Cancel,
}

/// Owning consent or payment, referenced by external id only
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AuthorisationParent {
    Consent(ConsentId),
    Payment(PaymentId),
}

impl std::fmt::Display for AuthorisationParent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consent(id) => write!(f, "consent {id}"),
            Self::Payment(id) => write!(f, "payment {id}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaStatus {
    Received,
    PsuIdentified,
    PsuAuthenticated,
    ScaMethodSelected,
    Started,
    Finalised,
    Failed,
    Exempted,
}

impl ScaStatus {
    pub fn is_finalised(&self) -> bool {
        matches!(self, Self::Finalised | Self::Failed | Self::Exempted)
    }

    /// Terminal statuses that count as a successful authorisation
    pub fn is_authorised(&self) -> bool {
        matches!(self, Self::Finalised | Self::Exempted)
    }

    fn order(&self) -> u8 {
        match self {
            Self::Received => 0,
            Self::PsuIdentified => 1,
            Self::PsuAuthenticated => 2,
            Self::ScaMethodSelected => 3,
            Self::Started => 4,
            Self::Finalised | Self::Failed | Self::Exempted => 5,
        }
    }

    /// Forward-only: terminal statuses never change, FAILED is reachable from any
    /// non-terminal status, everything else must move strictly forward.
    pub fn can_transition_to(&self, next: ScaStatus) -> bool {
        if self.is_finalised() {
            return false;
        }

        next == Self::Failed || next.order() > self.order()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaApproach {
    Embedded,
    Decoupled,
    Redirect,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateAuthorisationRequest {
    pub sca_status: Option<ScaStatus>,
    pub psu_identity: Option<PsuIdentity>,
    pub chosen_sca_method: Option<String>,
}
