use shared_types::ConsentId;
use strum::Display;
use time::{Date, OffsetDateTime};

use super::psu::PsuIdentity;
use super::tpp::TppIdentity;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Consent {
    pub id: ConsentId,
    pub instance_id: String,
    pub status: ConsentStatus,
    pub valid_until: Date,
    pub created_date: OffsetDateTime,
    pub last_modified: OffsetDateTime,
    pub frequency_per_day: u32,
    pub recurring: bool,
    pub one_access_type: bool,
    pub multilevel_sca_required: bool,
    pub tpp: TppIdentity,
    pub psu_identities: Vec<PsuIdentity>,
    pub usages: Vec<ConsentUsage>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ConsentStatus {
    Received,
    PartiallyAuthorised,
    Valid,
    Rejected,
    RevokedByPsu,
    Expired,
    TerminatedByTpp,
}

impl ConsentStatus {
    pub fn is_finalised(&self) -> bool {
        matches!(
            self,
            Self::Rejected | Self::RevokedByPsu | Self::Expired | Self::TerminatedByTpp
        )
    }
}

/// One successful data access made under the consent
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConsentUsage {
    pub usage_date: Date,
    pub resource_uri: String,
    pub created_date: OffsetDateTime,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateConsentRequest {
    pub status: Option<ConsentStatus>,
    pub multilevel_sca_required: Option<bool>,
    /// Only update while the stored status is still this one
    pub expected_status: Option<ConsentStatus>,
}

/// Consents eligible for termination when a new consent becomes valid
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OldConsentsQuery {
    pub psu_ids: Vec<String>,
    pub tpp_authorisation_number: String,
    pub tpp_authority_id: String,
    pub instance_id: String,
    pub statuses: Vec<ConsentStatus>,
    pub exclude: ConsentId,
}
