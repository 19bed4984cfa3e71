use shared_types::ConsentId;
use time::Date;

use crate::model::consent::ConsentStatus;
use crate::model::psu::PsuIdentity;
use crate::model::tpp::TppIdentity;

#[derive(Clone, Debug)]
pub struct CreateConsentRequestDTO {
    pub instance_id: String,
    pub valid_until: Date,
    pub frequency_per_day: u32,
    pub recurring: bool,
    /// Global access to all accounts of the PSU
    pub one_access_type: bool,
    pub tpp: TppIdentity,
    pub psu_identity: Option<PsuIdentity>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CreateConsentResponseDTO {
    pub id: ConsentId,
    pub status: ConsentStatus,
    pub valid_until: Date,
    pub frequency_per_day: u32,
}
