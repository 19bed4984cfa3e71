use std::collections::HashSet;

use crate::model::authorisation::Authorisation;
use crate::model::psu::PsuIdentity;

/// Compare-and-set rounds when applying an authorisation outcome to its parent
pub(crate) const OUTCOME_UPDATE_ATTEMPTS: usize = 3;

/// Whether the parent collected every signature it needs.
///
/// Each known PSU must own a successfully finished authorisation. When the bank reported
/// multilevel SCA, at least two distinct signatures are needed even if the PSU set is
/// still incomplete.
pub(crate) fn all_required_psus_authorised(
    psu_identities: &[PsuIdentity],
    authorisations: &[Authorisation],
    multilevel_reported: bool,
) -> bool {
    let authorised: Vec<&Authorisation> = authorisations
        .iter()
        .filter(|authorisation| authorisation.sca_status.is_authorised())
        .collect();

    let every_psu_signed = psu_identities.iter().all(|psu| {
        authorised
            .iter()
            .any(|authorisation| authorisation.psu_identity.as_ref() == Some(psu))
    });

    let minimum = if multilevel_reported { 2 } else { 1 };

    every_psu_signed && authorised.len() >= minimum
}

/// Multilevel SCA is only applied when enabled for the bank
pub(crate) fn multilevel_sca_needed(
    enabled: bool,
    psu_identities: &[PsuIdentity],
    multilevel_reported: bool,
) -> bool {
    let distinct_psus = psu_identities
        .iter()
        .map(|psu| psu.psu_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    enabled && (distinct_psus > 1 || multilevel_reported)
}
