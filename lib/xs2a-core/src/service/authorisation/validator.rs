use time::OffsetDateTime;

use crate::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaApproach,
};
use crate::model::psu::PsuIdentity;
use crate::provider::banking_adapter::model::{BusinessObject, ScaOutcomeStatus};
use crate::service::error::{BusinessLogicError, EntityNotFoundError, ServiceError, ValidationError};

/// Authorisations are only visible within their instance and under their own parent
pub(super) fn throw_if_not_owned(
    authorisation: &Authorisation,
    parent: Option<&AuthorisationParent>,
    instance_id: &str,
) -> Result<(), ServiceError> {
    let foreign_parent = parent.is_some_and(|parent| *parent != authorisation.parent);

    if authorisation.instance_id != instance_id || foreign_parent {
        return Err(EntityNotFoundError::Authorisation(authorisation.id).into());
    }

    Ok(())
}

pub(super) fn throw_if_finalised(authorisation: &Authorisation) -> Result<(), ServiceError> {
    if authorisation.sca_status.is_finalised() {
        return Err(BusinessLogicError::AuthorisationFinalised {
            authorisation_id: authorisation.id,
            status: authorisation.sca_status,
        }
        .into());
    }

    Ok(())
}

/// Expired but not yet marked FAILED, a redirect authorisation also dies with its redirect URL
pub(super) fn needs_forced_expiry(authorisation: &Authorisation, now: OffsetDateTime) -> bool {
    let expired = authorisation.is_expired(now)
        || (authorisation.sca_approach == ScaApproach::Redirect
            && authorisation.is_redirect_expired(now));

    !authorisation.sca_status.is_finalised() && expired
}

/// A PSU must be complete and, once assigned, can't be swapped for another one
pub(super) fn validate_psu_identity(
    authorisation: &Authorisation,
    psu_identity: &PsuIdentity,
) -> Result<(), ServiceError> {
    if !psu_identity.is_complete() {
        return Err(ValidationError::MissingPsuIdentity.into());
    }

    match &authorisation.psu_identity {
        Some(assigned) if assigned != psu_identity => {
            Err(ValidationError::PsuIdentityMismatch.into())
        }
        _ => Ok(()),
    }
}

/// Every PSU signs a resource at most once
pub(super) fn throw_if_psu_already_authorised(
    authorisations: &[Authorisation],
    psu_identity: &PsuIdentity,
) -> Result<(), ServiceError> {
    let already_authorised = authorisations.iter().any(|authorisation| {
        authorisation.sca_status.is_authorised()
            && authorisation.psu_identity.as_ref() == Some(psu_identity)
    });

    if already_authorised {
        return Err(BusinessLogicError::PsuAlreadyAuthorised.into());
    }

    Ok(())
}

/// A resource is never finalised without knowing who signed it
pub(super) fn throw_if_no_signing_psu(
    authorisation: &Authorisation,
    business_object: &BusinessObject,
) -> Result<(), ServiceError> {
    if authorisation.psu_identity.is_none() && business_object.psu_identities().is_empty() {
        return Err(ValidationError::MissingPsuIdentity.into());
    }

    Ok(())
}

/// The bank must report a status of the kind of resource being authorised
pub(super) fn outcome_fits_parent(
    kind: AuthorisationKind,
    parent: &AuthorisationParent,
    status: &ScaOutcomeStatus,
) -> bool {
    match (kind, parent, status) {
        (AuthorisationKind::Cancel, AuthorisationParent::Payment(_), _) => true,
        (AuthorisationKind::Create, AuthorisationParent::Consent(_), ScaOutcomeStatus::Consent(_)) => {
            true
        }
        (
            AuthorisationKind::Create,
            AuthorisationParent::Payment(_),
            ScaOutcomeStatus::Transaction(_),
        ) => true,
        _ => false,
    }
}
