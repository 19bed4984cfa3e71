use sea_orm::DatabaseConnection;
use shared_types::{AuthorisationId, ConsentId};
use time::Duration;
use xs2a_core::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaApproach, ScaStatus,
    UpdateAuthorisationRequest,
};
use xs2a_core::model::psu::PsuIdentity;
use xs2a_core::repository::authorisation_repository::AuthorisationRepository;
use xs2a_core::repository::error::DataLayerError;

use super::AuthorisationProvider;
use crate::entity::{consent, payment};
use crate::test_utilities::*;

struct TestSetup {
    pub db: DatabaseConnection,
    pub repository: Box<dyn AuthorisationRepository>,
}

async fn setup() -> TestSetup {
    let data_layer = setup_test_data_layer_and_connection().await;
    let db = data_layer.db;

    TestSetup {
        repository: Box::new(AuthorisationProvider { db: db.clone() }),
        db,
    }
}

fn dummy_authorisation(parent: AuthorisationParent, kind: AuthorisationKind) -> Authorisation {
    Authorisation {
        id: AuthorisationId::new_v4(),
        kind,
        parent,
        instance_id: DUMMY_INSTANCE.to_owned(),
        sca_status: ScaStatus::Received,
        sca_approach: ScaApproach::Embedded,
        psu_identity: None,
        chosen_sca_method: None,
        redirect_url_expiration_timestamp: get_dummy_date() + Duration::minutes(5),
        authorisation_expiration_timestamp: get_dummy_date() + Duration::minutes(15),
        created_date: get_dummy_date(),
        last_modified: get_dummy_date(),
    }
}

#[tokio::test]
async fn test_create_and_get_authorisation() {
    let TestSetup { repository, db } = setup().await;

    let consent_id = insert_consent(&db, consent::ConsentStatus::Received, &["psu-1"])
        .await
        .unwrap();

    let mut request = dummy_authorisation(
        AuthorisationParent::Consent(consent_id),
        AuthorisationKind::Create,
    );
    request.psu_identity = Some(PsuIdentity::new("psu-1"));

    let id = repository.create_authorisation(request.clone()).await.unwrap();

    let authorisation = repository.get_authorisation(&id).await.unwrap().unwrap();
    assert_eq!(authorisation, request);
}

#[tokio::test]
async fn test_create_authorisation_unknown_parent() {
    let TestSetup { repository, .. } = setup().await;

    let result = repository
        .create_authorisation(dummy_authorisation(
            AuthorisationParent::Consent(ConsentId::new_v4()),
            AuthorisationKind::Create,
        ))
        .await;
    assert!(matches!(result, Err(DataLayerError::IncorrectParameters)));
}

#[tokio::test]
async fn test_get_authorisations_by_parent_filters_kind() {
    let TestSetup { repository, db } = setup().await;

    let payment_id = insert_payment(&db, payment::TransactionStatus::AcceptedTechnicalValidation)
        .await
        .unwrap();
    let parent = AuthorisationParent::Payment(payment_id);

    let create = dummy_authorisation(parent, AuthorisationKind::Create);
    let mut cancel_1 = dummy_authorisation(parent, AuthorisationKind::Cancel);
    cancel_1.sca_approach = ScaApproach::Redirect;
    let mut cancel_2 = dummy_authorisation(parent, AuthorisationKind::Cancel);
    cancel_2.created_date = get_dummy_date() + Duration::seconds(1);

    for request in [&create, &cancel_2, &cancel_1] {
        repository.create_authorisation(request.clone()).await.unwrap();
    }

    let result = repository
        .get_authorisations_by_parent(&parent, AuthorisationKind::Cancel)
        .await
        .unwrap();
    assert_eq!(result, vec![cancel_1, cancel_2]);

    let unknown = repository
        .get_authorisations_by_parent(
            &AuthorisationParent::Consent(ConsentId::new_v4()),
            AuthorisationKind::Create,
        )
        .await
        .unwrap();
    assert!(unknown.is_empty());
}

#[tokio::test]
async fn test_update_authorisation() {
    let TestSetup { repository, db } = setup().await;

    let consent_id = insert_consent(&db, consent::ConsentStatus::Received, &[])
        .await
        .unwrap();
    let id = repository
        .create_authorisation(dummy_authorisation(
            AuthorisationParent::Consent(consent_id),
            AuthorisationKind::Create,
        ))
        .await
        .unwrap();

    repository
        .update_authorisation(
            &id,
            ScaStatus::Received,
            UpdateAuthorisationRequest {
                sca_status: Some(ScaStatus::ScaMethodSelected),
                psu_identity: Some(PsuIdentity::new("psu-1")),
                chosen_sca_method: Some("SMS_OTP".to_owned()),
            },
        )
        .await
        .unwrap();

    let authorisation = repository.get_authorisation(&id).await.unwrap().unwrap();
    assert_eq!(authorisation.sca_status, ScaStatus::ScaMethodSelected);
    assert_eq!(authorisation.psu_identity, Some(PsuIdentity::new("psu-1")));
    assert_eq!(authorisation.chosen_sca_method.as_deref(), Some("SMS_OTP"));

    // untouched fields keep their value
    repository
        .update_authorisation(
            &id,
            ScaStatus::ScaMethodSelected,
            UpdateAuthorisationRequest {
                sca_status: Some(ScaStatus::Finalised),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let authorisation = repository.get_authorisation(&id).await.unwrap().unwrap();
    assert_eq!(authorisation.sca_status, ScaStatus::Finalised);
    assert_eq!(authorisation.chosen_sca_method.as_deref(), Some("SMS_OTP"));
}

#[tokio::test]
async fn test_update_authorisation_status_conflict() {
    let TestSetup { repository, db } = setup().await;

    let consent_id = insert_consent(&db, consent::ConsentStatus::Received, &[])
        .await
        .unwrap();
    let id = repository
        .create_authorisation(dummy_authorisation(
            AuthorisationParent::Consent(consent_id),
            AuthorisationKind::Create,
        ))
        .await
        .unwrap();

    let finalise = UpdateAuthorisationRequest {
        sca_status: Some(ScaStatus::Finalised),
        ..Default::default()
    };
    let fail = UpdateAuthorisationRequest {
        sca_status: Some(ScaStatus::Failed),
        ..Default::default()
    };

    repository
        .update_authorisation(&id, ScaStatus::Received, finalise)
        .await
        .unwrap();

    let result = repository
        .update_authorisation(&id, ScaStatus::Received, fail)
        .await;
    assert!(matches!(result, Err(DataLayerError::RecordNotUpdated)));

    let authorisation = repository.get_authorisation(&id).await.unwrap().unwrap();
    assert_eq!(authorisation.sca_status, ScaStatus::Finalised);
}

#[tokio::test]
async fn test_update_authorisation_missing() {
    let TestSetup { repository, .. } = setup().await;

    let result = repository
        .update_authorisation(
            &AuthorisationId::new_v4(),
            ScaStatus::Received,
            UpdateAuthorisationRequest::default(),
        )
        .await;
    assert!(matches!(result, Err(DataLayerError::RecordNotUpdated)));
}
