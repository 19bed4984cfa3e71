use std::sync::Arc;

use mockall::predicate::*;
use rstest::rstest;
use similar_asserts::assert_eq;
use time::macros::date;
use time::{Duration, OffsetDateTime};

use super::ConsentService;
use super::dto::CreateConsentRequestDTO;
use super::mapper::adjust_valid_until;
use crate::config::core_config::CoreConfig;
use crate::error::ErrorKind;
use crate::model::authorisation::{AuthorisationKind, AuthorisationParent};
use crate::model::consent::{Consent, ConsentStatus, ConsentUsage, UpdateConsentRequest};
use crate::model::psu::PsuIdentity;
use crate::repository::authorisation_repository::MockAuthorisationRepository;
use crate::repository::consent_repository::MockConsentRepository;
use crate::repository::error::DataLayerError;
use crate::service::error::{BusinessLogicError, EntityNotFoundError, ServiceError};
use crate::service::test_utilities::*;

fn setup_service(
    consent_repository: MockConsentRepository,
    authorisation_repository: MockAuthorisationRepository,
    config: CoreConfig,
) -> ConsentService {
    ConsentService::new(
        Arc::new(consent_repository),
        Arc::new(authorisation_repository),
        Arc::new(config),
    )
}

fn repository_returning(consent: Consent) -> MockConsentRepository {
    let mut repository = MockConsentRepository::default();
    repository
        .expect_get_consent()
        .with(eq(consent.id))
        .returning(move |_| Ok(Some(consent.clone())));
    repository
}

fn create_request() -> CreateConsentRequestDTO {
    CreateConsentRequestDTO {
        instance_id: INSTANCE_ID.to_owned(),
        valid_until: OffsetDateTime::now_utc().date() + Duration::days(10),
        frequency_per_day: 4,
        recurring: true,
        one_access_type: false,
        tpp: dummy_tpp(),
        psu_identity: Some(dummy_psu("psu-1")),
    }
}

#[rstest]
#[case(5, date!(2024 - 01 - 11), date!(2024 - 01 - 05))]
#[case(0, date!(2024 - 01 - 11), date!(2024 - 01 - 11))]
#[case(30, date!(2024 - 01 - 11), date!(2024 - 01 - 11))]
#[case(1, date!(2024 - 01 - 11), date!(2024 - 01 - 01))]
fn test_adjust_valid_until(
    #[case] lifetime_days: u32,
    #[case] requested: time::Date,
    #[case] expected: time::Date,
) {
    assert_eq!(
        adjust_valid_until(requested, lifetime_days, date!(2024 - 01 - 01)),
        expected
    );
}

#[tokio::test]
async fn test_create_consent_clamps_valid_until() {
    let mut repository = MockConsentRepository::default();
    repository
        .expect_create_consent()
        .once()
        .withf(|consent| {
            consent.status == ConsentStatus::Received
                && consent.valid_until == OffsetDateTime::now_utc().date() + Duration::days(4)
                && consent.frequency_per_day == 2
                && consent.psu_identities == vec![dummy_psu("psu-1")]
        })
        .returning(|consent| Ok(consent.id));

    let mut config = dummy_config();
    config.consent.lifetime_days = 5;
    config.consent.max_frequency_per_day = 2;

    let service = setup_service(repository, MockAuthorisationRepository::default(), config);
    let response = service.create_consent(create_request()).await.unwrap();

    assert_eq!(response.status, ConsentStatus::Received);
    assert_eq!(response.frequency_per_day, 2);
}

#[tokio::test]
async fn test_create_one_off_consent_allows_single_access() {
    let mut repository = MockConsentRepository::default();
    repository
        .expect_create_consent()
        .once()
        .returning(|consent| Ok(consent.id));

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );
    let response = service
        .create_consent(CreateConsentRequestDTO {
            recurring: false,
            frequency_per_day: 10,
            ..create_request()
        })
        .await
        .unwrap();

    assert_eq!(response.frequency_per_day, 1);
}

#[tokio::test]
async fn test_create_consent_incomplete_tpp() {
    let mut request = create_request();
    request.tpp.authority_id = "".to_owned();

    let service = setup_service(
        MockConsentRepository::default(),
        MockAuthorisationRepository::default(),
        dummy_config(),
    );
    let error = service.create_consent(request).await.unwrap_err();

    assert_eq!(error.kind(), ErrorKind::InvalidArgument);
}

#[tokio::test]
async fn test_get_consent_other_instance_not_found() {
    let consent = dummy_consent();
    let service = setup_service(
        repository_returning(consent.clone()),
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let error = service.get_consent(&consent.id, "bank-b").await.unwrap_err();
    assert!(matches!(
        error,
        ServiceError::EntityNotFound(EntityNotFoundError::Consent(id)) if id == consent.id
    ));
}

#[tokio::test]
async fn test_get_consent_not_expired() {
    let consent = dummy_consent();
    let mut repository = repository_returning(consent.clone());
    repository.expect_update_consent().never();

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    assert_eq!(
        service.get_consent(&consent.id, INSTANCE_ID).await.unwrap(),
        consent
    );
}

fn used_one_off_consent() -> Consent {
    let now = OffsetDateTime::now_utc();
    Consent {
        status: ConsentStatus::Valid,
        recurring: false,
        frequency_per_day: 1,
        usages: vec![ConsentUsage {
            usage_date: now.date(),
            resource_uri: "/v1/accounts".to_owned(),
            created_date: now,
        }],
        ..dummy_consent()
    }
}

fn expired_by_window() -> Consent {
    Consent {
        status: ConsentStatus::PartiallyAuthorised,
        created_date: OffsetDateTime::now_utc() - Duration::days(2),
        ..dummy_consent()
    }
}

fn expired_by_date() -> Consent {
    Consent {
        status: ConsentStatus::Valid,
        valid_until: OffsetDateTime::now_utc().date() - Duration::days(1),
        ..dummy_consent()
    }
}

#[rstest]
#[case::one_off_used(used_one_off_consent())]
#[case::not_confirmed_in_time(expired_by_window())]
#[case::valid_until_passed(expired_by_date())]
#[tokio::test]
async fn test_get_consent_expires_on_read(#[case] consent: Consent) {
    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .once()
        .withf(move |id, request| {
            *id == consent.id && request.status == Some(ConsentStatus::Expired)
        })
        .returning(|_, _| Ok(()));

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let result = service.get_consent(&consent.id, INSTANCE_ID).await.unwrap();
    assert_eq!(result.status, ConsentStatus::Expired);
}

#[tokio::test]
async fn test_get_consent_finalised_is_never_expired_again() {
    let consent = Consent {
        status: ConsentStatus::TerminatedByTpp,
        ..expired_by_date()
    };
    let mut repository = repository_returning(consent.clone());
    repository.expect_update_consent().never();

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    assert_eq!(
        service
            .get_consent_status(&consent.id, INSTANCE_ID)
            .await
            .unwrap(),
        ConsentStatus::TerminatedByTpp
    );
}

#[tokio::test]
async fn test_revoke_consent() {
    let consent = Consent {
        status: ConsentStatus::Valid,
        ..dummy_consent()
    };
    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .once()
        .withf(|_, request| request.status == Some(ConsentStatus::TerminatedByTpp))
        .returning(|_, _| Ok(()));

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    service
        .revoke_consent(&consent.id, INSTANCE_ID)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_revoke_finalised_consent_fails() {
    let consent = Consent {
        status: ConsentStatus::Rejected,
        ..dummy_consent()
    };
    let service = setup_service(
        repository_returning(consent.clone()),
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let error = service
        .revoke_consent(&consent.id, INSTANCE_ID)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_record_usage() {
    let consent = Consent {
        status: ConsentStatus::Valid,
        ..dummy_consent()
    };
    let mut repository = repository_returning(consent.clone());
    repository
        .expect_add_consent_usage()
        .once()
        .withf(|_, usage| usage.resource_uri == "/v1/accounts/1/balances")
        .returning(|_, _| Ok(()));

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    service
        .record_usage(&consent.id, INSTANCE_ID, "/v1/accounts/1/balances")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_record_usage_access_exceeded() {
    let now = OffsetDateTime::now_utc();
    let usage = ConsentUsage {
        usage_date: now.date(),
        resource_uri: "/v1/accounts".to_owned(),
        created_date: now,
    };
    let consent = Consent {
        status: ConsentStatus::Valid,
        frequency_per_day: 2,
        usages: vec![usage.clone(), usage],
        ..dummy_consent()
    };
    let mut repository = repository_returning(consent.clone());
    repository.expect_add_consent_usage().never();

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let error = service
        .record_usage(&consent.id, INSTANCE_ID, "/v1/accounts")
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ServiceError::BusinessLogic(BusinessLogicError::AccessExceeded(_))
    ));
}

#[tokio::test]
async fn test_record_usage_requires_valid_consent() {
    let consent = dummy_consent();
    let mut repository = repository_returning(consent.clone());
    repository.expect_add_consent_usage().never();

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let error = service
        .record_usage(&consent.id, INSTANCE_ID, "/v1/accounts")
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_terminate_old_consents() {
    let new_consent = Consent {
        status: ConsentStatus::Valid,
        ..dummy_consent()
    };
    let old_consent = Consent {
        status: ConsentStatus::Valid,
        ..dummy_consent()
    };
    let other_psus = Consent {
        psu_identities: vec![dummy_psu("psu-1"), dummy_psu("psu-2")],
        ..dummy_consent()
    };

    let mut repository = repository_returning(new_consent.clone());

    let mut calls = 0;
    let returned = vec![old_consent.clone(), other_psus];
    let new_consent_id = new_consent.id;
    repository
        .expect_get_old_consents()
        .times(2)
        .withf(move |query| {
            query.exclude == new_consent_id
                && query.psu_ids == vec!["psu-1".to_owned()]
                && query.tpp_authority_id == "BAFIN"
                && query.instance_id == INSTANCE_ID
                && query.statuses.len() == 3
        })
        .returning(move |_| {
            calls += 1;
            Ok(if calls == 1 { returned.clone() } else { vec![] })
        });
    repository
        .expect_update_consent()
        .once()
        .with(
            eq(old_consent.id),
            function(|request: &UpdateConsentRequest| {
                request.status == Some(ConsentStatus::TerminatedByTpp)
            }),
        )
        .returning(|_, _| Ok(()));

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    assert!(service.terminate_old_consents(&new_consent.id).await.unwrap());
    assert!(!service.terminate_old_consents(&new_consent.id).await.unwrap());
}

#[tokio::test]
async fn test_terminate_old_consents_one_access_type() {
    let consent = Consent {
        one_access_type: true,
        ..dummy_consent()
    };
    let mut repository = repository_returning(consent.clone());
    repository.expect_get_old_consents().never();

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    assert!(!service.terminate_old_consents(&consent.id).await.unwrap());
}

#[tokio::test]
async fn test_terminate_old_consents_unknown_consent() {
    let mut repository = MockConsentRepository::default();
    repository.expect_get_consent().returning(|_| Ok(None));

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let error = service
        .terminate_old_consents(&shared_types::ConsentId::new_v4())
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_terminate_old_consents_without_psu() {
    let consent = Consent {
        psu_identities: vec![],
        ..dummy_consent()
    };
    let mut repository = repository_returning(consent.clone());
    repository.expect_get_old_consents().never();

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let error = service
        .terminate_old_consents(&consent.id)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);
}

fn multilevel_consent() -> Consent {
    Consent {
        psu_identities: vec![dummy_psu("psu-1"), dummy_psu("psu-2")],
        ..dummy_consent()
    }
}

fn multilevel_config() -> CoreConfig {
    let mut config = dummy_config();
    config.sca.multilevel_sca_enabled = true;
    config
}

#[tokio::test]
async fn test_first_of_two_signatures_partially_authorises() {
    let consent = multilevel_consent();
    let parent = AuthorisationParent::Consent(consent.id);

    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .once()
        .withf(|_, request| {
            request.status == Some(ConsentStatus::PartiallyAuthorised)
                && request.multilevel_sca_required == Some(true)
        })
        .returning(|_, _| Ok(()));
    repository.expect_get_old_consents().never();

    let mut authorisation_repository = MockAuthorisationRepository::default();
    authorisation_repository
        .expect_get_authorisations_by_parent()
        .with(eq(parent), eq(AuthorisationKind::Create))
        .returning(move |parent, _| {
            Ok(vec![
                authorised_by(*parent, dummy_psu("psu-1")),
                dummy_authorisation(*parent),
            ])
        });

    let service = setup_service(repository, authorisation_repository, multilevel_config());

    let status = service
        .apply_authorisation_outcome(&consent.id, ConsentStatus::Valid, false)
        .await
        .unwrap();
    assert_eq!(status, ConsentStatus::PartiallyAuthorised);
}

#[tokio::test]
async fn test_second_signature_validates_consent() {
    let consent = Consent {
        status: ConsentStatus::PartiallyAuthorised,
        multilevel_sca_required: true,
        ..multilevel_consent()
    };

    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .once()
        .withf(|_, request| {
            request.status == Some(ConsentStatus::Valid)
                && request.multilevel_sca_required.is_none()
        })
        .returning(|_, _| Ok(()));
    repository
        .expect_get_old_consents()
        .once()
        .returning(|_| Ok(vec![]));

    let mut authorisation_repository = MockAuthorisationRepository::default();
    authorisation_repository
        .expect_get_authorisations_by_parent()
        .returning(move |parent, _| {
            Ok(vec![
                authorised_by(*parent, dummy_psu("psu-1")),
                authorised_by(*parent, dummy_psu("psu-2")),
            ])
        });

    let service = setup_service(repository, authorisation_repository, multilevel_config());

    let status = service
        .apply_authorisation_outcome(&consent.id, ConsentStatus::Valid, false)
        .await
        .unwrap();
    assert_eq!(status, ConsentStatus::Valid);
}

#[tokio::test]
async fn test_bank_reported_multilevel_needs_second_signature() {
    let consent = dummy_consent();

    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .once()
        .withf(|_, request| {
            request.status == Some(ConsentStatus::PartiallyAuthorised)
                && request.multilevel_sca_required == Some(true)
        })
        .returning(|_, _| Ok(()));

    let mut authorisation_repository = MockAuthorisationRepository::default();
    authorisation_repository
        .expect_get_authorisations_by_parent()
        .returning(move |parent, _| Ok(vec![authorised_by(*parent, dummy_psu("psu-1"))]));

    let service = setup_service(repository, authorisation_repository, multilevel_config());

    let status = service
        .apply_authorisation_outcome(&consent.id, ConsentStatus::Valid, true)
        .await
        .unwrap();
    assert_eq!(status, ConsentStatus::PartiallyAuthorised);
}

#[tokio::test]
async fn test_single_signature_without_multilevel() {
    let consent = Consent {
        psu_identities: vec![PsuIdentity::new("psu-1"), PsuIdentity::new("psu-2")],
        ..dummy_consent()
    };

    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .once()
        .withf(|_, request| request.status == Some(ConsentStatus::Valid))
        .returning(|_, _| Ok(()));
    repository
        .expect_get_old_consents()
        .returning(|_| Ok(vec![]));

    let mut authorisation_repository = MockAuthorisationRepository::default();
    authorisation_repository
        .expect_get_authorisations_by_parent()
        .never();

    let service = setup_service(repository, authorisation_repository, dummy_config());

    let status = service
        .apply_authorisation_outcome(&consent.id, ConsentStatus::Valid, false)
        .await
        .unwrap();
    assert_eq!(status, ConsentStatus::Valid);
}

#[tokio::test]
async fn test_rejected_by_bank_is_taken_over() {
    let consent = dummy_consent();

    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .once()
        .withf(|_, request| request.status == Some(ConsentStatus::Rejected))
        .returning(|_, _| Ok(()));
    repository.expect_get_old_consents().never();

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let status = service
        .apply_authorisation_outcome(&consent.id, ConsentStatus::Rejected, false)
        .await
        .unwrap();
    assert_eq!(status, ConsentStatus::Rejected);
}

#[tokio::test]
async fn test_stale_partial_outcome_recomputed_after_lost_update() {
    let received = multilevel_consent();
    let validated = Consent {
        status: ConsentStatus::Valid,
        multilevel_sca_required: true,
        ..received.clone()
    };
    let consent_id = received.id;

    let mut repository = MockConsentRepository::default();
    let mut reads = vec![validated.clone(), validated, received];
    repository
        .expect_get_consent()
        .times(3)
        .with(eq(consent_id))
        .returning(move |_| Ok(reads.pop()));
    repository
        .expect_update_consent()
        .once()
        .withf(|_, request| {
            request.status == Some(ConsentStatus::PartiallyAuthorised)
                && request.expected_status == Some(ConsentStatus::Received)
        })
        .returning(|_, _| Err(DataLayerError::RecordNotUpdated));
    repository
        .expect_get_old_consents()
        .once()
        .returning(|_| Ok(vec![]));

    let mut authorisation_repository = MockAuthorisationRepository::default();
    authorisation_repository
        .expect_get_authorisations_by_parent()
        .once()
        .returning(move |parent, _| {
            Ok(vec![
                authorised_by(*parent, dummy_psu("psu-1")),
                dummy_authorisation(*parent),
            ])
        });

    let service = setup_service(repository, authorisation_repository, multilevel_config());

    let status = service
        .apply_authorisation_outcome(&consent_id, ConsentStatus::Valid, false)
        .await
        .unwrap();
    assert_eq!(status, ConsentStatus::Valid);
}

#[tokio::test]
async fn test_outcome_gives_up_when_consent_keeps_changing() {
    let consent = dummy_consent();

    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .times(3)
        .withf(|_, request| request.expected_status == Some(ConsentStatus::Received))
        .returning(|_, _| Err(DataLayerError::RecordNotUpdated));
    repository.expect_get_old_consents().never();

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    let error = service
        .apply_authorisation_outcome(&consent.id, ConsentStatus::Valid, false)
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        ServiceError::BusinessLogic(BusinessLogicError::ConcurrentConsentModification(id))
            if id == consent.id
    ));
    assert_eq!(error.kind(), ErrorKind::InvalidState);
}

#[tokio::test]
async fn test_duplicate_psu_signature_counts_once() {
    let consent = Consent {
        psu_identities: vec![dummy_psu("psu-1"), dummy_psu("psu-1")],
        ..dummy_consent()
    };

    let mut repository = repository_returning(consent.clone());
    repository
        .expect_update_consent()
        .once()
        .withf(|_, request| {
            request.status == Some(ConsentStatus::Valid)
                && request.multilevel_sca_required.is_none()
        })
        .returning(|_, _| Ok(()));
    repository
        .expect_get_old_consents()
        .returning(|_| Ok(vec![]));

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        multilevel_config(),
    );

    let status = service
        .apply_authorisation_outcome(&consent.id, ConsentStatus::Valid, false)
        .await
        .unwrap();
    assert_eq!(status, ConsentStatus::Valid);
}

#[tokio::test]
async fn test_add_known_psu_identity_is_noop() {
    let consent = dummy_consent();

    let mut repository = MockConsentRepository::default();
    repository
        .expect_add_psu_identity()
        .once()
        .with(eq(consent.id), eq(dummy_psu("psu-1")))
        .returning(|_, _| Err(DataLayerError::AlreadyExists));

    let service = setup_service(
        repository,
        MockAuthorisationRepository::default(),
        dummy_config(),
    );

    service
        .add_psu_identity(&consent.id, dummy_psu("psu-1"))
        .await
        .unwrap();
}
