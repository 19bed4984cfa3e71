use sea_orm::DatabaseConnection;
use shared_types::PaymentId;
use xs2a_core::model::payment::{Payment, PaymentType, TransactionStatus, UpdatePaymentRequest};
use xs2a_core::model::psu::PsuIdentity;
use xs2a_core::model::tpp::TppIdentity;
use xs2a_core::repository::error::DataLayerError;
use xs2a_core::repository::payment_repository::PaymentRepository;

use super::PaymentProvider;
use crate::entity::payment;
use crate::test_utilities::*;

struct TestSetup {
    pub db: DatabaseConnection,
    pub repository: Box<dyn PaymentRepository>,
}

async fn setup() -> TestSetup {
    let data_layer = setup_test_data_layer_and_connection().await;
    let db = data_layer.db;

    TestSetup {
        repository: Box::new(PaymentProvider { db: db.clone() }),
        db,
    }
}

#[tokio::test]
async fn test_create_and_get_payment() {
    let TestSetup { repository, .. } = setup().await;

    let request = Payment {
        id: PaymentId::new_v4(),
        instance_id: DUMMY_INSTANCE.to_owned(),
        transaction_status: TransactionStatus::Received,
        payment_type: PaymentType::Periodic,
        payment_product: "instant-sepa-credit-transfers".to_owned(),
        multilevel_sca_required: true,
        created_date: get_dummy_date(),
        last_modified: get_dummy_date(),
        tpp: TppIdentity {
            authorisation_number: DUMMY_TPP_NUMBER.to_owned(),
            authority_id: DUMMY_TPP_AUTHORITY.to_owned(),
            cancel_redirect_uri: Some("https://tpp.example/cancel".to_owned()),
            ..Default::default()
        },
        psu_identities: vec![PsuIdentity::new("psu-1"), PsuIdentity::new("psu-2")],
    };

    let id = repository.create_payment(request.clone()).await.unwrap();
    assert_eq!(id, request.id);

    let payment = repository.get_payment(&id).await.unwrap().unwrap();
    assert_eq!(payment, request);
}

#[tokio::test]
async fn test_get_payment_missing() {
    let TestSetup { repository, .. } = setup().await;

    let result = repository.get_payment(&PaymentId::new_v4()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_update_payment_status() {
    let TestSetup { repository, db } = setup().await;

    let id = insert_payment(&db, payment::TransactionStatus::Received)
        .await
        .unwrap();

    repository
        .update_payment(
            &id,
            UpdatePaymentRequest {
                transaction_status: Some(TransactionStatus::AcceptedTechnicalValidation),
                multilevel_sca_required: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let payment = repository.get_payment(&id).await.unwrap().unwrap();
    assert_eq!(
        payment.transaction_status,
        TransactionStatus::AcceptedTechnicalValidation
    );
    assert!(payment.multilevel_sca_required);
}

#[tokio::test]
async fn test_update_payment_expected_status_mismatch() {
    let TestSetup { repository, db } = setup().await;

    let id = insert_payment(&db, payment::TransactionStatus::AcceptedCustomerProfile)
        .await
        .unwrap();

    let result = repository
        .update_payment(
            &id,
            UpdatePaymentRequest {
                transaction_status: Some(TransactionStatus::PartiallyAcceptedTechnical),
                expected_transaction_status: Some(TransactionStatus::Received),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(DataLayerError::RecordNotUpdated)));

    let payment = repository.get_payment(&id).await.unwrap().unwrap();
    assert_eq!(
        payment.transaction_status,
        TransactionStatus::AcceptedCustomerProfile
    );
}

#[tokio::test]
async fn test_update_payment_missing() {
    let TestSetup { repository, .. } = setup().await;

    let result = repository
        .update_payment(&PaymentId::new_v4(), UpdatePaymentRequest::default())
        .await;
    assert!(matches!(result, Err(DataLayerError::RecordNotUpdated)));
}

#[tokio::test]
async fn test_add_psu_identity() {
    let TestSetup { repository, db } = setup().await;

    let id = insert_payment(&db, payment::TransactionStatus::Received)
        .await
        .unwrap();

    let psu = PsuIdentity {
        psu_id: "psu-1".to_owned(),
        psu_id_type: Some("RETAIL".to_owned()),
        ..Default::default()
    };
    repository.add_psu_identity(&id, psu.clone()).await.unwrap();

    let payment = repository.get_payment(&id).await.unwrap().unwrap();
    assert_eq!(payment.psu_identities, vec![psu]);

    let result = repository
        .add_psu_identity(&PaymentId::new_v4(), PsuIdentity::new("psu-2"))
        .await;
    assert!(matches!(result, Err(DataLayerError::IncorrectParameters)));
}

#[tokio::test]
async fn test_add_same_psu_identity_twice() {
    let TestSetup { repository, db } = setup().await;

    let id = insert_payment(&db, payment::TransactionStatus::Received)
        .await
        .unwrap();

    repository
        .add_psu_identity(&id, PsuIdentity::new("psu-1"))
        .await
        .unwrap();
    let result = repository
        .add_psu_identity(&id, PsuIdentity::new("psu-1"))
        .await;
    assert!(matches!(result, Err(DataLayerError::AlreadyExists)));

    let payment = repository.get_payment(&id).await.unwrap().unwrap();
    assert_eq!(payment.psu_identities, vec![PsuIdentity::new("psu-1")]);
}
