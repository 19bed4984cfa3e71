use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, NotSet, Set};
use shared_types::{ConsentId, PaymentId};
use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};

use crate::entity::{consent, consent_psu, payment};
use crate::{DataLayer, db_conn};

pub fn get_dummy_date() -> OffsetDateTime {
    datetime!(2005-04-02 21:37 +1)
}

pub fn get_dummy_valid_until() -> Date {
    date!(2030-01-01)
}

pub const DUMMY_INSTANCE: &str = "instance";
pub const DUMMY_TPP_NUMBER: &str = "PSDDE-BAFIN-999999";
pub const DUMMY_TPP_AUTHORITY: &str = "BAFIN";

pub async fn insert_consent(
    db: &DatabaseConnection,
    status: consent::ConsentStatus,
    psu_ids: &[&str],
) -> Result<ConsentId, DbErr> {
    let model = consent::ActiveModel {
        id: NotSet,
        external_id: Set(ConsentId::new_v4()),
        instance_id: Set(DUMMY_INSTANCE.to_owned()),
        status: Set(status),
        valid_until: Set(get_dummy_valid_until()),
        created_date: Set(get_dummy_date()),
        last_modified: Set(get_dummy_date()),
        frequency_per_day: Set(4),
        recurring: Set(true),
        one_access_type: Set(false),
        multilevel_sca_required: Set(false),
        tpp_authorisation_number: Set(DUMMY_TPP_NUMBER.to_owned()),
        tpp_authority_id: Set(DUMMY_TPP_AUTHORITY.to_owned()),
        tpp_redirect_uri: Set(Some("https://tpp.example/ok".to_owned())),
        tpp_nok_redirect_uri: Set(None),
        tpp_cancel_redirect_uri: Set(None),
        tpp_cancel_nok_redirect_uri: Set(None),
    }
    .insert(db)
    .await?;

    for psu_id in psu_ids {
        consent_psu::ActiveModel {
            id: NotSet,
            consent_id: Set(model.id),
            psu_id: Set(psu_id.to_string()),
            psu_id_type: Set(None),
            psu_corporate_id: Set(None),
            psu_corporate_id_type: Set(None),
        }
        .insert(db)
        .await?;
    }

    Ok(model.external_id)
}

pub async fn insert_payment(
    db: &DatabaseConnection,
    status: payment::TransactionStatus,
) -> Result<PaymentId, DbErr> {
    let model = payment::ActiveModel {
        id: NotSet,
        external_id: Set(PaymentId::new_v4()),
        instance_id: Set(DUMMY_INSTANCE.to_owned()),
        transaction_status: Set(status),
        payment_type: Set(payment::PaymentType::Single),
        payment_product: Set("sepa-credit-transfers".to_owned()),
        multilevel_sca_required: Set(false),
        created_date: Set(get_dummy_date()),
        last_modified: Set(get_dummy_date()),
        tpp_authorisation_number: Set(DUMMY_TPP_NUMBER.to_owned()),
        tpp_authority_id: Set(DUMMY_TPP_AUTHORITY.to_owned()),
        tpp_redirect_uri: Set(None),
        tpp_nok_redirect_uri: Set(None),
        tpp_cancel_redirect_uri: Set(None),
        tpp_cancel_nok_redirect_uri: Set(None),
    }
    .insert(db)
    .await?;

    Ok(model.external_id)
}

pub async fn setup_test_data_layer_and_connection_with_custom_url(database_url: &str) -> DataLayer {
    let db = db_conn(database_url).await.unwrap();
    DataLayer::build(db)
}

pub async fn setup_test_data_layer_and_connection() -> DataLayer {
    setup_test_data_layer_and_connection_with_custom_url("sqlite::memory:").await
}
