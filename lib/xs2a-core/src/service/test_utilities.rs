use secrecy::SecretString;
use shared_types::{AuthorisationId, ConsentId, PaymentId};
use time::{Duration, OffsetDateTime};

use crate::config::core_config::{
    ConsentConfig, CoreConfig, PaymentConfig, ScaConfig, VaultConfig,
};
use crate::model::authorisation::{
    Authorisation, AuthorisationKind, AuthorisationParent, ScaApproach, ScaStatus,
};
use crate::model::consent::{Consent, ConsentStatus};
use crate::model::payment::{Payment, PaymentType, TransactionStatus};
use crate::model::psu::PsuIdentity;
use crate::model::tpp::TppIdentity;

pub const INSTANCE_ID: &str = "bank-a";

pub fn dummy_config() -> CoreConfig {
    CoreConfig {
        consent: ConsentConfig {
            lifetime_days: 0,
            not_confirmed_expiration_time: Duration::days(1),
            max_frequency_per_day: 0,
        },
        payment: PaymentConfig {
            not_confirmed_expiration_time: Duration::hours(1),
            cancellation_authorisation_mandated: false,
        },
        sca: ScaConfig {
            approaches: vec![ScaApproach::Embedded, ScaApproach::Redirect, ScaApproach::Decoupled],
            redirect_url_expiration_time: Duration::minutes(10),
            authorisation_expiration_time: Duration::minutes(30),
            multilevel_sca_enabled: false,
            signing_basket_supported: false,
            adapter_timeout: None,
        },
        vault: VaultConfig {
            encryption: SecretString::from("vault-passphrase"),
        },
    }
}

pub fn dummy_tpp() -> TppIdentity {
    TppIdentity {
        authorisation_number: "PSDDE-BAFIN-123456".to_owned(),
        authority_id: "BAFIN".to_owned(),
        redirect_uri: Some("https://tpp.example/ok".to_owned()),
        nok_redirect_uri: Some("https://tpp.example/nok".to_owned()),
        cancel_redirect_uri: None,
        cancel_nok_redirect_uri: None,
    }
}

pub fn dummy_psu(psu_id: &str) -> PsuIdentity {
    PsuIdentity::new(psu_id)
}

pub fn dummy_consent() -> Consent {
    let now = OffsetDateTime::now_utc();

    Consent {
        id: ConsentId::new_v4(),
        instance_id: INSTANCE_ID.to_owned(),
        status: ConsentStatus::Received,
        valid_until: now.date() + Duration::days(30),
        created_date: now,
        last_modified: now,
        frequency_per_day: 4,
        recurring: true,
        one_access_type: false,
        multilevel_sca_required: false,
        tpp: dummy_tpp(),
        psu_identities: vec![dummy_psu("psu-1")],
        usages: vec![],
    }
}

pub fn dummy_payment() -> Payment {
    let now = OffsetDateTime::now_utc();

    Payment {
        id: PaymentId::new_v4(),
        instance_id: INSTANCE_ID.to_owned(),
        transaction_status: TransactionStatus::Received,
        payment_type: PaymentType::Single,
        payment_product: "sepa-credit-transfers".to_owned(),
        multilevel_sca_required: false,
        created_date: now,
        last_modified: now,
        tpp: dummy_tpp(),
        psu_identities: vec![dummy_psu("psu-1")],
    }
}

pub fn dummy_authorisation(parent: AuthorisationParent) -> Authorisation {
    let now = OffsetDateTime::now_utc();

    Authorisation {
        id: AuthorisationId::new_v4(),
        kind: AuthorisationKind::Create,
        parent,
        instance_id: INSTANCE_ID.to_owned(),
        sca_status: ScaStatus::Received,
        sca_approach: ScaApproach::Embedded,
        psu_identity: None,
        chosen_sca_method: None,
        redirect_url_expiration_timestamp: now + Duration::minutes(10),
        authorisation_expiration_timestamp: now + Duration::minutes(30),
        created_date: now,
        last_modified: now,
    }
}

pub fn authorised_by(parent: AuthorisationParent, psu: PsuIdentity) -> Authorisation {
    Authorisation {
        sca_status: ScaStatus::Finalised,
        psu_identity: Some(psu),
        ..dummy_authorisation(parent)
    }
}
