//! SCA state machine driving consent and payment authorisations.

use std::sync::Arc;

use crate::config::core_config;
use crate::provider::banking_adapter::BankingAdapter;
use crate::provider::secure_data_vault::SecureDataVault;
use crate::repository::authorisation_repository::AuthorisationRepository;
use crate::service::consent::ConsentService;
use crate::service::payment::PaymentService;

pub mod dto;
pub mod service;

mod mapper;
mod redirect;
mod stages;
pub(crate) mod validator;

#[derive(Clone)]
pub struct AuthorisationService {
    authorisation_repository: Arc<dyn AuthorisationRepository>,
    consent_service: Arc<ConsentService>,
    payment_service: Arc<PaymentService>,
    banking_adapter: Arc<dyn BankingAdapter>,
    vault: Arc<SecureDataVault>,
    config: Arc<core_config::CoreConfig>,
}

impl AuthorisationService {
    pub fn new(
        authorisation_repository: Arc<dyn AuthorisationRepository>,
        consent_service: Arc<ConsentService>,
        payment_service: Arc<PaymentService>,
        banking_adapter: Arc<dyn BankingAdapter>,
        vault: Arc<SecureDataVault>,
        config: Arc<core_config::CoreConfig>,
    ) -> Self {
        Self {
            authorisation_repository,
            consent_service,
            payment_service,
            banking_adapter,
            vault,
            config,
        }
    }
}
