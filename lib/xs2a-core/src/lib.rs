#![cfg_attr(feature = "strict", deny(warnings))]

use std::sync::Arc;

use config::ConfigValidationError;
use config::core_config::CoreConfig;
use provider::banking_adapter::BankingAdapter;
use provider::secure_data_vault::SecureDataVault;
use repository::DataRepository;
use service::authorisation::AuthorisationService;
use service::consent::ConsentService;
use service::payment::PaymentService;

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod repository;
pub mod service;

/// Entry point wiring storage, banking adapter and configuration of one deployment.
///
/// The same instance serves every bank instance; each call carries its `instance_id`.
#[derive(Clone)]
pub struct Xs2aCore {
    pub consent_service: Arc<ConsentService>,
    pub payment_service: Arc<PaymentService>,
    pub authorisation_service: AuthorisationService,
    pub vault: Arc<SecureDataVault>,
    pub config: Arc<CoreConfig>,
}

impl Xs2aCore {
    pub fn new(
        data_provider: Arc<dyn DataRepository>,
        banking_adapter: Arc<dyn BankingAdapter>,
        config: CoreConfig,
    ) -> Result<Self, ConfigValidationError> {
        config.validate()?;
        let config = Arc::new(config);

        let authorisation_repository = data_provider.get_authorisation_repository();

        let consent_service = Arc::new(ConsentService::new(
            data_provider.get_consent_repository(),
            authorisation_repository.clone(),
            config.clone(),
        ));
        let payment_service = Arc::new(PaymentService::new(
            data_provider.get_payment_repository(),
            authorisation_repository.clone(),
            config.clone(),
        ));
        let vault = Arc::new(SecureDataVault::new(
            data_provider.get_secure_data_repository(),
            &config.vault.encryption,
        ));

        let authorisation_service = AuthorisationService::new(
            authorisation_repository,
            consent_service.clone(),
            payment_service.clone(),
            banking_adapter,
            vault.clone(),
            config.clone(),
        );

        tracing::debug!(approaches = ?config.sca.approaches, "XS2A core initialized");

        Ok(Self {
            consent_service,
            payment_service,
            authorisation_service,
            vault,
            config,
        })
    }
}
