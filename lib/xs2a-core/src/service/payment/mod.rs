use std::sync::Arc;

use crate::config::core_config;
use crate::repository::authorisation_repository::AuthorisationRepository;
use crate::repository::payment_repository::PaymentRepository;

pub mod dto;
pub mod service;

pub(crate) mod validator;

#[derive(Clone)]
pub struct PaymentService {
    payment_repository: Arc<dyn PaymentRepository>,
    authorisation_repository: Arc<dyn AuthorisationRepository>,
    config: Arc<core_config::CoreConfig>,
}

impl PaymentService {
    pub fn new(
        payment_repository: Arc<dyn PaymentRepository>,
        authorisation_repository: Arc<dyn AuthorisationRepository>,
        config: Arc<core_config::CoreConfig>,
    ) -> Self {
        Self {
            payment_repository,
            authorisation_repository,
            config,
        }
    }
}
