use std::sync::Arc;

use crate::config::core_config;
use crate::repository::authorisation_repository::AuthorisationRepository;
use crate::repository::consent_repository::ConsentRepository;

pub mod dto;
pub mod mapper;
pub mod service;

mod lifecycle;
pub(crate) mod validator;

#[derive(Clone)]
pub struct ConsentService {
    consent_repository: Arc<dyn ConsentRepository>,
    authorisation_repository: Arc<dyn AuthorisationRepository>,
    config: Arc<core_config::CoreConfig>,
}

impl ConsentService {
    pub fn new(
        consent_repository: Arc<dyn ConsentRepository>,
        authorisation_repository: Arc<dyn AuthorisationRepository>,
        config: Arc<core_config::CoreConfig>,
    ) -> Self {
        Self {
            consent_repository,
            authorisation_repository,
            config,
        }
    }
}

#[cfg(test)]
mod test;
