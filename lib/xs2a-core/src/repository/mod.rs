use std::sync::Arc;

use authorisation_repository::AuthorisationRepository;
use consent_repository::ConsentRepository;
use payment_repository::PaymentRepository;
use secure_data_repository::SecureDataRepository;

pub mod authorisation_repository;
pub mod consent_repository;
pub mod error;
pub mod payment_repository;
pub mod secure_data_repository;

pub trait DataRepository: Send + Sync {
    fn get_consent_repository(&self) -> Arc<dyn ConsentRepository>;
    fn get_payment_repository(&self) -> Arc<dyn PaymentRepository>;
    fn get_authorisation_repository(&self) -> Arc<dyn AuthorisationRepository>;
    fn get_secure_data_repository(&self) -> Arc<dyn SecureDataRepository>;
}
