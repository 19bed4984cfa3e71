//! Boundary to the bank specific adapter talking to core banking.

use std::sync::Arc;

use secrecy::SecretString;
use shared_types::AuthorisationId;

use self::error::BankingAdapterError;
use self::model::{
    AuthorisationCodeResult, BusinessObject, DecoupledScaResult, PsuAuthorisationResult,
    ScaMethod, ScaVerificationResult, SpiContext,
};
use crate::model::psu::PsuIdentity;
use crate::provider::secure_data_vault::VaultHandle;

pub mod error;
pub mod model;

/// Every call receives a vault handle scoped to the current consent/payment, where the
/// adapter can keep its own session data between SCA steps.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait BankingAdapter: Send + Sync {
    async fn authorise_psu(
        &self,
        context: &SpiContext,
        psu_identity: &PsuIdentity,
        password: &SecretString,
        business_object: &BusinessObject,
        vault: &VaultHandle,
    ) -> Result<PsuAuthorisationResult, BankingAdapterError>;

    async fn request_available_sca_methods(
        &self,
        context: &SpiContext,
        business_object: &BusinessObject,
        vault: &VaultHandle,
    ) -> Result<Vec<ScaMethod>, BankingAdapterError>;

    async fn request_authorisation_code(
        &self,
        context: &SpiContext,
        method_id: &str,
        business_object: &BusinessObject,
        vault: &VaultHandle,
    ) -> Result<AuthorisationCodeResult, BankingAdapterError>;

    async fn verify_sca_authorisation(
        &self,
        context: &SpiContext,
        confirmation_code: &SecretString,
        business_object: &BusinessObject,
        vault: &VaultHandle,
    ) -> Result<ScaVerificationResult, BankingAdapterError>;

    fn decoupled_sca(&self) -> DecoupledSca;
}

/// Decoupled SCA capability of a bank
#[derive(Clone)]
pub enum DecoupledSca {
    Supported(Arc<dyn DecoupledScaHandler>),
    Unsupported,
}

#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait DecoupledScaHandler: Send + Sync {
    /// Hands the SCA over to the bank's own channel (e.g. a mobile app)
    async fn start_sca_decoupled(
        &self,
        context: &SpiContext,
        authorisation_id: &AuthorisationId,
        method_id: &Option<String>,
        business_object: &BusinessObject,
        vault: &VaultHandle,
    ) -> Result<DecoupledScaResult, BankingAdapterError>;
}
