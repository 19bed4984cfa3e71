//! Encrypted per consent/payment storage for banking adapter session data.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretSlice, SecretString};
use xs2a_crypto::encryption::{decrypt_data, derive_key_from_passphrase, encrypt_data};

use crate::model::secure_data::SecureDataOwner;
use crate::repository::secure_data_repository::SecureDataRepository;


pub struct SecureDataVault {
    repository: Arc<dyn SecureDataRepository>,
    encryption_key: SecretSlice<u8>,
}

impl SecureDataVault {
    pub fn new(repository: Arc<dyn SecureDataRepository>, passphrase: &SecretString) -> Self {
        Self {
            repository,
            encryption_key: derive_key_from_passphrase(passphrase),
        }
    }

    /// Encrypts and stores `data`, replacing any previous blob of the owner.
    ///
    /// Returns `false` if the owner does not exist or the blob could not be stored.
    #[tracing::instrument(level = "debug", skip(self, data))]
    pub async fn write(&self, owner: &SecureDataOwner, data: &[u8]) -> bool {
        let associated_data = owner.to_string();
        let encrypted = match encrypt_data(data, &self.encryption_key, associated_data.as_bytes())
        {
            Ok(encrypted) => encrypted,
            Err(error) => {
                tracing::warn!("Failed to encrypt secure data: {error}");
                return false;
            }
        };

        match self.repository.upsert_secure_data(owner, encrypted).await {
            Ok(()) => true,
            Err(error) => {
                tracing::debug!("Failed to store secure data: {error}");
                false
            }
        }
    }

    /// `None` when nothing is stored or the blob cannot be decrypted with the current key
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn read(&self, owner: &SecureDataOwner) -> Option<Vec<u8>> {
        let stored = match self.repository.get_secure_data(owner).await {
            Ok(stored) => stored?,
            Err(error) => {
                tracing::debug!("Failed to load secure data: {error}");
                return None;
            }
        };

        let associated_data = owner.to_string();
        match decrypt_data(&stored, &self.encryption_key, associated_data.as_bytes()) {
            Ok(decrypted) => Some(decrypted.expose_secret().to_vec()),
            Err(error) => {
                tracing::debug!("Failed to decrypt secure data: {error}");
                None
            }
        }
    }

    pub fn handle(self: &Arc<Self>, owner: SecureDataOwner) -> VaultHandle {
        VaultHandle {
            vault: self.clone(),
            owner,
        }
    }
}

/// Vault access bound to a single owner, handed to the banking adapter
#[derive(Clone)]
pub struct VaultHandle {
    vault: Arc<SecureDataVault>,
    owner: SecureDataOwner,
}

impl VaultHandle {
    pub fn owner(&self) -> &SecureDataOwner {
        &self.owner
    }

    pub async fn read(&self) -> Option<Vec<u8>> {
        self.vault.read(&self.owner).await
    }

    pub async fn write(&self, data: &[u8]) -> bool {
        self.vault.write(&self.owner, data).await
    }
}

impl std::fmt::Debug for VaultHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultHandle")
            .field("owner", &self.owner)
            .finish_non_exhaustive()
    }
}
