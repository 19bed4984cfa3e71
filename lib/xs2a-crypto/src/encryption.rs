use chacha20poly1305::aead::{Aead, Nonce, Payload};
use chacha20poly1305::{AeadCore, ChaCha20Poly1305, KeyInit};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use sha2::{Digest, Sha256};

use crate::utilities::get_rng;

const NONCE_LENGTH: usize = 12;

#[derive(Debug, thiserror::Error)]
pub enum EncryptionError {
    #[error("crypto error: {0}")]
    Crypto(String),
    #[error("ciphertext too short")]
    Truncated,
}

/// Simplified KDF, the passphrase is expected to carry enough entropy on its own
pub fn derive_key_from_passphrase(passphrase: &SecretString) -> SecretSlice<u8> {
    let digest = Sha256::digest(passphrase.expose_secret().as_bytes());
    SecretSlice::from(digest.to_vec())
}

/// Encrypts `data` under a fresh random nonce. The output layout is `nonce || ciphertext`.
///
/// `associated_data` is authenticated but not encrypted, decryption with different
/// associated data fails.
pub fn encrypt_data(
    data: &[u8],
    encryption_key: &SecretSlice<u8>,
    associated_data: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    let cipher = ChaCha20Poly1305::new_from_slice(encryption_key.expose_secret())
        .map_err(|err| EncryptionError::Crypto(err.to_string()))?;

    let nonce = ChaCha20Poly1305::generate_nonce(get_rng());

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: data,
                aad: associated_data,
            },
        )
        .map_err(|err| EncryptionError::Crypto(format!("failed to encrypt: {err:?}")))?;

    let mut result = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);
    Ok(result)
}

pub fn decrypt_data(
    data: &[u8],
    encryption_key: &SecretSlice<u8>,
    associated_data: &[u8],
) -> Result<SecretSlice<u8>, EncryptionError> {
    if data.len() <= NONCE_LENGTH {
        return Err(EncryptionError::Truncated);
    }
    let (nonce, ciphertext) = data.split_at(NONCE_LENGTH);

    let cipher = ChaCha20Poly1305::new_from_slice(encryption_key.expose_secret())
        .map_err(|err| EncryptionError::Crypto(err.to_string()))?;

    cipher
        .decrypt(
            Nonce::<ChaCha20Poly1305>::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad: associated_data,
            },
        )
        .map(SecretSlice::from)
        .map_err(|err| EncryptionError::Crypto(format!("failed to decrypt: {err:?}")))
}

#[cfg(test)]
mod test {
    use similar_asserts::assert_eq;

    use super::*;

    fn key() -> SecretSlice<u8> {
        derive_key_from_passphrase(&SecretString::from("passphrase"))
    }

    #[test]
    fn test_encrypt_decrypt() {
        let encrypted = encrypt_data(b"hello", &key(), b"consent-1").unwrap();
        let decrypted = decrypt_data(&encrypted, &key(), b"consent-1").unwrap();

        assert_eq!(decrypted.expose_secret().to_vec(), b"hello".to_vec());
    }

    #[test]
    fn test_encrypt_is_not_deterministic() {
        let first = encrypt_data(b"hello", &key(), b"id").unwrap();
        let second = encrypt_data(b"hello", &key(), b"id").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_decrypt_with_other_associated_data_fails() {
        let encrypted = encrypt_data(b"hello", &key(), b"consent-1").unwrap();

        assert!(matches!(
            decrypt_data(&encrypted, &key(), b"consent-2"),
            Err(EncryptionError::Crypto(_))
        ));
    }

    #[test]
    fn test_decrypt_with_other_key_fails() {
        let encrypted = encrypt_data(b"hello", &key(), b"id").unwrap();
        let other = derive_key_from_passphrase(&SecretString::from("other"));

        assert!(decrypt_data(&encrypted, &other, b"id").is_err());
    }

    #[test]
    fn test_decrypt_truncated() {
        assert!(matches!(
            decrypt_data(&[0u8; 12], &key(), b"id"),
            Err(EncryptionError::Truncated)
        ));
    }
}
