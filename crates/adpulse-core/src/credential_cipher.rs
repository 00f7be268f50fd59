// Note: Deprecation warnings from generic-array 0.14.x are expected
// These will be resolved when aes-gcm upgrades to 0.11.0 (currently in RC)
// which uses generic-array 1.x
#![allow(deprecated)]

use aes_gcm::{
    aead::{Aead, KeyInit},
    AeadCore, Aes256Gcm, Nonce,
};
use argon2::Argon2;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::{rngs::OsRng, RngCore};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use thiserror::Error;

const SALT_LENGTH: usize = 16;
const NONCE_LENGTH: usize = 12;

/// Errors produced while protecting or recovering credential blobs
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("Encryption key must be exactly 32 bytes or 64 hex characters")]
    InvalidKeyLength,

    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("Encryption failed: {0}")]
    Encrypt(String),

    #[error("Decryption failed: authentication tag mismatch or corrupted data")]
    Decrypt,

    #[error("Encrypted payload is malformed")]
    Malformed,

    #[error("Credential serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Decrypted payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Encrypts and decrypts integration credentials at rest.
///
/// Every call derives a fresh AES-256-GCM key from the process-wide secret and a
/// random salt using Argon2id, so repeated encryptions of the same plaintext never
/// produce the same ciphertext. The transportable form is
/// `base64(salt || nonce || ciphertext+tag)`.
#[derive(Debug, Clone)]
pub struct CredentialCipher {
    secret: Arc<[u8; 32]>,
}

impl CredentialCipher {
    /// Creates a cipher from the process secret.
    /// Accepts either a raw 32-byte secret or a hex-encoded 64-character secret.
    /// Any other length is a startup configuration error.
    pub fn new(secret: &str) -> Result<Self, CipherError> {
        let secret_bytes = if secret.len() == 32 {
            secret.as_bytes().to_vec()
        } else if secret.len() == 64 {
            hex::decode(secret).map_err(|_| CipherError::InvalidKeyLength)?
        } else {
            return Err(CipherError::InvalidKeyLength);
        };

        if secret_bytes.len() != 32 {
            return Err(CipherError::InvalidKeyLength);
        }

        let mut secret = [0u8; 32];
        secret.copy_from_slice(&secret_bytes);

        Ok(Self {
            secret: Arc::new(secret),
        })
    }

    /// Derives a per-call symmetric key from the process secret and a salt.
    /// Argon2id is intentionally slow to resist brute force on a leaked blob.
    fn derive_key(&self, salt: &[u8]) -> Result<[u8; 32], CipherError> {
        let mut key = [0u8; 32];
        Argon2::default()
            .hash_password_into(self.secret.as_slice(), salt, &mut key)
            .map_err(|e| CipherError::KeyDerivation(e.to_string()))?;
        Ok(key)
    }

    /// Encrypts a plaintext string into a transportable base64 blob
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);

        let key = self.derive_key(&salt)?;
        let cipher = Aes256Gcm::new(key.as_slice().into());
        let nonce = Aes256Gcm::generate_nonce(&mut aes_gcm::aead::OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|e| CipherError::Encrypt(e.to_string()))?;

        let mut combined = salt.to_vec();
        combined.extend_from_slice(&nonce);
        combined.extend(ciphertext);
        Ok(BASE64.encode(combined))
    }

    /// Decrypts a blob produced by [`encrypt`](Self::encrypt).
    /// Fails if the authentication tag does not verify (tamper or wrong secret)
    /// or the input is malformed; never returns a wrong plaintext.
    pub fn decrypt(&self, encoded: &str) -> Result<String, CipherError> {
        let data = BASE64.decode(encoded).map_err(|_| CipherError::Malformed)?;

        if data.len() < SALT_LENGTH + NONCE_LENGTH {
            return Err(CipherError::Malformed);
        }

        let (salt, rest) = data.split_at(SALT_LENGTH);
        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LENGTH);

        let key = self.derive_key(salt)?;
        let cipher = Aes256Gcm::new(key.as_slice().into());

        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|_| CipherError::Decrypt)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
    }

    /// Serializes a credential value to JSON and encrypts it
    pub fn encrypt_object<T: Serialize>(&self, value: &T) -> Result<String, CipherError> {
        let json = serde_json::to_string(value)?;
        self.encrypt(&json)
    }

    /// Decrypts a blob and deserializes the JSON credential value
    pub fn decrypt_object<T: DeserializeOwned>(&self, encoded: &str) -> Result<T, CipherError> {
        let json = self.decrypt(encoded)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Generates a random 32-byte secret as a 64-character hex string
    pub fn generate_key() -> String {
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        hex::encode(key)
    }
}
