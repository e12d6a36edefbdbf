//! Encryption of secret setting values (provider API keys) at rest.
//!
//! AES-256-GCM with a 12-byte nonce prepended to the ciphertext, persisted
//! hex-encoded. The key comes from `LOOKBOOK_SECRET_KEY` as a 64-character
//! hex string (32 bytes).

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::RngCore;

/// Encryption key environment variable name.
pub const SECRET_KEY_ENV_VAR: &str = "LOOKBOOK_SECRET_KEY";

/// Nonce size for AES-256-GCM (96 bits = 12 bytes).
const NONCE_SIZE: usize = 12;

/// Error type for secret encryption failures.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("Encryption error: {0}")]
    Encryption(String),

    #[error("Decryption error: {0}")]
    Decryption(String),
}

/// Encrypts and decrypts setting values.
pub struct SecretEncryptor {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for SecretEncryptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretEncryptor").finish_non_exhaustive()
    }
}

impl SecretEncryptor {
    /// Create an encryptor from the `LOOKBOOK_SECRET_KEY` environment
    /// variable.
    pub fn from_env() -> Result<Self, SecretError> {
        let key_hex = std::env::var(SECRET_KEY_ENV_VAR).map_err(|_| {
            SecretError::InvalidKey(format!("environment variable {SECRET_KEY_ENV_VAR} not set"))
        })?;
        Self::from_hex_key(&key_hex)
    }

    /// Create an encryptor from a 64-character hex key (32 bytes decoded).
    pub fn from_hex_key(key_hex: &str) -> Result<Self, SecretError> {
        let key_bytes = hex_decode(key_hex.trim())
            .map_err(|e| SecretError::InvalidKey(format!("invalid hex key: {e}")))?;
        if key_bytes.len() != 32 {
            return Err(SecretError::InvalidKey(format!(
                "key must be 32 bytes (64 hex chars), got {} bytes",
                key_bytes.len()
            )));
        }
        let cipher = Aes256Gcm::new_from_slice(&key_bytes)
            .map_err(|e| SecretError::InvalidKey(format!("failed to create cipher: {e}")))?;
        Ok(Self { cipher })
    }

    /// Encrypt plaintext, returning hex-encoded `<nonce><ciphertext>`.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, SecretError> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| SecretError::Encryption(e.to_string()))?;

        let mut combined = nonce_bytes.to_vec();
        combined.extend(ciphertext);
        Ok(hex_encode(&combined))
    }

    /// Decrypt a hex-encoded `<nonce><ciphertext>` value.
    pub fn decrypt(&self, ciphertext_hex: &str) -> Result<String, SecretError> {
        let combined = hex_decode(ciphertext_hex)
            .map_err(|e| SecretError::Decryption(format!("invalid hex: {e}")))?;
        if combined.len() < NONCE_SIZE {
            return Err(SecretError::Decryption("ciphertext too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|e| SecretError::Decryption(e.to_string()))?;
        String::from_utf8(plaintext)
            .map_err(|e| SecretError::Decryption(format!("invalid UTF-8: {e}")))
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";
    let mut result = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        result.push(HEX_CHARS[(byte >> 4) as usize] as char);
        result.push(HEX_CHARS[(byte & 0x0f) as usize] as char);
    }
    result
}

fn hex_decode(hex: &str) -> Result<Vec<u8>, String> {
    if hex.len() % 2 != 0 {
        return Err("hex string must have even length".to_string());
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}
