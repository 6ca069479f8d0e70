use thiserror::Error;

use crate::models::KeyMode;
use crate::rsa_service::CryptoError;

pub type Result<T> = std::result::Result<T, RsaError>;

// Every variant is terminal, callers report and never retry
#[derive(Debug, Error)]
pub enum RsaError {
    #[error("rsa: key type must be either public or private, {0} is not valid")]
    InvalidKeyMode(String),

    #[error("rsa: generate key pair failed. bits: {bits}: {source}")]
    KeyGenerationFailed { bits: u32, source: CryptoError },

    #[error("rsa: parse key failed. keyType: {key_mode}, keyString: {key_string}: {source}")]
    KeyParseFailed {
        key_mode: KeyMode,
        key_string: String,
        source: CryptoError,
    },

    #[error("rsa: derive public key failed. keyType: {key_mode}: {source}")]
    KeyDerivationFailed { key_mode: KeyMode, source: CryptoError },

    #[error("rsa: serialize key failed. keyType: {key_mode}: {source}")]
    KeySerializationFailed { key_mode: KeyMode, source: CryptoError },

    #[error(
        "rsa: plaintext too large. keyType: {key_mode}, size: {size} bytes (max: {max} bytes)"
    )]
    PlaintextTooLarge {
        key_mode: KeyMode,
        size: usize,
        max: usize,
    },

    #[error("rsa: encrypt failed. keyType: {key_mode}, keyString: {key_string}, input: {input}: {source}")]
    EncryptionFailed {
        key_mode: KeyMode,
        key_string: String,
        input: String,
        source: CryptoError,
    },

    #[error("rsa: decrypt failed. keyType: {key_mode}, keyString: {key_string}, input: {input}: {source}")]
    DecryptionFailed {
        key_mode: KeyMode,
        key_string: String,
        input: String,
        source: CryptoError,
    },

    #[error("rsa: format result failed: {0}")]
    Format(#[from] serde_json::Error),
}

impl RsaError {
    pub fn key_mode(&self) -> Option<KeyMode> {
        match self {
            RsaError::KeyParseFailed { key_mode, .. }
            | RsaError::KeyDerivationFailed { key_mode, .. }
            | RsaError::KeySerializationFailed { key_mode, .. }
            | RsaError::PlaintextTooLarge { key_mode, .. }
            | RsaError::EncryptionFailed { key_mode, .. }
            | RsaError::DecryptionFailed { key_mode, .. } => Some(*key_mode),
            RsaError::InvalidKeyMode(_)
            | RsaError::KeyGenerationFailed { .. }
            | RsaError::Format(_) => None,
        }
    }
}
