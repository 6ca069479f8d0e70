use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::RsaError;

// Model for the requested operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
        }
    }

    // Name of the key type field in the rendered result
    fn key_type_field(&self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt_key_type",
            Operation::Decrypt => "decrypt_key_type",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Model for which half of a key pair is used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    Public,
    Private,
}

impl KeyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyMode::Public => "public",
            KeyMode::Private => "private",
        }
    }
}

impl fmt::Display for KeyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyMode {
    type Err = RsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(KeyMode::Public),
            "private" => Ok(KeyMode::Private),
            other => Err(RsaError::InvalidKeyMode(other.to_string())),
        }
    }
}

// Model for the outcome of a single encrypt or decrypt call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    pub operation: Operation,
    pub key_mode: KeyMode,
    /// Empty when only a public key was involved.
    pub private_key: String,
    /// Supplied, derived from the private key, or freshly generated.
    pub public_key: String,
    pub plaintext: String,
    /// Base64 text, never raw bytes.
    pub ciphertext: String,
}

impl Serialize for OperationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("OperationResult", 5)?;
        state.serialize_field(self.operation.key_type_field(), self.key_mode.as_str())?;
        state.serialize_field("private_key", &self.private_key)?;
        state.serialize_field("public_key", &self.public_key)?;
        state.serialize_field("message", &self.plaintext)?;
        state.serialize_field("cipher", &self.ciphertext)?;
        state.end()
    }
}
