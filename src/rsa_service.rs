use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use openssl::pkey::{PKey, Private, Public};
use openssl::rsa::{Padding, Rsa};
use thiserror::Error;

pub const DEFAULT_KEY_BITS: u32 = 2048;

// PKCS#1 OAEP with SHA-1 reserves 2 * 20 + 2 bytes of the modulus
const OAEP_OVERHEAD: usize = 42;
// PKCS#1 v1.5 reserves at least 11 bytes of the modulus
const PKCS1_OVERHEAD: usize = 11;

const PEM_PREFIX: &str = "-----BEGIN";

// Custom error type for better error handling
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Data too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),
    #[error("OpenSSL error: {0}")]
    OpenSslError(#[from] openssl::error::ErrorStack),
    #[error("Invalid base64 encoding: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("Error: {0}")]
    Other(String),
}

// RSA primitives over opaque key handles; ciphertext stays raw bytes here
pub trait CryptoProvider {
    type PrivateKey;
    type PublicKey;

    fn key_bits(&self) -> u32;

    fn generate_keypair(&self) -> Result<Self::PrivateKey, CryptoError>;

    fn parse_private_key(&self, key: &str) -> Result<Self::PrivateKey, CryptoError>;

    fn parse_public_key(&self, key: &str) -> Result<Self::PublicKey, CryptoError>;

    fn derive_public_key(&self, key: &Self::PrivateKey) -> Result<Self::PublicKey, CryptoError>;

    fn serialize_private_key(&self, key: &Self::PrivateKey) -> Result<String, CryptoError>;

    fn serialize_public_key(&self, key: &Self::PublicKey) -> Result<String, CryptoError>;

    fn encrypt_with_public_key(
        &self,
        key: &Self::PublicKey,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    fn encrypt_with_private_key(
        &self,
        key: &Self::PrivateKey,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    fn decrypt_with_private_key(
        &self,
        key: &Self::PrivateKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    fn decrypt_with_public_key(
        &self,
        key: &Self::PublicKey,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;
}

// RSA provider using OpenSSL
#[derive(Debug, Clone)]
pub struct OpenSslProvider {
    bits: u32,
}

impl OpenSslProvider {
    pub fn new(bits: u32) -> Self {
        Self { bits }
    }
}

// Key strings pasted from terminals or config files may be wrapped
fn decode_key_base64(key: &str) -> Result<Vec<u8>, CryptoError> {
    let compact: String = key.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(CryptoError::Other("key string is empty".to_string()));
    }

    Ok(STANDARD.decode(compact)?)
}

fn is_pem(key: &str) -> bool {
    key.trim_start().starts_with(PEM_PREFIX)
}

fn check_size(len: usize, max: usize) -> Result<(), CryptoError> {
    if len > max {
        return Err(CryptoError::TooLarge(len, max));
    }

    Ok(())
}

impl CryptoProvider for OpenSslProvider {
    type PrivateKey = Rsa<Private>;
    type PublicKey = Rsa<Public>;

    fn key_bits(&self) -> u32 {
        self.bits
    }

    fn generate_keypair(&self) -> Result<Rsa<Private>, CryptoError> {
        Ok(Rsa::generate(self.bits)?)
    }

    fn parse_private_key(&self, key: &str) -> Result<Rsa<Private>, CryptoError> {
        let rsa = if is_pem(key) {
            Rsa::private_key_from_pem(key.trim().as_bytes())?
        } else {
            let der = decode_key_base64(key)?;
            // PKCS#1 first, then anything d2i_AutoPrivateKey understands (PKCS#8)
            match Rsa::private_key_from_der(&der) {
                Ok(rsa) => rsa,
                Err(_) => PKey::private_key_from_der(&der)?.rsa()?,
            }
        };

        if !rsa.check_key()? {
            return Err(CryptoError::Other("private key is not consistent".to_string()));
        }

        Ok(rsa)
    }

    fn parse_public_key(&self, key: &str) -> Result<Rsa<Public>, CryptoError> {
        if is_pem(key) {
            let pem = key.trim().as_bytes();
            return match Rsa::public_key_from_pem(pem) {
                Ok(rsa) => Ok(rsa),
                Err(_) => Ok(Rsa::public_key_from_pem_pkcs1(pem)?),
            };
        }

        let der = decode_key_base64(key)?;
        match Rsa::public_key_from_der_pkcs1(&der) {
            Ok(rsa) => Ok(rsa),
            Err(_) => Ok(Rsa::public_key_from_der(&der)?),
        }
    }

    fn derive_public_key(&self, key: &Rsa<Private>) -> Result<Rsa<Public>, CryptoError> {
        // Extract the public key from the private key
        let der = key.public_key_to_der_pkcs1()?;
        Ok(Rsa::public_key_from_der_pkcs1(&der)?)
    }

    fn serialize_private_key(&self, key: &Rsa<Private>) -> Result<String, CryptoError> {
        Ok(STANDARD.encode(key.private_key_to_der()?))
    }

    fn serialize_public_key(&self, key: &Rsa<Public>) -> Result<String, CryptoError> {
        Ok(STANDARD.encode(key.public_key_to_der_pkcs1()?))
    }

    fn encrypt_with_public_key(
        &self,
        key: &Rsa<Public>,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let size = key.size() as usize;
        // RSA encryption can only handle limited data size based on key size
        check_size(plaintext.len(), size.saturating_sub(OAEP_OVERHEAD))?;

        let mut buf = vec![0; size];
        let encrypted_len = key.public_encrypt(plaintext, &mut buf, Padding::PKCS1_OAEP)?;
        buf.truncate(encrypted_len);

        Ok(buf)
    }

    fn encrypt_with_private_key(
        &self,
        key: &Rsa<Private>,
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let size = key.size() as usize;
        check_size(plaintext.len(), size.saturating_sub(PKCS1_OVERHEAD))?;

        let mut buf = vec![0; size];
        let encrypted_len = key.private_encrypt(plaintext, &mut buf, Padding::PKCS1)?;
        buf.truncate(encrypted_len);

        Ok(buf)
    }

    fn decrypt_with_private_key(
        &self,
        key: &Rsa<Private>,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let mut buf = vec![0; key.size() as usize];
        let decrypted_len = key.private_decrypt(ciphertext, &mut buf, Padding::PKCS1_OAEP)?;
        buf.truncate(decrypted_len);

        Ok(buf)
    }

    fn decrypt_with_public_key(
        &self,
        key: &Rsa<Public>,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        let mut buf = vec![0; key.size() as usize];
        let decrypted_len = key.public_decrypt(ciphertext, &mut buf, Padding::PKCS1)?;
        buf.truncate(decrypted_len);

        Ok(buf)
    }
}
