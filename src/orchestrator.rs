use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Result, RsaError};
use crate::models::{KeyMode, Operation, OperationResult};
use crate::rsa_service::{CryptoError, CryptoProvider, OpenSslProvider};

pub struct RsaOrchestrator<P = OpenSslProvider> {
    provider: P,
}

impl<P: CryptoProvider> RsaOrchestrator<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    // Encrypt with a freshly generated key pair, both halves are returned
    pub fn encrypt(&self, key_mode: KeyMode, message: &str) -> Result<OperationResult> {
        let private_key =
            self.provider
                .generate_keypair()
                .map_err(|source| RsaError::KeyGenerationFailed {
                    bits: self.provider.key_bits(),
                    source,
                })?;
        let public_key = self.derive_public(&private_key)?;

        let encrypted = match key_mode {
            KeyMode::Public => self
                .provider
                .encrypt_with_public_key(&public_key, message.as_bytes()),
            KeyMode::Private => self
                .provider
                .encrypt_with_private_key(&private_key, message.as_bytes()),
        }
        .map_err(|source| encryption_error(key_mode, "", message, source))?;

        Ok(OperationResult {
            operation: Operation::Encrypt,
            key_mode,
            private_key: self.serialize_private(&private_key)?,
            public_key: self.serialize_public(&public_key, KeyMode::Public)?,
            plaintext: message.to_string(),
            ciphertext: STANDARD.encode(encrypted),
        })
    }

    // A supplied public key leaves `private_key` empty
    pub fn encrypt_with_key_string(
        &self,
        key_mode: KeyMode,
        key_string: &str,
        message: &str,
    ) -> Result<OperationResult> {
        let (encrypted, private_key, public_key) = match key_mode {
            KeyMode::Public => {
                let public_key = self.parse_public(key_string)?;
                let encrypted = self
                    .provider
                    .encrypt_with_public_key(&public_key, message.as_bytes());
                (encrypted, String::new(), key_string.to_string())
            }
            KeyMode::Private => {
                let private_key = self.parse_private(key_string)?;
                let public_key = self.derive_public(&private_key)?;
                let encrypted = self
                    .provider
                    .encrypt_with_private_key(&private_key, message.as_bytes());
                (
                    encrypted,
                    key_string.to_string(),
                    self.serialize_public(&public_key, KeyMode::Private)?,
                )
            }
        };
        let encrypted =
            encrypted.map_err(|source| encryption_error(key_mode, key_string, message, source))?;

        Ok(OperationResult {
            operation: Operation::Encrypt,
            key_mode,
            private_key,
            public_key,
            plaintext: message.to_string(),
            ciphertext: STANDARD.encode(encrypted),
        })
    }

    /// A private key opens artifacts from either of its own encrypt
    /// primitives: private-key decryption first, then the derived public half.
    pub fn decrypt(
        &self,
        key_mode: KeyMode,
        key_string: &str,
        cipher: &str,
    ) -> Result<OperationResult> {
        let decryption_error = |source: CryptoError| RsaError::DecryptionFailed {
            key_mode,
            key_string: key_string.to_string(),
            input: cipher.to_string(),
            source,
        };

        let (decrypted, private_key, public_key) = match key_mode {
            KeyMode::Public => {
                let public_key = self.parse_public(key_string)?;
                let encrypted = decode_cipher(cipher).map_err(decryption_error)?;
                let decrypted = self
                    .provider
                    .decrypt_with_public_key(&public_key, &encrypted);
                (decrypted, String::new(), key_string.to_string())
            }
            KeyMode::Private => {
                let private_key = self.parse_private(key_string)?;
                let public_key = self.derive_public(&private_key)?;
                let encrypted = decode_cipher(cipher).map_err(decryption_error)?;
                let decrypted = self
                    .provider
                    .decrypt_with_private_key(&private_key, &encrypted)
                    .or_else(|_| {
                        self.provider
                            .decrypt_with_public_key(&public_key, &encrypted)
                    });
                (
                    decrypted,
                    key_string.to_string(),
                    self.serialize_public(&public_key, KeyMode::Private)?,
                )
            }
        };

        let plaintext = decrypted
            .and_then(|bytes| {
                String::from_utf8(bytes).map_err(|_| {
                    CryptoError::Other("decrypted data is not valid UTF-8".to_string())
                })
            })
            .map_err(decryption_error)?;

        Ok(OperationResult {
            operation: Operation::Decrypt,
            key_mode,
            private_key,
            public_key,
            plaintext,
            ciphertext: cipher.to_string(),
        })
    }

    /// Entry point for the CLI. `key_mode` is checked before the provider is
    /// touched; an empty `key_string` means an ephemeral pair when encrypting.
    pub fn dispatch(
        &self,
        operation: Operation,
        key_mode: &str,
        key_string: &str,
        input: &str,
    ) -> Result<OperationResult> {
        let key_mode: KeyMode = key_mode.parse()?;

        match operation {
            Operation::Encrypt if key_string.is_empty() => self.encrypt(key_mode, input),
            Operation::Encrypt => self.encrypt_with_key_string(key_mode, key_string, input),
            Operation::Decrypt => self.decrypt(key_mode, key_string, input),
        }
    }

    fn parse_private(&self, key_string: &str) -> Result<P::PrivateKey> {
        self.provider
            .parse_private_key(key_string)
            .map_err(|source| RsaError::KeyParseFailed {
                key_mode: KeyMode::Private,
                key_string: key_string.to_string(),
                source,
            })
    }

    fn parse_public(&self, key_string: &str) -> Result<P::PublicKey> {
        self.provider
            .parse_public_key(key_string)
            .map_err(|source| RsaError::KeyParseFailed {
                key_mode: KeyMode::Public,
                key_string: key_string.to_string(),
                source,
            })
    }

    fn derive_public(&self, private_key: &P::PrivateKey) -> Result<P::PublicKey> {
        self.provider
            .derive_public_key(private_key)
            .map_err(|source| RsaError::KeyDerivationFailed {
                key_mode: KeyMode::Private,
                source,
            })
    }

    fn serialize_private(&self, private_key: &P::PrivateKey) -> Result<String> {
        self.provider
            .serialize_private_key(private_key)
            .map_err(|source| RsaError::KeySerializationFailed {
                key_mode: KeyMode::Private,
                source,
            })
    }

    fn serialize_public(&self, public_key: &P::PublicKey, key_mode: KeyMode) -> Result<String> {
        self.provider
            .serialize_public_key(public_key)
            .map_err(|source| RsaError::KeySerializationFailed { key_mode, source })
    }
}

fn decode_cipher(cipher: &str) -> std::result::Result<Vec<u8>, CryptoError> {
    let compact: String = cipher.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

fn encryption_error(
    key_mode: KeyMode,
    key_string: &str,
    input: &str,
    source: CryptoError,
) -> RsaError {
    match source {
        CryptoError::TooLarge(size, max) => RsaError::PlaintextTooLarge {
            key_mode,
            size,
            max,
        },
        source => RsaError::EncryptionFailed {
            key_mode,
            key_string: key_string.to_string(),
            input: input.to_string(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    // Provider that only counts how often it was reached
    #[derive(Default)]
    struct CountingProvider {
        calls: Cell<usize>,
        accept_private: bool,
    }

    impl CountingProvider {
        fn hit<T>(&self) -> std::result::Result<T, CryptoError> {
            self.calls.set(self.calls.get() + 1);
            Err(CryptoError::Other("unavailable".to_string()))
        }
    }

    impl CryptoProvider for CountingProvider {
        type PrivateKey = ();
        type PublicKey = ();

        fn key_bits(&self) -> u32 {
            512
        }
        fn generate_keypair(&self) -> std::result::Result<(), CryptoError> {
            self.hit()
        }
        fn parse_private_key(&self, _: &str) -> std::result::Result<(), CryptoError> {
            if self.accept_private {
                self.calls.set(self.calls.get() + 1);
                return Ok(());
            }
            self.hit()
        }
        fn parse_public_key(&self, _: &str) -> std::result::Result<(), CryptoError> {
            self.hit()
        }
        fn derive_public_key(&self, _: &()) -> std::result::Result<(), CryptoError> {
            self.hit()
        }
        fn serialize_private_key(&self, _: &()) -> std::result::Result<String, CryptoError> {
            self.hit()
        }
        fn serialize_public_key(&self, _: &()) -> std::result::Result<String, CryptoError> {
            self.hit()
        }
        fn encrypt_with_public_key(
            &self,
            _: &(),
            _: &[u8],
        ) -> std::result::Result<Vec<u8>, CryptoError> {
            self.hit()
        }
        fn encrypt_with_private_key(
            &self,
            _: &(),
            _: &[u8],
        ) -> std::result::Result<Vec<u8>, CryptoError> {
            self.hit()
        }
        fn decrypt_with_private_key(
            &self,
            _: &(),
            _: &[u8],
        ) -> std::result::Result<Vec<u8>, CryptoError> {
            self.hit()
        }
        fn decrypt_with_public_key(
            &self,
            _: &(),
            _: &[u8],
        ) -> std::result::Result<Vec<u8>, CryptoError> {
            self.hit()
        }
    }

    #[test]
    fn invalid_key_mode_never_reaches_the_provider() {
        let orchestrator = RsaOrchestrator::new(CountingProvider::default());

        for mode in ["", "PUBLIC", "secret", " private"] {
            for operation in [Operation::Encrypt, Operation::Decrypt] {
                match orchestrator.dispatch(operation, mode, "", "hello") {
                    Err(RsaError::InvalidKeyMode(value)) => assert_eq!(value, mode),
                    other => panic!("unexpected result: {:?}", other),
                }
            }
        }

        assert_eq!(orchestrator.provider().calls.get(), 0);
    }

    #[test]
    fn empty_key_string_on_decrypt_is_a_parse_failure() {
        let orchestrator = RsaOrchestrator::new(CountingProvider::default());

        for (mode, key) in [("private", ""), ("public", "   ")] {
            let err = orchestrator
                .dispatch(Operation::Decrypt, mode, key, "Y2lwaGVy")
                .unwrap_err();
            match err {
                RsaError::KeyParseFailed { key_mode, key_string, .. } => {
                    assert_eq!(key_mode.as_str(), mode);
                    assert_eq!(key_string, key);
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
        // one parse attempt each, nothing after it
        assert_eq!(orchestrator.provider().calls.get(), 2);
    }

    #[test]
    fn key_generation_failure_is_reported_with_bits() {
        let orchestrator = RsaOrchestrator::new(CountingProvider::default());

        match orchestrator.dispatch(Operation::Encrypt, "public", "", "hello") {
            Err(RsaError::KeyGenerationFailed { bits, .. }) => assert_eq!(bits, 512),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(orchestrator.provider().calls.get(), 1);
    }

    #[test]
    fn parse_failure_stops_before_any_cipher_call() {
        let orchestrator = RsaOrchestrator::new(CountingProvider::default());

        let err = orchestrator
            .encrypt_with_key_string(KeyMode::Public, "garbage", "hello")
            .unwrap_err();
        match err {
            RsaError::KeyParseFailed {
                key_mode,
                key_string,
                ..
            } => {
                assert_eq!(key_mode, KeyMode::Public);
                assert_eq!(key_string, "garbage");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(orchestrator.provider().calls.get(), 1);
    }

    #[test]
    fn derive_failure_is_not_a_serialization_failure() {
        let orchestrator = RsaOrchestrator::new(CountingProvider {
            accept_private: true,
            ..CountingProvider::default()
        });

        for operation in [Operation::Encrypt, Operation::Decrypt] {
            match orchestrator.dispatch(operation, "private", "a2V5", "Y2lwaGVy") {
                Err(RsaError::KeyDerivationFailed { key_mode, .. }) => {
                    assert_eq!(key_mode, KeyMode::Private)
                }
                other => panic!("unexpected result: {:?}", other),
            }
        }
        assert_eq!(orchestrator.provider().calls.get(), 4);
    }

    #[test]
    fn too_large_maps_to_its_own_error() {
        let err = encryption_error(KeyMode::Public, "", "x", CryptoError::TooLarge(300, 214));
        assert!(matches!(
            err,
            RsaError::PlaintextTooLarge {
                key_mode: KeyMode::Public,
                size: 300,
                max: 214
            }
        ));

        let err = encryption_error(KeyMode::Private, "k", "x", CryptoError::Other("boom".into()));
        assert!(matches!(err, RsaError::EncryptionFailed { .. }));
        assert_eq!(err.key_mode(), Some(KeyMode::Private));
    }
}
