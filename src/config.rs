use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{KeyMode, Operation};
use crate::rsa_service::DEFAULT_KEY_BITS;

pub const VALID_LOG_LEVELS: &[&str] = &["debug", "info", "warn", "warning", "error", "fatal"];
pub const VALID_LOG_FORMATS: &[&str] = &["text", "json"];
pub const VALID_KEY_TYPES: &[&str] = &["public", "private"];

pub const MIN_KEY_BITS: u32 = 512;
pub const MAX_KEY_BITS: u32 = 16384;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path} failed: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse config file {path} failed: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("validate config failed: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RsaConfig {
    /// Key type used by `encrypt`.
    pub encrypt: String,
    /// Key type used by `decrypt`.
    pub decrypt: String,
    pub private: String,
    pub public: String,
    /// Modulus size for generated key pairs.
    pub bits: u32,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            encrypt: KeyMode::Private.to_string(),
            decrypt: KeyMode::Public.to_string(),
            private: String::new(),
            public: String::new(),
            bits: DEFAULT_KEY_BITS,
        }
    }
}

impl RsaConfig {
    pub fn key_type(&self, operation: Operation) -> &str {
        match operation {
            Operation::Encrypt => &self.encrypt,
            Operation::Decrypt => &self.decrypt,
        }
    }

    pub fn key_string(&self, key_type: &str) -> &str {
        match key_type.parse::<KeyMode>() {
            Ok(KeyMode::Private) => &self.private,
            Ok(KeyMode::Public) => &self.public,
            Err(_) => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub rsa: RsaConfig,
    pub output: OutputConfig,
    /// Message to encrypt or cipher to decrypt.
    pub input: String,
}

/// Values given on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub compact: bool,
    pub key_type: Option<String>,
    pub private_key: Option<String>,
    pub public_key: Option<String>,
    pub bits: Option<u32>,
    pub input: Option<String>,
}

impl Config {
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content, path)
    }

    // The key type flag only touches the running operation's key type
    pub fn apply_overrides(&mut self, operation: Operation, overrides: Overrides) {
        if let Some(level) = overrides.log_level {
            self.log.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.log.format = format;
        }
        if overrides.compact {
            self.output.pretty = false;
        }
        if let Some(key_type) = overrides.key_type {
            match operation {
                Operation::Encrypt => self.rsa.encrypt = key_type,
                Operation::Decrypt => self.rsa.decrypt = key_type,
            }
        }
        if let Some(private_key) = overrides.private_key {
            self.rsa.private = private_key;
        }
        if let Some(public_key) = overrides.public_key {
            self.rsa.public = public_key;
        }
        if let Some(bits) = overrides.bits {
            self.rsa.bits = bits;
        }
        if let Some(input) = overrides.input {
            self.input = input;
        }
    }

    /// Lower-cases log settings and reports every invalid value at once.
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        self.log.level = self.log.level.trim().to_lowercase();
        self.log.format = self.log.format.trim().to_lowercase();

        let mut errors = Vec::new();

        if !VALID_LOG_LEVELS.contains(&self.log.level.as_str()) {
            errors.push(format!(
                "log level must be one of [{}], {} is not valid",
                VALID_LOG_LEVELS.join(", "),
                self.log.level
            ));
        }
        if !VALID_LOG_FORMATS.contains(&self.log.format.as_str()) {
            errors.push(format!(
                "log format must be one of [{}], {} is not valid",
                VALID_LOG_FORMATS.join(", "),
                self.log.format
            ));
        }
        for (name, value) in [("rsa.encrypt", &self.rsa.encrypt), ("rsa.decrypt", &self.rsa.decrypt)] {
            if !VALID_KEY_TYPES.contains(&value.as_str()) {
                errors.push(format!(
                    "{}: key type must be either public or private, {} is not valid",
                    name, value
                ));
            }
        }
        if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&self.rsa.bits) {
            errors.push(format!(
                "rsa.bits must be between {} and {}, {} is not valid",
                MIN_KEY_BITS, MAX_KEY_BITS, self.rsa.bits
            ));
        }

        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
