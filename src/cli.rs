use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Overrides;
use crate::models::Operation;

#[derive(Debug, Parser)]
#[command(name = "caerberus")]
#[command(about = "Encrypt and decrypt messages with RSA key pairs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML config file; command line flags take precedence over it
    #[arg(short, long, global = true, env = "CAERBERUS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level: debug, info, warn, warning, error or fatal
    #[arg(long, global = true, env = "CAERBERUS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Log format: text or json
    #[arg(long, global = true, env = "CAERBERUS_LOG_FORMAT")]
    pub log_format: Option<String>,

    /// Print the result on a single line
    #[arg(long, global = true)]
    pub compact: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Encrypt a message, generating a key pair when no key is given
    Encrypt(EncryptArgs),

    /// Decrypt a cipher with a public or private key
    Decrypt(DecryptArgs),
}

#[derive(Debug, Args)]
pub struct KeyArgs {
    /// Key type to use: public or private
    #[arg(short = 't', long)]
    pub key_type: Option<String>,

    /// Base64 DER or PEM private key
    #[arg(long, env = "CAERBERUS_PRIVATE_KEY")]
    pub private_key: Option<String>,

    /// Base64 DER or PEM public key
    #[arg(long, env = "CAERBERUS_PUBLIC_KEY")]
    pub public_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct EncryptArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Modulus size of a generated key pair
    #[arg(long)]
    pub bits: Option<u32>,

    /// Message to encrypt
    #[arg(short, long, conflicts_with = "message")]
    pub input: Option<String>,

    #[arg(value_name = "MESSAGE")]
    pub message: Option<String>,
}

#[derive(Debug, Args)]
pub struct DecryptArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Base64 cipher to decrypt
    #[arg(short, long, conflicts_with = "cipher")]
    pub input: Option<String>,

    #[arg(value_name = "CIPHER")]
    pub cipher: Option<String>,
}

impl Cli {
    pub fn operation(&self) -> Operation {
        match self.command {
            Commands::Encrypt(_) => Operation::Encrypt,
            Commands::Decrypt(_) => Operation::Decrypt,
        }
    }

    pub fn overrides(self) -> Overrides {
        let (key, bits, input) = match self.command {
            Commands::Encrypt(args) => (args.key, args.bits, args.input.or(args.message)),
            Commands::Decrypt(args) => (args.key, None, args.input.or(args.cipher)),
        };

        Overrides {
            log_level: self.log_level,
            log_format: self.log_format,
            compact: self.compact,
            key_type: key.key_type,
            private_key: key.private_key,
            public_key: key.public_key,
            bits,
            input,
        }
    }
}

// Prints a parse failure; help and version requests still succeed
pub fn report_parse_error(err: &clap::Error) -> ExitCode {
    let _ = err.print();

    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
