// Configuration module: option enums, input validation, and the validated
// `Configuration` the token command runs from.

pub mod config;
pub mod options;
pub mod validators;

pub use config::{ConfigError, Configuration, CredentialSourceConfig, KeyVaultSecretNames};
pub use options::{AzureAuthMethod, OutputMethod, TokenType};
