// Enumerated options accepted on the command line. Parsing is exact and
// case sensitive; each value renders back to its upper-case wire name.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::config::ConfigError;

/// The kind of runner token requested from GitHub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenType {
    /// A token used to register a new self-hosted runner.
    Register,
    /// A token used to remove a self-hosted runner.
    Remove,
}

impl TokenType {
    /// Human readable noun used in messages ("registration token").
    pub fn describe(&self) -> &'static str {
        match self {
            TokenType::Register => "registration",
            TokenType::Remove => "remove",
        }
    }

    /// The final path segment of the organization endpoint that mints this token.
    pub fn endpoint(&self) -> &'static str {
        match self {
            TokenType::Register => "registration-token",
            TokenType::Remove => "remove-token",
        }
    }
}

impl FromStr for TokenType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "REGISTER" => Ok(TokenType::Register),
            "REMOVE" => Ok(TokenType::Remove),
            other => Err(ConfigError::InvalidTokenType(other.to_string())),
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Register => write!(f, "REGISTER"),
            TokenType::Remove => write!(f, "REMOVE"),
        }
    }
}

/// How the tool authenticates against Azure Key Vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AzureAuthMethod {
    /// Service principal or managed identity described by environment variables.
    Env,
    /// The signed-in Azure CLI account.
    Cli,
}

impl FromStr for AzureAuthMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ENV" => Ok(AzureAuthMethod::Env),
            "CLI" => Ok(AzureAuthMethod::Cli),
            other => Err(ConfigError::InvalidAuthMethod(other.to_string())),
        }
    }
}

impl fmt::Display for AzureAuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AzureAuthMethod::Env => write!(f, "ENV"),
            AzureAuthMethod::Cli => write!(f, "CLI"),
        }
    }
}

/// How the resulting token is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMethod {
    /// The bare token.
    Token,
    /// A JSON document with the token type, token, and organization.
    Json,
}

impl FromStr for OutputMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TOKEN" => Ok(OutputMethod::Token),
            "JSON" => Ok(OutputMethod::Json),
            other => Err(ConfigError::InvalidOutputMethod(other.to_string())),
        }
    }
}

impl fmt::Display for OutputMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputMethod::Token => write!(f, "TOKEN"),
            OutputMethod::Json => write!(f, "JSON"),
        }
    }
}
