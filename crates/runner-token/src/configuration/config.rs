// Configuration: turns parsed command settings into a validated value.
// Exactly one credential source is selected; flag values that belong to the
// other source are ignored.

use runner_token_sdk::UrlUtil;
use std::path::PathBuf;

use super::options::{AzureAuthMethod, OutputMethod, TokenType};
use super::validators;
use crate::command_settings::CommandSettings;

/// Invalid or incomplete command-line configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Valid values for --token-type are REGISTER and REMOVE. Received: {0}")]
    InvalidTokenType(String),

    #[error("Valid values for --azure-auth are ENV and CLI. Received: {0}")]
    InvalidAuthMethod(String),

    #[error("Valid values for --output are TOKEN and JSON. Received: {0}")]
    InvalidOutputMethod(String),

    #[error("--{flag} is required {when}")]
    Missing {
        flag: &'static str,
        when: &'static str,
    },

    #[error("Invalid value for --{flag}: {reason}")]
    InvalidValue { flag: &'static str, reason: String },
}

const WITHOUT_KEYVAULT: &str = "when --use-azure-keyvault is not set";
const WITH_KEYVAULT: &str = "when --use-azure-keyvault is set";

/// The names of the Key Vault secrets holding the App credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyVaultSecretNames {
    pub organization: String,
    pub app_id: String,
    pub installation_id: String,
    pub private_key: String,
}

/// Where the GitHub App credentials come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSourceConfig {
    /// Credentials given directly on the command line.
    Flags {
        organization: String,
        app_id: i64,
        installation_id: i64,
        private_key_path: PathBuf,
    },
    /// Credentials stored as Azure Key Vault secrets.
    KeyVault {
        vault_name: String,
        dns_suffix: String,
        auth_method: AzureAuthMethod,
        secrets: KeyVaultSecretNames,
    },
}

/// A validated configuration for one token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub token_type: TokenType,
    pub output: OutputMethod,
    pub debug: bool,
    /// REST API base without a trailing `/`.
    pub github_api_url: String,
    pub source: CredentialSourceConfig,
}

impl Configuration {
    /// Validate the parsed command settings.
    pub fn from_settings(settings: &CommandSettings) -> Result<Self, ConfigError> {
        let github_api_url =
            UrlUtil::normalize_api_base(&settings.github_api_url).map_err(|e| {
                ConfigError::InvalidValue {
                    flag: "github-api-url",
                    reason: e.to_string(),
                }
            })?;

        let source = if settings.use_azure_keyvault {
            Self::keyvault_source(settings)?
        } else {
            Self::flag_source(settings)?
        };

        Ok(Self {
            token_type: settings.token_type,
            output: settings.output,
            debug: settings.debug,
            github_api_url,
            source,
        })
    }

    fn flag_source(settings: &CommandSettings) -> Result<CredentialSourceConfig, ConfigError> {
        let organization = settings.organization.trim();
        if organization.is_empty() {
            return Err(ConfigError::Missing {
                flag: "organization",
                when: WITHOUT_KEYVAULT,
            });
        }
        validators::validate_organization(organization).map_err(|e| ConfigError::InvalidValue {
            flag: "organization",
            reason: e.to_string(),
        })?;

        let app_id = require_positive("app-id", settings.app_id)?;
        let installation_id = require_positive("installation-id", settings.installation_id)?;

        let private_key_path = settings.private_key_path.trim();
        if private_key_path.is_empty() {
            return Err(ConfigError::Missing {
                flag: "private-key-path",
                when: WITHOUT_KEYVAULT,
            });
        }

        Ok(CredentialSourceConfig::Flags {
            organization: organization.to_string(),
            app_id,
            installation_id,
            private_key_path: PathBuf::from(private_key_path),
        })
    }

    fn keyvault_source(settings: &CommandSettings) -> Result<CredentialSourceConfig, ConfigError> {
        let vault_name = require_keyvault_value("azure-keyvault-name", &settings.azure_keyvault_name)?;
        validators::validate_vault_name(&vault_name).map_err(|e| ConfigError::InvalidValue {
            flag: "azure-keyvault-name",
            reason: e.to_string(),
        })?;

        let dns_suffix = settings
            .azure_keyvault_dns_suffix
            .trim()
            .trim_matches('.')
            .to_string();
        if dns_suffix.is_empty() {
            return Err(ConfigError::Missing {
                flag: "azure-keyvault-dns-suffix",
                when: WITH_KEYVAULT,
            });
        }

        let secrets = KeyVaultSecretNames {
            organization: require_secret_name("organization-kvsecret", &settings.organization_kvsecret)?,
            app_id: require_secret_name("app-id-kvsecret", &settings.app_id_kvsecret)?,
            installation_id: require_secret_name(
                "installation-id-kvsecret",
                &settings.installation_id_kvsecret,
            )?,
            private_key: require_secret_name("private-key-kvsecret", &settings.private_key_kvsecret)?,
        };

        Ok(CredentialSourceConfig::KeyVault {
            vault_name,
            dns_suffix,
            auth_method: settings.azure_auth,
            secrets,
        })
    }
}

fn require_positive(flag: &'static str, value: i64) -> Result<i64, ConfigError> {
    match value {
        0 => Err(ConfigError::Missing {
            flag,
            when: WITHOUT_KEYVAULT,
        }),
        v if v < 0 => Err(ConfigError::InvalidValue {
            flag,
            reason: format!("must be a positive integer (got {v})"),
        }),
        v => Ok(v),
    }
}

fn require_keyvault_value(flag: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Missing {
            flag,
            when: WITH_KEYVAULT,
        });
    }
    Ok(value.to_string())
}

fn require_secret_name(flag: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = require_keyvault_value(flag, value)?;
    validators::validate_secret_name(&value).map_err(|e| ConfigError::InvalidValue {
        flag,
        reason: e.to_string(),
    })?;
    Ok(value)
}
