// Credential sources: each produces the four values needed to act as the
// GitHub App (organization, App ID, Installation ID, private key).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use runner_token_common::{HostContext, SecretMasker, Tracing};
use runner_token_sdk::{StringUtil, TraceWriter};
use std::path::PathBuf;
use std::sync::Arc;

use crate::configuration::{validators, KeyVaultSecretNames};
use crate::keyvault::KeyVaultClient;

/// The resolved GitHub App credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AppCredentials {
    pub organization: String,
    pub app_id: i64,
    pub installation_id: i64,
    pub private_key_pem: String,
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("organization", &self.organization)
            .field("app_id", &self.app_id)
            .field("installation_id", &self.installation_id)
            .field("private_key_pem", &"***")
            .finish()
    }
}

/// A place the App credentials can be loaded from.
#[async_trait]
pub trait AppCredentialSource: Send + Sync {
    /// Load the credentials. The private key is registered as a secret.
    async fn load(&self) -> Result<AppCredentials>;

    /// Short name used in diagnostics.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Command-line flags
// ---------------------------------------------------------------------------

/// Credentials given on the command line; the private key is read from a file.
pub struct FlagCredentialSource {
    context: Arc<HostContext>,
    trace: Tracing,
    organization: String,
    app_id: i64,
    installation_id: i64,
    private_key_path: PathBuf,
}

impl FlagCredentialSource {
    pub fn new(
        context: Arc<HostContext>,
        organization: &str,
        app_id: i64,
        installation_id: i64,
        private_key_path: PathBuf,
    ) -> Self {
        let trace = context.get_trace("FlagCredentialSource");
        Self {
            context,
            trace,
            organization: organization.to_string(),
            app_id,
            installation_id,
            private_key_path,
        }
    }
}

#[async_trait]
impl AppCredentialSource for FlagCredentialSource {
    async fn load(&self) -> Result<AppCredentials> {
        self.trace.verbose(&format!(
            "Reading GitHub App private key from {}",
            self.private_key_path.display()
        ));

        let private_key_pem = tokio::fs::read_to_string(&self.private_key_path)
            .await
            .with_context(|| {
                format!(
                    "Unable to read GitHub App private key from '{}'",
                    self.private_key_path.display()
                )
            })?;
        self.context.add_secret(&private_key_pem);

        Ok(AppCredentials {
            organization: self.organization.clone(),
            app_id: self.app_id,
            installation_id: self.installation_id,
            private_key_pem,
        })
    }

    fn name(&self) -> &str {
        "command line"
    }
}

// ---------------------------------------------------------------------------
// Azure Key Vault
// ---------------------------------------------------------------------------

/// Credentials stored as four secrets of one Azure Key Vault.
///
/// Only the private key is treated as secret; the organization and the IDs
/// appear in output and diagnostics.
pub struct KeyVaultCredentialSource {
    trace: Tracing,
    secret_masker: Arc<SecretMasker>,
    client: KeyVaultClient,
    secrets: KeyVaultSecretNames,
}

impl KeyVaultCredentialSource {
    pub fn new(context: &HostContext, client: KeyVaultClient, secrets: KeyVaultSecretNames) -> Self {
        Self {
            trace: context.get_trace("KeyVaultCredentialSource"),
            secret_masker: context.secret_masker.clone(),
            client,
            secrets,
        }
    }

    async fn fetch(&self, label: &str, secret_name: &str) -> Result<String> {
        self.client
            .get_secret(secret_name)
            .await
            .with_context(|| format!("Unable to get {} secret from Azure KeyVault", label))
    }

    async fn fetch_id(&self, label: &str, secret_name: &str) -> Result<i64> {
        let raw = self.fetch(label, secret_name).await?;
        let id = StringUtil::parse_i64(&raw)
            .with_context(|| format!("Unable to convert {} from string to int64", label))?;
        if id <= 0 {
            return Err(anyhow!(
                "{} from Azure KeyVault secret '{}' must be a positive integer (got {})",
                label,
                secret_name,
                id
            ));
        }
        Ok(id)
    }
}

#[async_trait]
impl AppCredentialSource for KeyVaultCredentialSource {
    async fn load(&self) -> Result<AppCredentials> {
        self.trace.info(&format!(
            "Loading GitHub App credentials from {}",
            self.client.base_url()
        ));

        let organization = self
            .fetch("Organization", &self.secrets.organization)
            .await?
            .trim()
            .to_string();
        validators::validate_organization(&organization).with_context(|| {
            format!(
                "Azure KeyVault secret '{}' does not hold a valid organization",
                self.secrets.organization
            )
        })?;

        let app_id = self.fetch_id("App ID", &self.secrets.app_id).await?;
        let installation_id = self
            .fetch_id("Installation ID", &self.secrets.installation_id)
            .await?;
        let private_key_pem = self
            .fetch("Private Key", &self.secrets.private_key)
            .await?;
        self.secret_masker.add_value(&private_key_pem);

        Ok(AppCredentials {
            organization,
            app_id,
            installation_id,
            private_key_pem,
        })
    }

    fn name(&self) -> &str {
        "Azure KeyVault"
    }
}
