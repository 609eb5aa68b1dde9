// Azure credentials that yield bearer tokens for the Key Vault data plane.
//
//   ENV → EnvironmentCredential: service principal (client secret) when
//         AZURE_TENANT_ID / AZURE_CLIENT_ID / AZURE_CLIENT_SECRET are set,
//         otherwise the VM / container managed identity.
//   CLI → AzureCliCredential: `az account get-access-token`.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use runner_token_common::constants::{azure, variables};
use runner_token_common::{ApiError, HostContext, Tracing};
use runner_token_sdk::TraceWriter;
use serde::Deserialize;
use std::sync::Arc;

use crate::configuration::AzureAuthMethod;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A source of bearer tokens for the Key Vault data plane.
#[async_trait]
pub trait VaultTokenProvider: Send + Sync {
    /// Acquire an access token.
    async fn get_token(&self) -> Result<String>;

    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;
}

/// The token audience of vaults under `dns_suffix`, e.g.
/// `https://vault.azure.net` or `https://vault.azure.cn`.
pub fn keyvault_resource(dns_suffix: &str) -> String {
    format!("https://{}", dns_suffix.trim().trim_matches('.'))
}

/// Create the token provider for the selected authentication method.
///
/// Tokens are requested for `resource`, see [`keyvault_resource`].
pub fn create_token_provider(
    context: &Arc<HostContext>,
    http: Client,
    method: AzureAuthMethod,
    resource: &str,
) -> Result<Box<dyn VaultTokenProvider>> {
    let provider: Box<dyn VaultTokenProvider> = match method {
        AzureAuthMethod::Env => Box::new(EnvironmentCredential::from_lookup(
            context.clone(),
            http,
            resource,
            |key| std::env::var(key).ok(),
        )?),
        AzureAuthMethod::Cli => Box::new(AzureCliCredential::new(context.clone(), resource)),
    };
    context
        .get_trace("AzureCredential")
        .info(&format!("Using {} credential for Azure KeyVault", provider.name()));
    Ok(provider)
}

/// OAuth2 token endpoint response (Azure AD v2 and IMDS share this shape).
#[derive(Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
}

// ---------------------------------------------------------------------------
// Service principal
// ---------------------------------------------------------------------------

/// Client-credentials grant against Azure AD.
pub struct ClientSecretCredential {
    context: Arc<HostContext>,
    http: Client,
    trace: Tracing,
    authority_host: String,
    tenant_id: String,
    client_id: String,
    client_secret: String,
    scope: String,
}

impl ClientSecretCredential {
    pub fn new(
        context: Arc<HostContext>,
        http: Client,
        resource: &str,
        authority_host: &str,
        tenant_id: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Self {
        context.add_secret(client_secret);
        let trace = context.get_trace("ClientSecretCredential");
        Self {
            context,
            http,
            trace,
            authority_host: authority_host.trim_end_matches('/').to_string(),
            tenant_id: tenant_id.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scope: format!("{}/.default", resource),
        }
    }
}

#[async_trait]
impl VaultTokenProvider for ClientSecretCredential {
    async fn get_token(&self) -> Result<String> {
        const OPERATION: &str = "Azure AD client credentials token request";

        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.authority_host, self.tenant_id
        );
        self.trace.verbose(&format!(
            "Requesting KeyVault token for client {} from {}",
            self.client_id, url
        ));

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("scope", self.scope.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::transport(OPERATION, e))?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(OPERATION, response).await.into());
        }

        let token: OAuthTokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(OPERATION, e.to_string()))?;
        self.context.add_secret(&token.access_token);
        Ok(token.access_token)
    }

    fn name(&self) -> &'static str {
        "client secret"
    }
}

// ---------------------------------------------------------------------------
// Managed identity
// ---------------------------------------------------------------------------

/// Token from the instance metadata service of an Azure VM or container.
pub struct ManagedIdentityCredential {
    context: Arc<HostContext>,
    http: Client,
    trace: Tracing,
    endpoint: String,
    resource: String,
    client_id: Option<String>,
}

impl ManagedIdentityCredential {
    /// Use the system-assigned identity, or the user-assigned identity `client_id`.
    pub fn new(
        context: Arc<HostContext>,
        http: Client,
        resource: &str,
        client_id: Option<String>,
    ) -> Self {
        Self::with_endpoint(context, http, azure::IMDS_TOKEN_ENDPOINT, resource, client_id)
    }

    /// Use a non-default metadata endpoint.
    pub fn with_endpoint(
        context: Arc<HostContext>,
        http: Client,
        endpoint: &str,
        resource: &str,
        client_id: Option<String>,
    ) -> Self {
        let trace = context.get_trace("ManagedIdentityCredential");
        Self {
            context,
            http,
            trace,
            endpoint: endpoint.to_string(),
            resource: resource.to_string(),
            client_id,
        }
    }
}

#[async_trait]
impl VaultTokenProvider for ManagedIdentityCredential {
    async fn get_token(&self) -> Result<String> {
        const OPERATION: &str = "Managed identity token request";

        let mut query = vec![
            ("api-version", azure::IMDS_API_VERSION),
            ("resource", self.resource.as_str()),
        ];
        if let Some(ref client_id) = self.client_id {
            query.push(("client_id", client_id.as_str()));
        }
        self.trace.verbose(&format!(
            "Requesting KeyVault token from {} (client id: {})",
            self.endpoint,
            self.client_id.as_deref().unwrap_or("system assigned")
        ));

        let response = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .header("Metadata", "true")
            .send()
            .await
            .map_err(|e| ApiError::transport(OPERATION, e))
            .context("No managed identity endpoint is reachable; set AZURE_TENANT_ID, AZURE_CLIENT_ID and AZURE_CLIENT_SECRET or use --azure-auth CLI")?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(OPERATION, response).await.into());
        }

        let token: OAuthTokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(OPERATION, e.to_string()))?;
        self.context.add_secret(&token.access_token);
        Ok(token.access_token)
    }

    fn name(&self) -> &'static str {
        "managed identity"
    }
}

// ---------------------------------------------------------------------------
// Environment
// ---------------------------------------------------------------------------

/// The credential described by the `AZURE_*` environment variables.
pub enum EnvironmentCredential {
    ClientSecret(ClientSecretCredential),
    ManagedIdentity(ManagedIdentityCredential),
}

impl EnvironmentCredential {
    /// Select a credential from the variables visible through `lookup`.
    ///
    /// A tenant or client secret without the rest of the service principal
    /// triple is an error rather than a silent fall back to managed identity.
    pub fn from_lookup<F>(
        context: Arc<HostContext>,
        http: Client,
        resource: &str,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let tenant_id = read(variables::AZURE_TENANT_ID);
        let client_id = read(variables::AZURE_CLIENT_ID);
        let client_secret = read(variables::AZURE_CLIENT_SECRET);

        match (tenant_id, client_id, client_secret) {
            (Some(tenant), Some(client), Some(secret)) => {
                let authority = read(variables::AZURE_AUTHORITY_HOST)
                    .unwrap_or_else(|| azure::DEFAULT_AUTHORITY_HOST.to_string());
                Ok(EnvironmentCredential::ClientSecret(ClientSecretCredential::new(
                    context, http, resource, &authority, &tenant, &client, &secret,
                )))
            }
            (None, client, None) => Ok(EnvironmentCredential::ManagedIdentity(
                ManagedIdentityCredential::new(context, http, resource, client),
            )),
            (tenant, client, secret) => {
                let missing: Vec<&str> = [
                    (variables::AZURE_TENANT_ID, tenant.is_none()),
                    (variables::AZURE_CLIENT_ID, client.is_none()),
                    (variables::AZURE_CLIENT_SECRET, secret.is_none()),
                ]
                .into_iter()
                .filter(|(_, absent)| *absent)
                .map(|(name, _)| name)
                .collect();
                Err(anyhow!(
                    "Incomplete Azure service principal configuration: {} not set",
                    missing.join(", ")
                ))
            }
        }
    }
}

#[async_trait]
impl VaultTokenProvider for EnvironmentCredential {
    async fn get_token(&self) -> Result<String> {
        match self {
            EnvironmentCredential::ClientSecret(c) => c.get_token().await,
            EnvironmentCredential::ManagedIdentity(c) => c.get_token().await,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            EnvironmentCredential::ClientSecret(c) => c.name(),
            EnvironmentCredential::ManagedIdentity(c) => c.name(),
        }
    }
}

// ---------------------------------------------------------------------------
// Azure CLI
// ---------------------------------------------------------------------------

/// Error type for non-zero process exit codes.
#[derive(Debug, thiserror::Error)]
#[error(
    "Exit code {exit_code} returned from process: file name '{file_name}', arguments '{arguments}'. {stderr}"
)]
pub struct ProcessExitCodeError {
    pub exit_code: i32,
    pub file_name: String,
    pub arguments: String,
    pub stderr: String,
}

/// Output of `az account get-access-token --output json`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CliTokenResponse {
    access_token: String,
}

/// Token of the account signed in to the Azure CLI.
pub struct AzureCliCredential {
    context: Arc<HostContext>,
    trace: Tracing,
    program: String,
    args: Vec<String>,
}

impl AzureCliCredential {
    /// Invoke the `az` executable found on `PATH`.
    pub fn new(context: Arc<HostContext>, resource: &str) -> Self {
        let az_args = [
            "account",
            "get-access-token",
            "--resource",
            resource,
            "--output",
            "json",
        ];

        // `az` is a batch script on Windows and must go through cmd.
        let (program, prefix): (&str, &[&str]) = if cfg!(windows) {
            ("cmd", &["/C", "az"])
        } else {
            ("az", &[])
        };

        let args = prefix
            .iter()
            .chain(az_args.iter())
            .map(|s| s.to_string())
            .collect();
        Self::with_command(context, program, args)
    }

    /// Invoke an arbitrary command that prints the CLI's JSON token document.
    pub fn with_command(context: Arc<HostContext>, program: &str, args: Vec<String>) -> Self {
        let trace = context.get_trace("AzureCliCredential");
        Self {
            context,
            trace,
            program: program.to_string(),
            args,
        }
    }
}

#[async_trait]
impl VaultTokenProvider for AzureCliCredential {
    async fn get_token(&self) -> Result<String> {
        let arguments = self.args.join(" ");
        self.trace
            .verbose(&format!("Running '{} {}'", self.program, arguments));

        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => anyhow!(
                    "Azure CLI '{}' was not found on PATH; install it or use --azure-auth ENV",
                    self.program
                ),
                _ => anyhow!("Failed to start '{}': {}", self.program, e),
            })?;

        if !output.status.success() {
            return Err(ProcessExitCodeError {
                exit_code: output.status.code().unwrap_or(-1),
                file_name: self.program.clone(),
                arguments,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        let token: CliTokenResponse = serde_json::from_slice(&output.stdout)
            .context("Unable to parse the Azure CLI access token output")?;
        self.context.add_secret(&token.access_token);
        Ok(token.access_token)
    }

    fn name(&self) -> &'static str {
        "Azure CLI"
    }
}
