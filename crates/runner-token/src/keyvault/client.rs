// KeyVaultClient: reads secrets from one Azure Key Vault over its REST API.
//   GET https://{vault}.{suffix}/secrets/{name}?api-version=7.4

use anyhow::Result;
use reqwest::Client;
use runner_token_common::constants::azure;
use runner_token_common::{ApiError, HostContext, Tracing};
use runner_token_sdk::TraceWriter;
use serde::Deserialize;
use tokio::sync::OnceCell;

use super::azure_credential::VaultTokenProvider;

#[derive(Deserialize)]
struct SecretBundle {
    value: Option<String>,
}

/// Client for the secrets of a single vault.
pub struct KeyVaultClient {
    http: Client,
    base_url: String,
    token_provider: Box<dyn VaultTokenProvider>,
    access_token: OnceCell<String>,
    trace: Tracing,
}

impl KeyVaultClient {
    /// Client for the vault `https://{vault_name}.{dns_suffix}`.
    pub fn new(
        context: &HostContext,
        http: Client,
        vault_name: &str,
        dns_suffix: &str,
        token_provider: Box<dyn VaultTokenProvider>,
    ) -> Self {
        let base_url = format!("https://{}.{}", vault_name, dns_suffix);
        Self::with_base_url(context, http, &base_url, token_provider)
    }

    pub fn with_base_url(
        context: &HostContext,
        http: Client,
        base_url: &str,
        token_provider: Box<dyn VaultTokenProvider>,
    ) -> Self {
        let trace = context.get_trace("KeyVaultClient");
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token_provider,
            access_token: OnceCell::new(),
            trace,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the current version of secret `name`.
    ///
    /// The vault access token is acquired on first use and reused for the
    /// rest of the run. Callers decide which values are secret.
    pub async fn get_secret(&self, name: &str) -> Result<String> {
        let operation = format!("Get KeyVault secret '{}'", name);

        let token = self
            .access_token
            .get_or_try_init(|| self.token_provider.get_token())
            .await?;

        let url = format!("{}/secrets/{}", self.base_url, name);
        self.trace.verbose(&format!("GET {}", url));

        let response = self
            .http
            .get(&url)
            .query(&[("api-version", azure::KEYVAULT_API_VERSION)])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ApiError::transport(operation.as_str(), e))?;

        if !response.status().is_success() {
            let err = ApiError::from_response(operation, response).await;
            self.trace.error(&err.to_string());
            return Err(err.into());
        }

        let bundle: SecretBundle = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(operation.as_str(), e.to_string()))?;

        match bundle.value {
            Some(value) => {
                self.trace
                    .info(&format!("Retrieved secret '{}' from {}", name, self.base_url));
                Ok(value)
            }
            None => Err(ApiError::invalid_response(operation, "secret has no value").into()),
        }
    }
}
