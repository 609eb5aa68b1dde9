// GitHubClient: the two REST calls the tool makes against GitHub.
//   POST /app/installations/{id}/access_tokens              (App JWT)
//   POST /orgs/{org}/actions/runners/{registration,remove}-token (installation token)

use reqwest::{Client, RequestBuilder};
use runner_token_common::constants::github;
use runner_token_common::{ApiError, HostContext, Tracing};
use runner_token_sdk::TraceWriter;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::configuration::TokenType;

/// A token minted by GitHub together with its expiry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubToken {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl std::fmt::Debug for GitHubToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubToken")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Thin client over the GitHub REST API.
pub struct GitHubClient {
    context: Arc<HostContext>,
    http: Client,
    api_base: String,
    trace: Tracing,
}

impl GitHubClient {
    /// Create a client for the API rooted at `api_base` (no trailing `/`).
    pub fn new(context: Arc<HostContext>, http: Client, api_base: impl Into<String>) -> Self {
        let trace = context.get_trace("GitHubClient");
        Self {
            context,
            http,
            api_base: api_base.into(),
            trace,
        }
    }

    /// Exchange an App JWT for an installation access token.
    pub async fn create_installation_token(
        &self,
        app_jwt: &str,
        installation_id: i64,
    ) -> Result<GitHubToken, ApiError> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_base, installation_id
        );
        self.trace.info(&format!(
            "Requesting installation access token for installation {}",
            installation_id
        ));

        let token = self
            .post_for_token("Create installation access token", &url, app_jwt)
            .await?;
        self.context.add_secret(&token.token);
        Ok(token)
    }

    /// Mint a runner registration or removal token for `organization`.
    pub async fn create_runner_token(
        &self,
        token_type: TokenType,
        organization: &str,
        installation_token: &str,
    ) -> Result<GitHubToken, ApiError> {
        let url = format!(
            "{}/orgs/{}/actions/runners/{}",
            self.api_base,
            organization,
            token_type.endpoint()
        );
        self.trace.info(&format!(
            "Requesting runner {} token for organization '{}'",
            token_type.describe(),
            organization
        ));

        let operation = format!("Create {} token", token_type.describe());
        let token = self
            .post_for_token(&operation, &url, installation_token)
            .await?;
        self.context.add_secret(&token.token);
        Ok(token)
    }

    fn request(&self, builder: RequestBuilder, bearer: &str) -> RequestBuilder {
        builder
            .bearer_auth(bearer)
            .header(reqwest::header::ACCEPT, github::ACCEPT)
            .header(github::API_VERSION_HEADER, github::API_VERSION)
    }

    async fn post_for_token(
        &self,
        operation: &str,
        url: &str,
        bearer: &str,
    ) -> Result<GitHubToken, ApiError> {
        self.trace.verbose(&format!("POST {}", url));

        let response = self
            .request(self.http.post(url), bearer)
            .send()
            .await
            .map_err(|e| ApiError::transport(operation, e))?;

        let status = response.status();
        if !status.is_success() {
            let err = ApiError::from_response(operation, response).await;
            self.trace.error(&err.to_string());
            return Err(err);
        }

        let token: GitHubToken = response
            .json()
            .await
            .map_err(|e| ApiError::invalid_response(operation, e.to_string()))?;

        if token.token.is_empty() {
            return Err(ApiError::invalid_response(operation, "empty token"));
        }

        self.trace.verbose(&format!(
            "{} succeeded with HTTP {} (expires at {})",
            operation,
            status.as_u16(),
            token.expires_at.as_deref().unwrap_or("unknown")
        ));

        Ok(token)
    }
}
