// TokenCommand: the single operation of the tool.
//
//   credentials → App JWT → installation access token → runner token → output

use anyhow::{Context, Result};
use chrono::Utc;
use runner_token_common::{HostContext, Tracing};
use runner_token_sdk::{TraceWriter, UrlUtil};
use std::sync::Arc;
use url::Url;

use crate::configuration::Configuration;
use crate::credentials::{AppCredentialSource, CredentialManager};
use crate::github::{generate_app_jwt, GitHubClient};
use crate::output;

pub struct TokenCommand {
    context: Arc<HostContext>,
    trace: Tracing,
    config: Configuration,
}

impl TokenCommand {
    pub fn new(context: Arc<HostContext>, config: Configuration) -> Self {
        let trace = context.get_trace("TokenCommand");
        Self {
            context,
            trace,
            config,
        }
    }

    /// Fetch the runner token and render it for stdout.
    pub async fn execute(&self) -> Result<String> {
        let source = CredentialManager::create_source(&self.context, &self.config.source)?;
        self.execute_with_source(source.as_ref()).await
    }

    /// Same as [`execute`](Self::execute) with an explicit credential source.
    pub async fn execute_with_source(&self, source: &dyn AppCredentialSource) -> Result<String> {
        let token_type = self.config.token_type;

        self.trace
            .info(&format!("Loading GitHub App credentials from {}", source.name()));
        let credentials = source.load().await?;
        self.trace.info(&format!(
            "Using GitHub App {} (installation {}) for organization '{}'",
            credentials.app_id, credentials.installation_id, credentials.organization
        ));

        let app_jwt = generate_app_jwt(credentials.app_id, &credentials.private_key_pem, Utc::now())?;
        self.context.add_secret(&app_jwt);
        self.trace.verbose("Signed GitHub App JWT");

        if let Ok(api) = Url::parse(&self.config.github_api_url) {
            if !UrlUtil::is_hosted_server(&api) {
                self.trace.info(&format!(
                    "Using GitHub Enterprise Server API at {}",
                    self.config.github_api_url
                ));
            }
        }

        let http = self.context.create_http_client()?;
        let github = GitHubClient::new(self.context.clone(), http, self.config.github_api_url.as_str());

        let installation_token = github
            .create_installation_token(&app_jwt, credentials.installation_id)
            .await
            .context("Unable to get installation access token")?;

        let runner_token = github
            .create_runner_token(token_type, &credentials.organization, &installation_token.token)
            .await
            .with_context(|| format!("Unable to get {} token", token_type.describe()))?;
        self.trace.info(&format!(
            "Received {} token (expires at {})",
            token_type.describe(),
            runner_token.expires_at.as_deref().unwrap_or("unknown")
        ));

        output::render(
            self.config.output,
            token_type,
            &credentials.organization,
            &runner_token,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{
        AzureAuthMethod, CredentialSourceConfig, KeyVaultSecretNames, OutputMethod, TokenType,
    };
    use crate::credentials::KeyVaultCredentialSource;
    use crate::github::AppClaims;
    use crate::keyvault::{KeyVaultClient, VaultTokenProvider};
    use crate::test_support::{spawn_server, test_context, TEST_KEY};
    use async_trait::async_trait;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
    use serde_json::json;
    use std::io::Write;

    fn bearer(headers: &HeaderMap) -> String {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .unwrap_or_default()
            .to_string()
    }

    /// GitHub plus a Key Vault holding the App credentials.
    fn router() -> Router {
        Router::new()
            .route(
                "/app/installations/:id/access_tokens",
                post(|Path(id): Path<i64>, headers: HeaderMap| async move {
                    let key = DecodingKey::from_rsa_pem(TEST_KEY.public_pem.as_bytes()).unwrap();
                    let claims = decode::<AppClaims>(
                        &bearer(&headers),
                        &key,
                        &Validation::new(Algorithm::RS256),
                    );
                    match claims {
                        Ok(data) if data.claims.iss == "42" && id == 4242 => (
                            StatusCode::CREATED,
                            Json(json!({"token": "ghs_installation", "expires_at": "2026-10-19T13:00:00Z"})),
                        ),
                        _ => (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"message": "A JSON web token could not be decoded"})),
                        ),
                    }
                }),
            )
            .route(
                "/orgs/:org/actions/runners/:kind",
                post(
                    |Path((org, kind)): Path<(String, String)>, headers: HeaderMap| async move {
                        if bearer(&headers) != "ghs_installation" {
                            return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Bad credentials"})));
                        }
                        if org != "octo-org" {
                            return (StatusCode::NOT_FOUND, Json(json!({"message": "Not Found"})));
                        }
                        let token = if kind == "remove-token" { "AREMOVE" } else { "AREGISTER" };
                        (
                            StatusCode::CREATED,
                            Json(json!({"token": token, "expires_at": "2026-10-19T13:00:00.000+00:00"})),
                        )
                    },
                ),
            )
            .route(
                "/secrets/:name",
                get(|Path(name): Path<String>| async move {
                    let value = match name.as_str() {
                        "gh-org" => "octo-org".to_string(),
                        "gh-app-id" => "42".to_string(),
                        "gh-installation-id" => "4242\n".to_string(),
                        "gh-private-key" => TEST_KEY.private_pem.clone(),
                        _ => return (StatusCode::NOT_FOUND, Json(json!({"error": {"code": "SecretNotFound"}}))),
                    };
                    (StatusCode::OK, Json(json!({ "value": value })))
                }),
            )
    }

    fn config(
        api: &str,
        token_type: TokenType,
        output: OutputMethod,
        source: CredentialSourceConfig,
    ) -> Configuration {
        Configuration {
            token_type,
            output,
            debug: true,
            github_api_url: api.to_string(),
            source,
        }
    }

    fn key_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TEST_KEY.private_pem.as_bytes()).unwrap();
        file
    }

    fn flags(organization: &str, key: &tempfile::NamedTempFile) -> CredentialSourceConfig {
        CredentialSourceConfig::Flags {
            organization: organization.to_string(),
            app_id: 42,
            installation_id: 4242,
            private_key_path: key.path().to_path_buf(),
        }
    }

    struct StaticProvider;

    #[async_trait]
    impl VaultTokenProvider for StaticProvider {
        async fn get_token(&self) -> Result<String> {
            Ok("vault-access-token".to_string())
        }

        fn name(&self) -> &'static str {
            "static"
        }
    }

    #[tokio::test]
    async fn register_token_from_flags() {
        let api = spawn_server(router()).await;
        let key = key_file();
        let command = TokenCommand::new(
            test_context(),
            config(&api, TokenType::Register, OutputMethod::Token, flags("octo-org", &key)),
        );
        assert_eq!(command.execute().await.unwrap(), "AREGISTER");
    }

    #[tokio::test]
    async fn remove_token_as_json() {
        let api = spawn_server(router()).await;
        let key = key_file();
        let command = TokenCommand::new(
            test_context(),
            config(&api, TokenType::Remove, OutputMethod::Json, flags("octo-org", &key)),
        );
        assert_eq!(
            command.execute().await.unwrap(),
            r#"{"token_type":"REMOVE","token":"AREMOVE","organization":"octo-org","expires_at":"2026-10-19T13:00:00.000+00:00"}"#
        );
    }

    #[tokio::test]
    async fn register_token_from_keyvault() {
        let api = spawn_server(router()).await;
        let context = test_context();
        let secrets = KeyVaultSecretNames {
            organization: "gh-org".to_string(),
            app_id: "gh-app-id".to_string(),
            installation_id: "gh-installation-id".to_string(),
            private_key: "gh-private-key".to_string(),
        };
        let source_config = CredentialSourceConfig::KeyVault {
            vault_name: "runner-vault".to_string(),
            dns_suffix: "vault.azure.net".to_string(),
            auth_method: AzureAuthMethod::Env,
            secrets: secrets.clone(),
        };
        let client = KeyVaultClient::with_base_url(
            &context,
            context.create_http_client().unwrap(),
            &api,
            Box::new(StaticProvider),
        );
        let source = KeyVaultCredentialSource::new(&context, client, secrets);

        let command = TokenCommand::new(
            context.clone(),
            config(&api, TokenType::Register, OutputMethod::Json, source_config),
        );
        let rendered = command.execute_with_source(&source).await.unwrap();
        assert_eq!(
            rendered,
            r#"{"token_type":"REGISTER","token":"AREGISTER","organization":"octo-org","expires_at":"2026-10-19T13:00:00.000+00:00"}"#
        );
        assert_eq!(
            context.secret_masker.mask_secrets("ghs_installation AREGISTER"),
            "*** ***"
        );
    }

    #[tokio::test]
    async fn unknown_organization_fails_with_context() {
        let api = spawn_server(router()).await;
        let key = key_file();
        let command = TokenCommand::new(
            test_context(),
            config(&api, TokenType::Remove, OutputMethod::Token, flags("other-org", &key)),
        );
        let err = command.execute().await.unwrap_err();
        assert_eq!(err.to_string(), "Unable to get remove token");
        assert!(format!("{err:#}").contains("HTTP 404: Not Found"));
    }

    #[tokio::test]
    async fn invalid_private_key_fails_before_any_request() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a pem key").unwrap();
        let command = TokenCommand::new(
            test_context(),
            config(
                "http://127.0.0.1:9",
                TokenType::Register,
                OutputMethod::Token,
                flags("octo-org", &file),
            ),
        );
        let err = command.execute().await.unwrap_err();
        assert_eq!(err.to_string(), "Unable to parse GitHub App private key");
    }
}
