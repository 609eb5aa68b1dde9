// Output rendering for the runner token.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::configuration::{OutputMethod, TokenType};
use crate::github::GitHubToken;

/// The JSON document printed by `--output JSON`.
#[derive(Debug, Serialize)]
pub struct TokenOutput<'a> {
    pub token_type: TokenType,
    pub token: &'a str,
    pub organization: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<&'a str>,
}

/// Render `token` for stdout, without a trailing newline.
pub fn render(
    method: OutputMethod,
    token_type: TokenType,
    organization: &str,
    token: &GitHubToken,
) -> Result<String> {
    match method {
        OutputMethod::Token => Ok(token.token.clone()),
        OutputMethod::Json => {
            let output = TokenOutput {
                token_type,
                token: &token.token,
                organization,
                expires_at: token.expires_at.as_deref(),
            };
            serde_json::to_string(&output).context("Unable to marshal json")
        }
    }
}
