// Error types shared by the REST clients.

use reqwest::Response;
use runner_token_sdk::{StringUtil, UrlUtil};

/// Longest response body quoted back in an error message.
const MAX_BODY_IN_ERROR: usize = 512;

/// A failed call to one of the remote REST services (GitHub, Azure AD, Key Vault).
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-success status code.
    #[error("{operation} failed with HTTP {status}: {message}{}", request_id_suffix(.request_id))]
    Status {
        operation: String,
        status: u16,
        message: String,
        request_id: Option<String>,
    },

    /// The request never produced a response.
    #[error("{operation} request failed")]
    Transport {
        operation: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response body did not have the expected shape.
    #[error("{operation} returned an unexpected response: {message}")]
    InvalidResponse { operation: String, message: String },
}

fn request_id_suffix(request_id: &Option<String>) -> String {
    match request_id {
        Some(id) => format!(" (request id: {id})"),
        None => String::new(),
    }
}

impl ApiError {
    /// Wrap a transport-level failure.
    pub fn transport(operation: impl Into<String>, source: reqwest::Error) -> Self {
        ApiError::Transport {
            operation: operation.into(),
            source,
        }
    }

    /// Report a response body that could not be used.
    pub fn invalid_response(operation: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::InvalidResponse {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Build a `Status` error from an unsuccessful response, consuming the body.
    pub async fn from_response(operation: impl Into<String>, response: Response) -> Self {
        let status = response.status();
        let request_id = UrlUtil::get_github_request_id(response.headers());
        let body = response.text().await.unwrap_or_default();

        let message = match extract_message(&body) {
            Some(message) => message,
            None if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string(),
            None => StringUtil::truncate(body.trim(), MAX_BODY_IN_ERROR),
        };

        ApiError::Status {
            operation: operation.into(),
            status: status.as_u16(),
            message,
            request_id,
        }
    }

    /// The HTTP status code, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pull a human readable message out of a JSON error body.
///
/// Understands GitHub (`{"message": ...}`), Key Vault
/// (`{"error": {"code": ..., "message": ...}}`) and Azure AD
/// (`{"error": "...", "error_description": "..."}`) payloads.
pub fn extract_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    if let Some(description) = value.get("error_description").and_then(|v| v.as_str()) {
        return Some(description.to_string());
    }

    if let Some(error) = value.get("error").filter(|e| e.is_object()) {
        let code = error.get("code").and_then(|v| v.as_str());
        let message = error.get("message").and_then(|v| v.as_str());
        return match (code, message) {
            (Some(code), Some(message)) => Some(format!("{code}: {message}")),
            (None, Some(message)) => Some(message.to_string()),
            (Some(code), None) => Some(code.to_string()),
            (None, None) => None,
        };
    }

    value
        .get("message")
        .and_then(|v| v.as_str())
        .map(|m| m.to_string())
}
