use anyhow::{anyhow, Result};
use reqwest::header::HeaderMap;
use url::Url;

/// URL utility functions.
pub struct UrlUtil;

impl UrlUtil {
    /// Validate a REST API base URL and return it without a trailing `/`.
    ///
    /// The URL must parse, use the `http` or `https` scheme, and have a host.
    pub fn normalize_api_base(raw: &str) -> Result<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(anyhow!("API URL cannot be empty"));
        }

        let url = Url::parse(trimmed).map_err(|e| anyhow!("Invalid URL '{}': {}", trimmed, e))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(anyhow!(
                    "URL must use HTTP or HTTPS scheme, got '{}'",
                    scheme
                ));
            }
        }

        if url.host_str().is_none() {
            return Err(anyhow!("URL must have a host"));
        }

        Ok(trimmed.trim_end_matches('/').to_string())
    }

    /// Checks whether the given API URL points to hosted GitHub (github.com / ghe.com)
    /// rather than a GitHub Enterprise Server instance.
    pub fn is_hosted_server(url: &Url) -> bool {
        let host = match url.host_str() {
            Some(h) => h.to_lowercase(),
            None => return false,
        };

        host == "github.com"
            || host == "api.github.com"
            || host.ends_with(".ghe.com")
    }

    /// Extract the `x-github-request-id` header value from an HTTP response's headers.
    pub fn get_github_request_id(headers: &HeaderMap) -> Option<String> {
        headers
            .get("x-github-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }
}
