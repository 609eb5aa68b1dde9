// HttpClientFactory: creates HTTP clients with proxy, TLS, timeout and
// User-Agent configuration.

use anyhow::Result;
use reqwest::{Client, NoProxy, Proxy};
use runner_token_sdk::{Package, RunnerWebProxy, StringUtil};

use crate::constants::{variables, HTTP_TIMEOUT};

/// Creates properly configured HTTP clients for the tool.
pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Create a new `reqwest::Client` configured with proxy and TLS settings.
    ///
    /// - HTTP and HTTPS proxy settings are read from the `RunnerWebProxy`;
    ///   `NO_PROXY` entries are honoured for both. Without proxy settings
    ///   requests go direct.
    /// - If `GITHUB_RUNNER_TOKEN_TLS_NO_VERIFY` is truthy, TLS certificate
    ///   verification is disabled (dangerous!).
    pub fn create_client(web_proxy: &RunnerWebProxy) -> Result<Client> {
        let mut builder = Client::builder()
            .user_agent(Package::user_agent())
            .timeout(HTTP_TIMEOUT);

        let no_proxy = || {
            web_proxy
                .no_proxy_string
                .as_deref()
                .and_then(NoProxy::from_string)
        };

        // Proxies come only from `RunnerWebProxy`, never from reqwest's own
        // environment detection.
        if !web_proxy.is_configured() {
            builder = builder.no_proxy();
        }

        if let Some(ref http_proxy) = web_proxy.http_proxy_address {
            let mut proxy = Proxy::http(http_proxy)?.no_proxy(no_proxy());
            if let (Some(user), Some(pass)) =
                (&web_proxy.http_proxy_username, &web_proxy.http_proxy_password)
            {
                proxy = proxy.basic_auth(user, pass);
            }
            builder = builder.proxy(proxy);
        }

        if let Some(ref https_proxy) = web_proxy.https_proxy_address {
            let mut proxy = Proxy::https(https_proxy)?.no_proxy(no_proxy());
            if let (Some(user), Some(pass)) = (
                &web_proxy.https_proxy_username,
                &web_proxy.https_proxy_password,
            ) {
                proxy = proxy.basic_auth(user, pass);
            }
            builder = builder.proxy(proxy);
        }

        if let Ok(val) = std::env::var(variables::TLS_NO_VERIFY) {
            if StringUtil::convert_to_bool(&val) == Some(true) {
                tracing::warn!("TLS certificate verification is disabled");
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        let client = builder.build()?;
        Ok(client)
    }
}
