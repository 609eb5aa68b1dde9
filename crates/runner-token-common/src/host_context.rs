// HostContext: the process-wide application context.
// Owns the secret masker, the trace manager and the proxy settings, and
// hands out trace sources and HTTP clients built from them.

use crate::http_client_factory::HttpClientFactory;
use crate::secret_masker::SecretMasker;
use crate::tracing::{TraceEventType, TraceManager, TraceSetting, Tracing};

use anyhow::Result;
use reqwest::Client;
use runner_token_sdk::RunnerWebProxy;
use std::sync::Arc;

/// The central application context shared by every component.
pub struct HostContext {
    /// Secret masker shared across the entire process.
    pub secret_masker: Arc<SecretMasker>,

    /// Web proxy configuration read from environment variables.
    pub web_proxy: RunnerWebProxy,

    /// Trace manager for creating per-component trace sources.
    trace_manager: TraceManager,
}

impl HostContext {
    /// Create a new `HostContext`, reading proxy settings from the environment.
    ///
    /// `debug` lowers the trace threshold to verbose.
    pub fn new(debug: bool) -> Arc<Self> {
        Self::with_proxy(debug, RunnerWebProxy::new())
    }

    /// Create a new `HostContext` with explicit proxy settings.
    pub fn with_proxy(debug: bool, web_proxy: RunnerWebProxy) -> Arc<Self> {
        let secret_masker = Arc::new(SecretMasker::new());

        // Register proxy passwords as secrets
        for password in web_proxy.secrets() {
            secret_masker.add_value(password);
        }

        let level = if debug {
            TraceEventType::Verbose
        } else {
            TraceEventType::Information
        };
        let trace_manager = TraceManager::with_setting(secret_masker.clone(), TraceSetting { level });

        Arc::new(Self {
            secret_masker,
            web_proxy,
            trace_manager,
        })
    }

    /// Get a named trace source.
    pub fn get_trace(&self, name: &str) -> Tracing {
        self.trace_manager.get(name)
    }

    /// Register a value that must never appear in diagnostics.
    pub fn add_secret(&self, value: &str) {
        self.secret_masker.add_value(value);
    }

    /// Create an HTTP client honouring the proxy settings.
    pub fn create_http_client(&self) -> Result<Client> {
        HttpClientFactory::create_client(&self.web_proxy)
    }
}
