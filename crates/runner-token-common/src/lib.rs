// runner-token-common: Shared services and infrastructure for the runner token tool.
// Depends on `runner-token-sdk`.

pub mod constants;
pub mod errors;
pub mod host_context;
pub mod http_client_factory;
pub mod secret_masker;
pub mod tracing;

// ---------------------------------------------------------------------------
// Re-exports for convenient access
// ---------------------------------------------------------------------------

pub use errors::ApiError;
pub use host_context::HostContext;
pub use http_client_factory::HttpClientFactory;
pub use secret_masker::SecretMasker;
pub use tracing::{TraceEventType, TraceManager, TraceSetting, Tracing};
