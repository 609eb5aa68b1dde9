// runner-token-sdk: Foundation layer for the runner token tool.
// This crate has ZERO dependencies on other workspace crates and provides
// the trace abstraction, string and URL helpers, and proxy settings.

pub mod build_constants;
pub mod string_util;
pub mod trace;
pub mod url_util;
pub mod web_proxy;

// Re-export commonly used items at crate root
pub use build_constants::{Package, Source};
pub use string_util::StringUtil;
pub use trace::TraceWriter;
pub use url_util::UrlUtil;
pub use web_proxy::RunnerWebProxy;
