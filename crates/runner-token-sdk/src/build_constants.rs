/// Build constants for the tool.
/// Values come from compile-time environment variables with sensible defaults.

/// Source control information.
pub struct Source;

impl Source {
    /// The commit hash from which this binary was built.
    /// Set via the `RUNNER_TOKEN_COMMIT_HASH` env var at compile time, or "N/A".
    pub const COMMIT_HASH: &'static str = match option_env!("RUNNER_TOKEN_COMMIT_HASH") {
        Some(h) => h,
        None => "N/A",
    };
}

/// Package metadata.
#[derive(Debug, Clone)]
pub struct Package;

impl Package {
    /// The semantic version of the tool.
    /// Pulled from `CARGO_PKG_VERSION` which is set by Cargo from `Cargo.toml`.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    /// The name reported in the HTTP `User-Agent` header.
    pub const PRODUCT_NAME: &'static str = "github-runner-token";

    /// The `User-Agent` header value, e.g. `github-runner-token/0.3.0`.
    pub fn user_agent() -> String {
        format!("{}/{}", Self::PRODUCT_NAME, Self::VERSION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_not_empty() {
        assert!(!Package::VERSION.is_empty());
    }

    #[test]
    fn commit_hash_has_default() {
        // Will be "N/A" unless overridden at compile time
        assert!(!Source::COMMIT_HASH.is_empty());
    }

    #[test]
    fn user_agent_contains_version() {
        let agent = Package::user_agent();
        assert!(agent.starts_with("github-runner-token/"));
        assert!(agent.ends_with(Package::VERSION));
    }
}
