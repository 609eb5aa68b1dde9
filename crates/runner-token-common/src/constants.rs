// Constants shared across the runner token crates.
// Endpoints, API versions, environment variable names and exit codes.

use std::time::Duration;

/// Timeout applied to every outbound HTTP request.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Process exit codes.
pub mod return_code {
    pub const SUCCESS: i32 = 0;
    pub const TERMINATED_ERROR: i32 = 1;
}

/// GitHub REST API constants.
pub mod github {
    /// Default REST API base for github.com.
    pub const DEFAULT_API_URL: &str = "https://api.github.com";

    /// Media type requested on every call.
    pub const ACCEPT: &str = "application/vnd.github+json";

    /// Value of the `X-GitHub-Api-Version` header.
    pub const API_VERSION: &str = "2022-11-28";

    /// Header carrying the REST API version.
    pub const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

    /// App JWTs are backdated to tolerate clock drift between us and GitHub.
    pub const JWT_BACKDATE_SECONDS: i64 = 60;

    /// Lifetime of an App JWT measured from now. GitHub rejects anything
    /// further than ten minutes out.
    pub const JWT_LIFETIME_SECONDS: i64 = 540;
}

/// Azure Key Vault and Azure AD constants.
pub mod azure {
    /// Key Vault data-plane API version.
    pub const KEYVAULT_API_VERSION: &str = "7.4";

    /// DNS suffix of vaults in the public cloud. Access tokens are requested
    /// for `https://{suffix}`.
    pub const DEFAULT_KEYVAULT_DNS_SUFFIX: &str = "vault.azure.net";

    /// Azure AD authority in the public cloud.
    pub const DEFAULT_AUTHORITY_HOST: &str = "https://login.microsoftonline.com";

    /// Instance metadata service token endpoint used for managed identities.
    pub const IMDS_TOKEN_ENDPOINT: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

    /// Instance metadata service API version.
    pub const IMDS_API_VERSION: &str = "2018-02-01";
}

/// Environment variable names read at runtime.
pub mod variables {
    pub const AZURE_TENANT_ID: &str = "AZURE_TENANT_ID";
    pub const AZURE_CLIENT_ID: &str = "AZURE_CLIENT_ID";
    pub const AZURE_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
    pub const AZURE_AUTHORITY_HOST: &str = "AZURE_AUTHORITY_HOST";

    /// Disables TLS certificate verification when truthy. Test environments only.
    pub const TLS_NO_VERIFY: &str = "GITHUB_RUNNER_TOKEN_TLS_NO_VERIFY";
}
