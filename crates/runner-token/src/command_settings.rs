// CommandSettings: command-line flags with environment variable fallbacks.

use clap::builder::BoolishValueParser;
use clap::Parser;
use runner_token_common::constants;

use crate::configuration::options::{AzureAuthMethod, OutputMethod, TokenType};

/// Fetch a GitHub Actions self-hosted runner registration or removal token
/// for an organization, authenticating as a GitHub App.
#[derive(Parser, Debug, Clone)]
#[command(name = "github-runner-token", version)]
pub struct CommandSettings {
    /// Enables debug mode.
    #[arg(long, env = "RUNNER_TOKEN_DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: bool,

    /// Token type to get from GitHub (REGISTER or REMOVE).
    #[arg(long, env = "RUNNER_TOKEN_TYPE", default_value = "REGISTER")]
    pub token_type: TokenType,

    /// The Azure authentication method (ENV or CLI).
    #[arg(long = "azure-auth", env = "RUNNER_TOKEN_AZURE_AUTH", default_value = "ENV")]
    pub azure_auth: AzureAuthMethod,

    /// How should the output be printed (TOKEN or JSON).
    #[arg(long, env = "RUNNER_TOKEN_OUTPUT", default_value = "TOKEN")]
    pub output: OutputMethod,

    /// Name of the GitHub organization.
    #[arg(long, env = "GITHUB_ORGANIZATION", default_value = "")]
    pub organization: String,

    /// Application ID of the GitHub App.
    #[arg(long, env = "GITHUB_APP_ID", default_value_t = 0)]
    pub app_id: i64,

    /// Installation ID of the GitHub App.
    #[arg(long, env = "GITHUB_INSTALLATION_ID", default_value_t = 0)]
    pub installation_id: i64,

    /// The private key (PEM format) from the GitHub App.
    #[arg(long, env = "GITHUB_APP_PRIVATE_KEY_PATH", default_value = "")]
    pub private_key_path: String,

    /// Should parameters be extracted from Azure KeyVault.
    #[arg(
        long = "use-azure-keyvault",
        env = "RUNNER_TOKEN_USE_AZURE_KEYVAULT",
        value_parser = BoolishValueParser::new()
    )]
    pub use_azure_keyvault: bool,

    /// The name of the Azure KeyVault containing the secrets.
    #[arg(long = "azure-keyvault-name", env = "AZURE_KEYVAULT_NAME", default_value = "")]
    pub azure_keyvault_name: String,

    /// DNS suffix of the Azure KeyVault (changes for sovereign clouds).
    #[arg(
        long = "azure-keyvault-dns-suffix",
        env = "AZURE_KEYVAULT_DNS_SUFFIX",
        default_value = constants::azure::DEFAULT_KEYVAULT_DNS_SUFFIX
    )]
    pub azure_keyvault_dns_suffix: String,

    /// The key name of the Azure KeyVault secret containing the organization name value.
    #[arg(long = "organization-kvsecret", default_value = "")]
    pub organization_kvsecret: String,

    /// The key name of the Azure KeyVault secret containing the App ID value.
    #[arg(long = "app-id-kvsecret", default_value = "")]
    pub app_id_kvsecret: String,

    /// The key name of the Azure KeyVault secret containing the Installation ID value.
    #[arg(long = "installation-id-kvsecret", default_value = "")]
    pub installation_id_kvsecret: String,

    /// The key name of the Azure KeyVault secret containing the GitHub Private Key value.
    #[arg(long = "private-key-kvsecret", default_value = "")]
    pub private_key_kvsecret: String,

    /// Base URL of the GitHub REST API (set for GitHub Enterprise Server).
    #[arg(
        long = "github-api-url",
        env = "GITHUB_API_URL",
        default_value = constants::github::DEFAULT_API_URL
    )]
    pub github_api_url: String,
}

impl CommandSettings {
    /// One-line description of the requested operation, free of secret material.
    pub fn sanitized_summary(&self) -> String {
        if self.use_azure_keyvault {
            format!(
                "token-type={} output={} source=keyvault vault={} auth={} api={}",
                self.token_type,
                self.output,
                self.azure_keyvault_name,
                self.azure_auth,
                self.github_api_url
            )
        } else {
            format!(
                "token-type={} output={} source=flags organization={} app-id={} installation-id={} api={}",
                self.token_type,
                self.output,
                self.organization,
                self.app_id,
                self.installation_id,
                self.github_api_url
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lock_env;

    fn parse(args: &[&str]) -> Result<CommandSettings, clap::Error> {
        let _env = lock_env();
        let mut full = vec!["github-runner-token"];
        full.extend_from_slice(args);
        CommandSettings::try_parse_from(full)
    }

    #[test]
    fn test_defaults() {
        let settings = parse(&[]).unwrap();
        assert_eq!(settings.token_type, TokenType::Register);
        assert_eq!(settings.azure_auth, AzureAuthMethod::Env);
        assert_eq!(settings.output, OutputMethod::Token);
        assert!(!settings.use_azure_keyvault);
        assert!(!settings.debug);
        assert_eq!(settings.app_id, 0);
        assert_eq!(settings.azure_keyvault_dns_suffix, "vault.azure.net");
    }

    #[test]
    fn test_parse_flag_credentials() {
        let settings = parse(&[
            "--token-type",
            "REMOVE",
            "--output",
            "JSON",
            "--organization",
            "octo-org",
            "--app-id",
            "1234",
            "--installation-id",
            "5678",
            "--private-key-path",
            "/etc/app.pem",
        ])
        .unwrap();
        assert_eq!(settings.token_type, TokenType::Remove);
        assert_eq!(settings.output, OutputMethod::Json);
        assert_eq!(settings.organization, "octo-org");
        assert_eq!(settings.app_id, 1234);
        assert_eq!(settings.installation_id, 5678);
        assert_eq!(settings.private_key_path, "/etc/app.pem");
    }

    #[test]
    fn test_parse_keyvault_settings() {
        let settings = parse(&[
            "--use-azure-keyvault",
            "--azure-auth",
            "CLI",
            "--azure-keyvault-name",
            "runner-vault",
            "--organization-kvsecret",
            "gh-org",
            "--app-id-kvsecret",
            "gh-app-id",
            "--installation-id-kvsecret",
            "gh-installation-id",
            "--private-key-kvsecret",
            "gh-private-key",
        ])
        .unwrap();
        assert!(settings.use_azure_keyvault);
        assert_eq!(settings.azure_auth, AzureAuthMethod::Cli);
        assert_eq!(settings.azure_keyvault_name, "runner-vault");
        assert_eq!(settings.private_key_kvsecret, "gh-private-key");
    }

    #[test]
    fn test_invalid_token_type_is_rejected() {
        let err = parse(&["--token-type", "register"]).unwrap_err();
        assert!(err
            .to_string()
            .contains("Valid values for --token-type are REGISTER and REMOVE. Received: register"));
    }

    #[test]
    fn test_invalid_output_is_rejected() {
        let err = parse(&["--output", "YAML"]).unwrap_err();
        assert!(err
            .to_string()
            .contains("Valid values for --output are TOKEN and JSON. Received: YAML"));
    }

    #[test]
    fn test_non_numeric_app_id_is_rejected() {
        assert!(parse(&["--app-id", "abc"]).is_err());
    }

    #[test]
    fn test_sanitized_summary_omits_key_path() {
        let settings = parse(&[
            "--organization",
            "octo-org",
            "--private-key-path",
            "/secret/location.pem",
        ])
        .unwrap();
        let summary = settings.sanitized_summary();
        assert!(summary.contains("organization=octo-org"));
        assert!(!summary.contains("/secret/location.pem"));
    }

    #[test]
    fn test_boolean_env_vars_accept_numbers() {
        let _env = lock_env();
        std::env::set_var("RUNNER_TOKEN_DEBUG", "1");
        std::env::set_var("RUNNER_TOKEN_USE_AZURE_KEYVAULT", "0");
        let result = CommandSettings::try_parse_from(["github-runner-token"]);
        std::env::remove_var("RUNNER_TOKEN_DEBUG");
        std::env::remove_var("RUNNER_TOKEN_USE_AZURE_KEYVAULT");

        let settings = result.unwrap();
        assert!(settings.debug);
        assert!(!settings.use_azure_keyvault);
    }

    #[test]
    fn test_boolean_flags_without_value() {
        let settings = parse(&["--debug", "--use-azure-keyvault"]).unwrap();
        assert!(settings.debug);
        assert!(settings.use_azure_keyvault);
    }
}
