// Validation of organization logins and Azure Key Vault names.
// Values end up in request URLs, so anything outside the documented
// character sets is rejected before a request is built.

use anyhow::{anyhow, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length accepted for an organization login.
const MAX_ORGANIZATION_LENGTH: usize = 100;

/// Organization logins: alphanumerics with `-`, `_` or `.` inside.
static ORGANIZATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9_.-]*[A-Za-z0-9_])?$").expect("Invalid organization regex")
});

/// Vault names: 3-24 characters, start with a letter, end with a letter or digit.
static VAULT_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9-]{1,22}[A-Za-z0-9]$").expect("Invalid vault name regex")
});

/// Secret names: 1-127 alphanumerics and hyphens.
static SECRET_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]{1,127}$").expect("Invalid secret name regex"));

/// Validate a GitHub organization login.
pub fn validate_organization(organization: &str) -> Result<()> {
    if organization.is_empty() {
        return Err(anyhow!("Organization cannot be empty"));
    }

    if organization.len() > MAX_ORGANIZATION_LENGTH {
        return Err(anyhow!(
            "Organization must be at most {} characters (got {})",
            MAX_ORGANIZATION_LENGTH,
            organization.len()
        ));
    }

    if !ORGANIZATION_REGEX.is_match(organization) {
        return Err(anyhow!(
            "Organization '{}' contains invalid characters",
            organization
        ));
    }

    Ok(())
}

/// Validate an Azure Key Vault name.
pub fn validate_vault_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("Vault name cannot be empty"));
    }

    if !VAULT_NAME_REGEX.is_match(name) || name.contains("--") {
        return Err(anyhow!(
            "Vault name '{}' must be 3-24 characters of letters, digits and single hyphens, \
             starting with a letter and ending with a letter or digit",
            name
        ));
    }

    Ok(())
}

/// Validate an Azure Key Vault secret name.
pub fn validate_secret_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(anyhow!("Secret name cannot be empty"));
    }

    if !SECRET_NAME_REGEX.is_match(name) {
        return Err(anyhow!(
            "Secret name '{}' may only contain letters, digits and hyphens (max 127)",
            name
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_organization() {
        assert!(validate_organization("octo-org").is_ok());
        assert!(validate_organization("Octo123").is_ok());
        assert!(validate_organization("a").is_ok());
        assert!(validate_organization("acme_emu").is_ok());
    }

    #[test]
    fn test_invalid_organization() {
        assert!(validate_organization("").is_err());
        assert!(validate_organization("-leading").is_err());
        assert!(validate_organization("trailing-").is_err());
        assert!(validate_organization("octo/org").is_err());
        assert!(validate_organization("octo org").is_err());
        assert!(validate_organization("../admin").is_err());
        assert!(validate_organization(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_valid_vault_name() {
        assert!(validate_vault_name("runner-vault").is_ok());
        assert!(validate_vault_name("kv1").is_ok());
        assert!(validate_vault_name(&format!("a{}", "b".repeat(23))).is_ok());
    }

    #[test]
    fn test_invalid_vault_name() {
        assert!(validate_vault_name("").is_err());
        assert!(validate_vault_name("kv").is_err());
        assert!(validate_vault_name("1vault").is_err());
        assert!(validate_vault_name("vault-").is_err());
        assert!(validate_vault_name("my--vault").is_err());
        assert!(validate_vault_name(&"a".repeat(25)).is_err());
        assert!(validate_vault_name("vault.evil.com").is_err());
    }

    #[test]
    fn test_secret_names() {
        assert!(validate_secret_name("github-app-private-key").is_ok());
        assert!(validate_secret_name("").is_err());
        assert!(validate_secret_name("name/with/slash").is_err());
        assert!(validate_secret_name("under_score").is_err());
        assert!(validate_secret_name(&"a".repeat(128)).is_err());
    }
}
