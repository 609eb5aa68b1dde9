// Credentials module: where the GitHub App credentials come from.

pub mod credential_manager;
pub mod credential_provider;

pub use credential_manager::CredentialManager;
pub use credential_provider::{
    AppCredentialSource, AppCredentials, FlagCredentialSource, KeyVaultCredentialSource,
};
