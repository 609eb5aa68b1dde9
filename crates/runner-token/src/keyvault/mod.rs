// Azure Key Vault module: access tokens for the vault and secret retrieval.

pub mod azure_credential;
pub mod client;

pub use azure_credential::{
    create_token_provider, keyvault_resource, AzureCliCredential, ClientSecretCredential, EnvironmentCredential,
    ManagedIdentityCredential, ProcessExitCodeError, VaultTokenProvider,
};
pub use client::KeyVaultClient;
