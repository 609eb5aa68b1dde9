// CredentialManager: builds the credential source selected by the
// configuration.

use anyhow::{Context, Result};
use runner_token_common::HostContext;
use runner_token_sdk::TraceWriter;
use std::sync::Arc;

use super::credential_provider::{
    AppCredentialSource, FlagCredentialSource, KeyVaultCredentialSource,
};
use crate::configuration::CredentialSourceConfig;
use crate::keyvault::{create_token_provider, keyvault_resource, KeyVaultClient};

pub struct CredentialManager;

impl CredentialManager {
    /// Create the credential source described by `config`.
    pub fn create_source(
        context: &Arc<HostContext>,
        config: &CredentialSourceConfig,
    ) -> Result<Box<dyn AppCredentialSource>> {
        let trace = context.get_trace("CredentialManager");

        let source: Box<dyn AppCredentialSource> = match config {
            CredentialSourceConfig::Flags {
                organization,
                app_id,
                installation_id,
                private_key_path,
            } => Box::new(FlagCredentialSource::new(
                context.clone(),
                organization,
                *app_id,
                *installation_id,
                private_key_path.clone(),
            )),
            CredentialSourceConfig::KeyVault {
                vault_name,
                dns_suffix,
                auth_method,
                secrets,
            } => {
                let http = context.create_http_client()?;
                let resource = keyvault_resource(dns_suffix);
                let token_provider =
                    create_token_provider(context, http.clone(), *auth_method, &resource)
                        .context("Unable to create vault authorizer")?;
                let client =
                    KeyVaultClient::new(context, http, vault_name, dns_suffix, token_provider);
                Box::new(KeyVaultCredentialSource::new(context, client, secrets.clone()))
            }
        };

        trace.verbose(&format!("Using {} credential source", source.name()));
        Ok(source)
    }
}
