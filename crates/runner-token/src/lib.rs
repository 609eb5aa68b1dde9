// runner-token: fetch a GitHub Actions self-hosted runner registration or
// removal token for an organization, authenticating as a GitHub App.
//
// Architecture:
//   main → CommandSettings → Configuration → TokenCommand::execute
//   TokenCommand: AppCredentialSource (flags | Azure Key Vault)
//                 → App JWT → installation token → runner token → output

pub mod command_settings;
pub mod configuration;
pub mod credentials;
pub mod github;
pub mod keyvault;
pub mod output;
pub mod runner_token;

#[cfg(test)]
pub(crate) mod test_support;
