// GitHub module: App authentication and the REST calls that mint
// installation and runner tokens.

pub mod app_auth;
pub mod client;

pub use app_auth::{generate_app_jwt, AppClaims};
pub use client::{GitHubClient, GitHubToken};
