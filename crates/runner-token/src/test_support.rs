// Shared helpers for unit tests: a throwaway RSA key pair and an in-process
// HTTP server standing in for GitHub, Azure AD and Key Vault.

use once_cell::sync::Lazy;
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::RsaPrivateKey;
use runner_token_common::HostContext;
use runner_token_sdk::RunnerWebProxy;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A PEM encoded RSA key pair.
pub struct TestKey {
    pub private_pem: String,
    pub public_pem: String,
}

/// Generated once per test binary; RSA generation is slow in debug builds.
pub static TEST_KEY: Lazy<TestKey> = Lazy::new(|| {
    let mut rng = rand::thread_rng();
    let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("generate RSA key");
    let private_pem = private_key
        .to_pkcs8_pem(LineEnding::LF)
        .expect("encode private key")
        .to_string();
    let public_pem = private_key
        .to_public_key()
        .to_public_key_pem(LineEnding::LF)
        .expect("encode public key");
    TestKey {
        private_pem,
        public_pem,
    }
});

/// A host context with verbose traces and no proxy.
pub fn test_context() -> Arc<HostContext> {
    HostContext::with_proxy(true, RunnerWebProxy::default())
}

/// Serve `router` on an ephemeral loopback port and return its base URL.
pub async fn spawn_server(router: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve test router");
    });
    format!("http://{addr}")
}

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that read or write process environment variables.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}
