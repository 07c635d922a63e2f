//! Static TLS certificate loading for the proxy listener.

use axum_server::tls_rustls::RustlsConfig;
use rustls::crypto::CryptoProvider;
use std::path::Path;

use crate::config::TlsConfig;

/// Make aws-lc-rs the process-wide rustls provider.
///
/// `kube` compiles in `ring` and `axum-server` compiles in `aws-lc-rs`, so
/// rustls cannot choose one on its own. Must run before any TLS config or
/// Kubernetes client is built; later calls are no-ops.
pub fn install_crypto_provider() {
    if CryptoProvider::get_default().is_none() {
        let _ = CryptoProvider::install_default(rustls::crypto::aws_lc_rs::default_provider());
    }
}

/// Load the listener's certificate chain and private key from PEM files.
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, std::io::Error> {
    let cert_path = Path::new(&config.cert_path);
    let key_path = Path::new(&config.key_path);

    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    install_crypto_provider();
    RustlsConfig::from_pem_file(cert_path, key_path).await
}
