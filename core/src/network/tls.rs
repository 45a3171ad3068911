use std::sync::{Arc, LazyLock};
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::{self, ClientConfig, RootCertStore, pki_types::ServerName};
use tracing::{trace, warn};

static CLIENT_CONFIG: LazyLock<Result<Arc<ClientConfig>, rustls::Error>> =
    LazyLock::new(build_client_config);

fn build_client_config() -> Result<Arc<ClientConfig>, rustls::Error> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

/// Connects to `host:port`, performs a verified TLS handshake presenting
/// `sni`, and reports whether the peer sent at least one certificate.
///
/// The certificate must chain to a web PKI root and match `sni`.
pub async fn handshake(host: &str, port: u16, sni: &str, deadline: Duration) -> bool {
    let config = match CLIENT_CONFIG.as_ref() {
        Ok(config) => config.clone(),
        Err(e) => {
            warn!("TLS client configuration unavailable: {e}");
            return false;
        }
    };

    let server_name = match ServerName::try_from(sni.to_string()) {
        Ok(name) => name,
        Err(e) => {
            trace!(host, sni, "invalid server name: {e}");
            return false;
        }
    };

    let connector = TlsConnector::from(config);
    let attempt = async {
        let stream = TcpStream::connect((host, port)).await?;
        let tls = connector.connect(server_name, stream).await?;
        let (_, session) = tls.get_ref();
        Ok::<bool, std::io::Error>(session.peer_certificates().is_some_and(|c| !c.is_empty()))
    };

    match timeout(deadline, attempt).await {
        Ok(Ok(has_cert)) => has_cert,
        Ok(Err(e)) => {
            trace!(host, sni, "tls handshake failed: {e}");
            false
        }
        Err(_elapsed) => {
            trace!(host, sni, "tls handshake timed out");
            false
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
