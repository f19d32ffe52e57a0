//! TLS bootstrap tests: certificate verification strictness must reach the
//! transport exactly as the caller configured it.

use cirrus::client::connect;
use cirrus::{ConnectionOptions, Error, TlsOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

// Tests in this binary share the process-wide transport registry.
static REGISTRY_GUARD: Mutex<()> = Mutex::new(());

struct TestCa {
    cert_pem: String,
    acceptor: TlsAcceptor,
}

fn test_ca() -> TestCa {
    let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
    let cert_der = cert.serialize_der().unwrap();
    let key_der = cert.serialize_private_key_der();

    let config = rustls::ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth()
        .with_single_cert(
            vec![rustls::Certificate(cert_der)],
            rustls::PrivateKey(key_der),
        )
        .unwrap();

    TestCa {
        cert_pem: cert.serialize_pem().unwrap(),
        acceptor: TlsAcceptor::from(Arc::new(config)),
    }
}

async fn spawn_tls_listener(acceptor: TlsAcceptor) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            // handshake failures are expected in the strict-verification test
            if let Ok(stream) = acceptor.accept(socket).await {
                held.push(stream);
            }
        }
    });
    addr
}

#[tokio::test]
async fn disabled_verification_reaches_the_transport() {
    let _guard = REGISTRY_GUARD.lock().unwrap();

    let ca = test_ca();
    let addr = spawn_tls_listener(ca.acceptor).await;

    let opts = ConnectionOptions::new()
        .server(format!("tls://127.0.0.1:{}", addr.port()))
        .tls(TlsOptions::new().verify(false));

    let mut conn = connect(opts).await.unwrap();
    assert!(conn.is_encrypted());
    let tls = conn.options().tls.as_ref().unwrap();
    assert!(!tls.verify);
    conn.close().await.unwrap();
}

#[tokio::test]
async fn default_verification_rejects_unknown_issuers() {
    let _guard = REGISTRY_GUARD.lock().unwrap();

    let ca = test_ca();
    let addr = spawn_tls_listener(ca.acceptor).await;

    let opts = ConnectionOptions::new()
        .server(format!("tls://127.0.0.1:{}", addr.port()))
        .tls(TlsOptions::default());

    let err = connect(opts).await.unwrap_err();
    assert!(matches!(err, Error::Tls(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn supplied_ca_and_server_name_verify_strictly() {
    let _guard = REGISTRY_GUARD.lock().unwrap();

    let ca = test_ca();
    let addr = spawn_tls_listener(ca.acceptor).await;

    let mut ca_file = tempfile::NamedTempFile::new().unwrap();
    ca_file.write_all(ca.cert_pem.as_bytes()).unwrap();

    let opts = ConnectionOptions::new()
        .server(format!("tls://127.0.0.1:{}", addr.port()))
        .tls(
            TlsOptions::new()
                .ca_file(ca_file.path())
                .server_name("localhost"),
        );

    let mut conn = connect(opts).await.unwrap();
    assert!(conn.is_encrypted());
    conn.close().await.unwrap();
}

#[tokio::test]
async fn tls_options_alone_request_encryption() {
    let _guard = REGISTRY_GUARD.lock().unwrap();

    let ca = test_ca();
    let addr = spawn_tls_listener(ca.acceptor).await;

    // plain scheme, but the presence of TLS options selects the TLS transport
    let opts = ConnectionOptions::new()
        .server(format!("127.0.0.1:{}", addr.port()))
        .tls(TlsOptions::new().verify(false));

    let conn = connect(opts).await.unwrap();
    assert!(conn.is_encrypted());
}
