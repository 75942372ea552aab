//! Webhook server entry point

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use notebook_webhook::{start_server, ServerConfig};

/// Mutating admission webhook injecting readiness probes into notebook pods
#[derive(Parser, Debug)]
#[command(name = "webhook-server", version, about, long_about = None)]
struct Cli {
    /// Address to listen on. 8443 avoids needing privileged ports; the
    /// fronting Service maps 443 to it.
    #[arg(long, default_value = "0.0.0.0:8443")]
    addr: SocketAddr,

    /// Path to the TLS certificate PEM file
    #[arg(long, default_value = "/run/secrets/tls/tls.crt")]
    tls_cert: PathBuf,

    /// Path to the TLS private key PEM file
    #[arg(long, default_value = "/run/secrets/tls/tls.key")]
    tls_key: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install the aws-lc-rs crypto provider before any TLS configuration is
    // built; serving admission traffic without working TLS is not an option.
    if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
        eprintln!(
            "CRITICAL: Failed to install crypto provider: {:?}. \
             The webhook cannot serve admission traffic without a working TLS \
             implementation.",
            e
        );
        std::process::exit(1);
    }

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    start_server(ServerConfig {
        addr: cli.addr,
        cert_path: cli.tls_cert,
        key_path: cli.tls_key,
    })
    .await?;

    Ok(())
}
