//! datamgr service binary.
//!
//! # Architecture Overview
//!
//! ```text
//!   startup:  datamgr.yaml ──▶ receive::compile ──▶ Arc<Schema>
//!
//!   request:  POST /signup ──▶ http::server ──▶ routing (exact path)
//!                                   │
//!                                   ▼
//!                            http::form (urlencoded | multipart)
//!                                   │
//!                                   ▼
//!                  pipeline::record (field resolution, all errors)
//!                                   │
//!                                   ▼
//!            pipeline::template ──▶ pipeline::materialize (YAML file)
//!                                   │
//!                                   ▼
//!                         303 redirect / 400 / 500 / 404
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::net::TcpListener;

use datamgr::lifecycle::signals::forward_stop_signal;
use datamgr::lifecycle::startup::{load_schema, resolve_config, Overrides};
use datamgr::observability::{logging, metrics};
use datamgr::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "datamgr")]
#[command(about = "Receive form submissions and store them as files", long_about = None)]
struct Cli {
    /// Listen address, e.g. ":8080" or "127.0.0.1:8080"
    #[arg(short, long)]
    listen: Option<String>,

    /// Optional TOML service configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Receive schema document (default: datamgr.yaml)
    #[arg(short, long)]
    schema: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");
            eprintln!("datamgr: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolve_config(
        cli.config.as_deref(),
        Overrides {
            listen: cli.listen,
            schema: cli.schema,
        },
    )?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!("datamgr v{} starting", env!("CARGO_PKG_VERSION"));

    let schema = load_schema(&config.schema.path)?;
    tracing::info!(
        schema = %config.schema.path.display(),
        routes = schema.len(),
        output_root = %config.output.root.display(),
        directory_policy = ?config.output.directory_policy,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr);
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, schema);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    let stopped = tokio::select! {
        _ = forward_stop_signal(&shutdown) => true,
        result = &mut server_task => {
            result??;
            false
        }
    };
    if stopped {
        server_task.await??;
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
