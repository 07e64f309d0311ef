use anyhow::Context;
use clap::Parser;
use std::{process::exit, sync::Arc};
use tokio::{
    net::TcpListener,
    signal::{self, unix::SignalKind},
};
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;
use version_api::{
    config::Config,
    metadata::MetadataCache,
    resolver::VersionConfig,
    routes::{AppState, Services, build_router},
    services::version::{DefaultVersionService, DefaultVersionServiceArgs},
};

/// Serves the version and build information of an application.
#[derive(Parser)]
#[clap(version)]
struct Cli {
    /// The path to the config file.
    #[clap(short, long)]
    config_path: Option<String>,
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install ctrl-c handler");
    };

    let terminate = async {
        signal::unix::signal(SignalKind::terminate()).expect("failed to install signal handler").recv().await;
    };

    tokio::select! {
        _ = ctrl_c => {
            info!("Received ctrl-c");
        },
        _ = terminate => {
            info!("Received SIGTERM");
        },
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let Config { server, application_name, environment, version, metadata } = config;
    let metadata = MetadataCache::new(metadata.source());
    info!("Using {} build metadata entries", metadata.get().len());

    info!("Serving version {version} of {application_name}, default environment is {environment}");
    let config = VersionConfig { application_name, environment, version };
    let service = DefaultVersionService::new(DefaultVersionServiceArgs { config, metadata });
    let state = AppState { services: Services { version: Arc::new(service) } };
    let router = build_router(state);

    let bind_endpoint = server.bind_endpoint;
    info!("Running server on {bind_endpoint}");
    let listener = TcpListener::bind(bind_endpoint).await.context("failed to bind")?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await.context("failed to serve")?;
    info!("Shutting down");
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy())
        .init();

    let Cli { config_path } = Cli::parse();
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {e:#}");
            exit(1);
        }
    };
    if let Err(e) = run(config).await {
        error!("Failed to run server: {e:#}");
        exit(1);
    }
}
