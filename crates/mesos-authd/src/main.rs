use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::Parser;
use mesos_auth_client::{DEFAULT_MAX_REDIRECTS, MesosConnector};
use mesos_auth_core::{InmemStorage, MesosAuthBackend};
use mesos_auth_observe::{LoggerConfig, LoggerFormat, logger_init};
use mesos_auth_prometheus::PrometheusMetrics;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod app;
mod version;

/// Issues credentials to tasks running on a Mesos cluster.
#[derive(Parser, Debug)]
#[command(name = "mesos-authd", disable_version_flag = true)]
struct Cli {
    /// Address to serve the HTTP API on.
    #[arg(long, env = "MESOS_AUTH_LISTEN", default_value = "127.0.0.1:8200")]
    listen: SocketAddr,

    /// Tracing filter directive.
    #[arg(long, env = "MESOS_AUTH_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// text, json or journald.
    #[arg(long, env = "MESOS_AUTH_LOG_FORMAT", default_value = "text")]
    log_format: LoggerFormat,

    /// Requests allowed per master query, leader redirects included.
    #[arg(long, env = "MESOS_AUTH_MAX_REDIRECTS", default_value_t = DEFAULT_MAX_REDIRECTS)]
    max_redirects: usize,

    /// Print version and exit.
    #[arg(long)]
    version: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.version {
        println!("{}", version::human_readable());
        return Ok(());
    }

    logger_init(&LoggerConfig::new(cli.log_format, cli.log_level.as_str()))?;
    info!(version = %version::human_readable(), "starting mesos-authd");

    let metrics = Arc::new(PrometheusMetrics::new()?);
    let connector = MesosConnector::new(cli.max_redirects)?;
    let backend = MesosAuthBackend::new(Arc::new(InmemStorage::new()), connector)
        .with_metrics(metrics.clone());
    warn!("using in-memory storage; config, policies and logins are lost on restart");

    let shutdown = CancellationToken::new();
    let app = app::router(Arc::new(backend), metrics, shutdown.clone());

    let listener = TcpListener::bind(cli.listen)
        .await
        .with_context(|| format!("failed to bind to {}", cli.listen))?;
    info!(addr = %cli.listen, max_redirects = cli.max_redirects, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("http server failed")?;

    info!("shutting down");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received ctrl-c");
    shutdown.cancel();
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["mesos-authd"]).unwrap();
        assert_eq!(cli.listen, "127.0.0.1:8200".parse().unwrap());
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, LoggerFormat::Text);
        assert_eq!(cli.max_redirects, 10);
        assert!(!cli.version);
    }

    #[test]
    fn flags() {
        let cli = Cli::try_parse_from([
            "mesos-authd",
            "--listen",
            "0.0.0.0:9000",
            "--log-format",
            "json",
            "--max-redirects",
            "3",
            "--version",
        ])
        .unwrap();
        assert_eq!(cli.listen.port(), 9000);
        assert_eq!(cli.log_format, LoggerFormat::Json);
        assert_eq!(cli.max_redirects, 3);
        assert!(cli.version);
    }

    #[test]
    fn bad_log_format_is_rejected() {
        assert!(Cli::try_parse_from(["mesos-authd", "--log-format", "xml"]).is_err());
    }
}
