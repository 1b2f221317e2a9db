// # dhdnsd - DreamHost dynamic DNS daemon
//
// Thin integration layer: all DNS and reconciliation logic lives in
// dhdns-core. The daemon is responsible for:
// 1. Reading configuration from environment variables
// 2. Setting up logging
// 3. Building the provider, IP source and optional notifier
// 4. Running the engine until SIGTERM/SIGINT
//
// ## Configuration
//
// ### DreamHost
// - `DDNS_PROVIDER_API_KEY`: API key with dns-* permissions (required)
// - `DDNS_PROVIDER_API_URL`: API base URL (default https://api.dreamhost.com/)
// - `DDNS_MODE`: `dry-run` lists records but only logs writes
//
// ### Records
// - `DDNS_RECORDS`: Comma-separated list of A records to manage (required)
// - `DDNS_COMMENT`: Comment for created records; `{date}` becomes the
//   creation time, empty disables comments
//
// ### IP source
// - `DDNS_IP_SOURCE_URL`: Plain-text IP echo service (default https://api.ipify.org)
//
// ### Loop
// - `DDNS_UPDATE_INTERVAL_MINUTES`: Minutes between cycles, 1-1440 (default 60)
// - `DDNS_HTTP_TIMEOUT_SECS`: Per-request timeout, 1-300 (default 30)
//
// ### Notifications
// - `DDNS_PROWL_API_KEY`: Enables Prowl notifications when set
// - `DDNS_PROWL_APPLICATION`: Application name shown (default dhdns)
//
// ### Logging
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
// - `DDNS_LOG_DIR`: Write a daily rotated log file here instead of stdout
//
// ## Example
//
// ```bash
// export DDNS_PROVIDER_API_KEY=6SHU5P2HLDAYECUM
// export DDNS_RECORDS=home.example.com,vpn.example.com
// export DDNS_UPDATE_INTERVAL_MINUTES=15
//
// dhdnsd
// ```

mod config;
mod logging;

use anyhow::Result;
use dhdns_core::traits::Notifier;
use dhdns_core::{DdnsEngine, NotifierConfig, NotifierGate};
use dhdns_ip_http::HttpIpSource;
use dhdns_provider_dreamhost::DreamhostProvider;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::config::Config;

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = match logging::init(&config.log) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{:#}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    info!("Starting dhdnsd {}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded: {} record(s)", config.ddns.records.len());

    // One cycle runs at a time, a single-threaded runtime is enough
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let mut engine = match build_engine(&config) {
            Ok(engine) => engine,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return DdnsExitCode::ConfigError;
            }
        };

        match run_daemon(&mut engine).await {
            Ok(()) => DdnsExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {:#}", e);
                DdnsExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Wire the configured components into an engine
fn build_engine(config: &Config) -> Result<DdnsEngine> {
    let provider = DreamhostProvider::from_config(&config.ddns.provider)?;
    info!("Provider: {:?}", provider);

    let ip_source = HttpIpSource::from_config(&config.ddns.ip_source)?;
    info!("IP source: {}", ip_source.url());

    let notifier = match &config.ddns.notifier {
        Some(notifier_config) => build_notifier(notifier_config)?,
        None => {
            info!("No notification key configured, notifications disabled");
            None
        }
    };

    let engine = DdnsEngine::new(
        Box::new(provider),
        Box::new(ip_source),
        NotifierGate::from_option(notifier),
        &config.ddns,
    )?;
    Ok(engine)
}

#[cfg(feature = "prowl")]
fn build_notifier(config: &NotifierConfig) -> Result<Option<Box<dyn Notifier>>> {
    let notifier = dhdns_notify_prowl::ProwlNotifier::from_config(config)?;
    info!("Notifier: {:?}", notifier);
    Ok(Some(Box::new(notifier)))
}

#[cfg(not(feature = "prowl"))]
fn build_notifier(_config: &NotifierConfig) -> Result<Option<Box<dyn Notifier>>> {
    warn!("DDNS_PROWL_API_KEY is set but dhdnsd was built without the prowl feature");
    Ok(None)
}

/// Run the engine until a shutdown signal arrives
async fn run_daemon(engine: &mut DdnsEngine) -> Result<()> {
    let mut signals = ShutdownSignals::install()?;

    engine
        .run_until(async move {
            match signals.recv().await {
                Ok(name) => info!("Received shutdown signal: {}", name),
                Err(e) => warn!("Signal handling failed, shutting down: {:#}", e),
            }
        })
        .await?;
    info!("Shutting down daemon");
    Ok(())
}

/// SIGTERM and SIGINT handlers
#[cfg(unix)]
struct ShutdownSignals {
    sigterm: Signal,
    sigint: Signal,
}

#[cfg(unix)]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        let sigterm = signal(SignalKind::terminate())
            .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
        let sigint = signal(SignalKind::interrupt())
            .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;
        Ok(Self { sigterm, sigint })
    }

    async fn recv(&mut self) -> Result<&'static str> {
        tokio::select! {
            _ = self.sigterm.recv() => Ok("SIGTERM"),
            _ = self.sigint.recv() => Ok("SIGINT"),
        }
    }
}

/// CTRL-C only, for non-Unix platforms
#[cfg(not(unix))]
struct ShutdownSignals;

#[cfg(not(unix))]
impl ShutdownSignals {
    fn install() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> Result<&'static str> {
        tokio::signal::ctrl_c()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
        Ok("CTRL-C")
    }
}
