// # ddnsd - DDNS updater
//
// This binary is a THIN integration layer:
// - DO NOT add DNS or reconciliation logic here
// - All DDNS logic lives in ddns-core and the provider crates
// - Configuration is via environment variables (plus record names as
//   positional arguments)
//
// ddnsd is responsible for:
// 1. Reading configuration from the environment
// 2. Initializing logging and the runtime
// 3. Registering providers and building them from configuration
// 4. Running one update pass over the configured records
//
// ## Configuration
//
// - `DDNS_RECORDS`: Comma-separated list of DNS records to manage
// - `DDNS_CLOUDFLARE_AUTH`: Cloudflare API token, or `email:key`
// - `DDNS_CLOUDFLARE_API`: Cloudflare API base URL (optional)
// - `DDNS_TTL`: Record TTL, e.g. `300`, `90s`, `5m` (default: automatic)
// - `DDNS_RECORD_TYPE`: `A`, `AAAA` or `CNAME` (default: inferred)
// - `DDNS_CONTENT`: Record content (default: the public IP)
// - `DDNS_IP_PROVIDER`: Public IP lookup URL (default: https://icanhazip.com)
// - `DDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Example
//
// ```bash
// export DDNS_CLOUDFLARE_AUTH=your_token
// export DDNS_RECORDS=home.example.com
// ddnsd www.example.com
// ```

use anyhow::{Context, Result};
use ddns_core::{DdnsConfig, Dispatcher, ProviderRegistry, UpdateRequest};
use ddns_ip_http::HttpIpSource;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// - 0: Every record reconciled
/// - 1: Configuration or startup error
/// - 2: An update failed
/// - 130: Interrupted
#[derive(Debug, Clone, Copy)]
enum DdnsExitCode {
    /// All records up to date
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Lookup or update failure
    UpdateError = 2,
    /// Interrupted by a signal
    Interrupted = 130,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Load configuration from environment
    let config = match DdnsConfig::from_env(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::ConfigError.into();
    }

    info!("Configuration loaded: {} record(s)", config.records.len());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::ConfigError.into();
        }
    };

    let code = rt.block_on(async {
        tokio::select! {
            result = run(config) => match result {
                Ok(()) => DdnsExitCode::Success,
                Err(e) => {
                    error!("Update failed: {:#}", e);
                    DdnsExitCode::UpdateError
                }
            },
            Ok(signal) = wait_for_shutdown() => {
                warn!("Interrupted by {}, stopping", signal);
                DdnsExitCode::Interrupted
            }
        }
    });

    code.into()
}

/// Build the providers and reconcile every configured record once
async fn run(config: DdnsConfig) -> Result<()> {
    #[cfg_attr(not(feature = "cloudflare"), allow(unused_mut))]
    let mut registry = ProviderRegistry::new();

    #[cfg(feature = "cloudflare")]
    {
        info!("Registering Cloudflare provider");
        ddns_provider_cloudflare::register(&mut registry);
    }

    let providers = registry
        .create_providers(&config.providers)
        .context("failed to create providers")?;
    let mut dispatcher = Dispatcher::new(providers);
    info!("Providers: {}", dispatcher.provider_names().join(", "));

    let content = match config.content {
        Some(content) => content,
        None => {
            let source = HttpIpSource::new(config.ip_provider.as_str())?;
            let ip = source
                .current()
                .await
                .with_context(|| format!("public IP lookup via {} failed", source.url()))?;
            info!("Public IP: {}", ip);
            ip.to_string()
        }
    };

    let requests: Vec<UpdateRequest> = config
        .records
        .iter()
        .map(|name| UpdateRequest {
            name: name.clone(),
            kind: config.record_kind,
            content: content.clone(),
            ttl: config.ttl,
        })
        .collect();

    let reports = dispatcher.update_names(&requests).await?;
    for report in &reports {
        info!(
            "{} {} record is {} (provider: {})",
            report.name,
            report.kind,
            report.outcome.content(),
            report.provider
        );
    }

    Ok(())
}

/// Wait for SIGTERM or SIGINT
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
