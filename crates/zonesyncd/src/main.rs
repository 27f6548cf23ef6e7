// # zonesyncd - zone synchronization daemon
//
// Thin integration layer around zonesync-core:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the runtime
// 3. Wiring the OVH transport, the HTTP address lookup, and the ingress source
// 4. Driving one reconciliation pass per scheduler tick
//
// All reconciliation logic lives in zonesync-core; the daemon only decides
// when a pass runs and what to do with its outcome (log it and wait for the
// next tick).
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Zone
// - `ZONESYNC_ZONE`: Managed zone name (required)
// - `ZONESYNC_TTL`: TTL in seconds for managed records (default 60)
//
// ### Provider (OVH)
// - `ZONESYNC_OVH_ENDPOINT`: API endpoint name or URL (default ovh-eu)
// - `ZONESYNC_OVH_APPLICATION_KEY`: Application key (required)
// - `ZONESYNC_OVH_APPLICATION_SECRET`: Application secret (required)
// - `ZONESYNC_OVH_CONSUMER_KEY`: Consumer key (required)
//
// ### Address lookup
// - `ZONESYNC_ADDRESS_URL`: External address service (default ip-api.com)
// - `ZONESYNC_ADDRESS_MAX_AGE_SECS`: Cache staleness bound (default: the TTL)
//
// ### Ingress hosts
// - `ZONESYNC_HOSTS_FILE`: Newline-separated host list, re-read every pass
// - `ZONESYNC_HOSTS`: Comma-separated host list (used when no file is set)
//
// ### Scheduler
// - `ZONESYNC_INTERVAL_SECS`: Seconds between passes (default 60)
// - `ZONESYNC_LOG_LEVEL`: trace|debug|info|warn|error (default info)
//
// ## Example
//
// ```bash
// export ZONESYNC_ZONE=example.org
// export ZONESYNC_OVH_APPLICATION_KEY=your_app_key
// export ZONESYNC_OVH_APPLICATION_SECRET=your_app_secret
// export ZONESYNC_OVH_CONSUMER_KEY=your_consumer_key
// export ZONESYNC_HOSTS_FILE=/var/lib/zonesync/hosts
//
// zonesyncd
// ```

use std::env;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

use zonesync_core::{
    AddressCache, FileIngressSource, IngressSource, ProviderCredentials, ReconcileEngine,
    StaticIngressSource, ZoneConfig,
};
use zonesync_ip_http::{DEFAULT_ADDRESS_URL, HttpAddressLookup};
use zonesync_provider_ovh::OvhTransport;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ZonesyncExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ZonesyncExitCode> for ExitCode {
    fn from(code: ZonesyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    zone: String,
    ttl: i64,
    ovh_endpoint: String,
    ovh_application_key: String,
    ovh_application_secret: String,
    ovh_consumer_key: String,
    address_url: String,
    address_max_age_secs: Option<i64>,
    hosts_file: Option<String>,
    hosts: Vec<String>,
    interval_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            zone: env::var("ZONESYNC_ZONE").unwrap_or_default(),
            ttl: env::var("ZONESYNC_TTL")
                .ok()
                .map(|s| s.parse().unwrap_or(60))
                .unwrap_or(60),
            ovh_endpoint: env::var("ZONESYNC_OVH_ENDPOINT")
                .unwrap_or_else(|_| "ovh-eu".to_string()),
            ovh_application_key: env::var("ZONESYNC_OVH_APPLICATION_KEY").unwrap_or_default(),
            ovh_application_secret: env::var("ZONESYNC_OVH_APPLICATION_SECRET")
                .unwrap_or_default(),
            ovh_consumer_key: env::var("ZONESYNC_OVH_CONSUMER_KEY").unwrap_or_default(),
            address_url: env::var("ZONESYNC_ADDRESS_URL")
                .unwrap_or_else(|_| DEFAULT_ADDRESS_URL.to_string()),
            address_max_age_secs: env::var("ZONESYNC_ADDRESS_MAX_AGE_SECS")
                .ok()
                .and_then(|s| s.parse().ok()),
            hosts_file: env::var("ZONESYNC_HOSTS_FILE").ok(),
            hosts: env::var("ZONESYNC_HOSTS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            interval_secs: env::var("ZONESYNC_INTERVAL_SECS")
                .ok()
                .map(|s| s.parse().unwrap_or(60))
                .unwrap_or(60),
            log_level: env::var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.zone.is_empty() {
            anyhow::bail!(
                "ZONESYNC_ZONE is required. \
                Set it via: export ZONESYNC_ZONE=example.org"
            );
        }
        validate_domain_name(&self.zone)?;

        if !(1..=86400).contains(&self.ttl) {
            anyhow::bail!(
                "ZONESYNC_TTL must be between 1 and 86400 seconds. Got: {}",
                self.ttl
            );
        }

        if self.ovh_application_key.is_empty()
            || self.ovh_application_secret.is_empty()
            || self.ovh_consumer_key.is_empty()
        {
            anyhow::bail!(
                "OVH credentials are required. Set ZONESYNC_OVH_APPLICATION_KEY, \
                ZONESYNC_OVH_APPLICATION_SECRET and ZONESYNC_OVH_CONSUMER_KEY"
            );
        }

        if !self.address_url.starts_with("http://") && !self.address_url.starts_with("https://") {
            anyhow::bail!(
                "ZONESYNC_ADDRESS_URL must use HTTP or HTTPS scheme. Got: {}",
                self.address_url
            );
        }

        if self.hosts_file.is_none() && self.hosts.is_empty() {
            anyhow::bail!(
                "No ingress host source configured. \
                Set ZONESYNC_HOSTS_FILE or ZONESYNC_HOSTS"
            );
        }

        if let Some(ref path) = self.hosts_file
            && path.is_empty()
        {
            anyhow::bail!("ZONESYNC_HOSTS_FILE cannot be empty");
        }

        if !(10..=3600).contains(&self.interval_secs) {
            anyhow::bail!(
                "ZONESYNC_INTERVAL_SECS must be between 10 and 3600 seconds. Got: {}",
                self.interval_secs
            );
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Per-pass zone configuration snapshot handed to the engine
    fn zone_config(&self) -> ZoneConfig {
        ZoneConfig {
            zone: self.zone.clone(),
            ttl: self.ttl,
            address_max_age_secs: self.address_max_age_secs,
            provider: ProviderCredentials {
                endpoint: self.ovh_endpoint.clone(),
                application_key: self.ovh_application_key.clone(),
                application_secret: self.ovh_application_secret.clone(),
                consumer_key: self.ovh_consumer_key.clone(),
            },
        }
    }
}

/// Validate that a string is a valid domain name
///
/// Basic DNS domain name validation per RFC 1035; not comprehensive but
/// catches common configuration mistakes before any network call.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ZonesyncExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return ZonesyncExitCode::ConfigError.into();
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
        return ZonesyncExitCode::ConfigError.into();
    }

    info!("Starting zonesyncd daemon");
    info!(
        zone = %config.zone,
        interval_secs = config.interval_secs,
        "Configuration loaded"
    );

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZonesyncExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {}", e);
            ZonesyncExitCode::RuntimeError
        } else {
            ZonesyncExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the daemon
async fn run_daemon(config: Config) -> Result<()> {
    let zone_config = config.zone_config();

    let transport = Arc::new(OvhTransport::new(&zone_config.provider)?);
    let lookup = HttpAddressLookup::new(config.address_url.clone());
    let cache = AddressCache::new(Box::new(lookup));
    let mut engine = ReconcileEngine::new(transport, cache);

    let ingress: Box<dyn IngressSource> = match &config.hosts_file {
        Some(path) => {
            info!(path = %path, "Reading ingress hosts from file");
            Box::new(FileIngressSource::new(path))
        }
        None => {
            info!(hosts = config.hosts.len(), "Using static ingress host list");
            Box::new(StaticIngressSource::new(config.hosts.clone()))
        }
    };

    // One pass per tick, strictly sequential. The first tick fires
    // immediately so startup converges without waiting a full interval.
    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_secs));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;

    info!("Entering reconciliation loop");
    loop {
        #[cfg(unix)]
        let shutdown = async {
            tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = tokio::signal::ctrl_c() => "SIGINT",
            }
        };
        #[cfg(not(unix))]
        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            "SIGINT"
        };

        tokio::select! {
            _ = ticker.tick() => {
                run_pass(&mut engine, ingress.as_ref(), &zone_config).await;
            }
            signal_name = shutdown => {
                info!("Received shutdown signal: {}", signal_name);
                break;
            }
        }
    }

    info!("Shutting down daemon");
    Ok(())
}

/// Run one reconciliation pass and log its outcome
///
/// A failed pass is logged and superseded by the next scheduled one; there is
/// no in-process retry.
async fn run_pass(
    engine: &mut ReconcileEngine,
    ingress: &dyn IngressSource,
    zone_config: &ZoneConfig,
) {
    let hosts = match ingress.hosts().await {
        Ok(hosts) => hosts,
        Err(e) => {
            error!("Failed to list ingress hosts: {}", e);
            return;
        }
    };

    match engine.reconcile(&hosts, zone_config).await {
        Ok(summary) if summary.is_noop() => {
            debug!(address = %summary.address, "Zone already converged");
        }
        Ok(summary) => {
            info!(
                address = %summary.address,
                created = summary.created,
                updated = summary.updated,
                deleted = summary.deleted,
                "Reconciliation pass applied changes"
            );
        }
        Err(e) => {
            error!("Reconciliation pass failed, retrying on next tick: {}", e);
        }
    }
}
