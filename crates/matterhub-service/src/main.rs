//! `matterhub` – gateway service binary.
//!
//! Wires the pieces together: tracing, the configuration vault, the
//! virtual input device, the deferred worker, and the gateway facade.
//! Runs until interrupted.

use std::sync::Arc;

use matterhub_input::InjectionEngine;
use matterhub_service::launcher::AppLauncher;
use matterhub_service::service::GatewayService;
use matterhub_service::{config, executor};
use matterhub_types::NodeId;
use tracing::{error, info, warn};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = std::env::var("MATTERHUB_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn load_config() -> config::Config {
    match config::load() {
        Ok(Some(cfg)) => cfg,
        Ok(None) => {
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            if let Err(e) = config::save(&cfg) {
                warn!("could not persist default config: {e}");
            }
            cfg
        }
        Err(e) => {
            error!("config load failed, falling back to defaults: {e}");
            let mut cfg = config::Config::default();
            config::apply_env_overrides(&mut cfg);
            cfg
        }
    }
}

fn build_engine(cfg: &config::Config) -> InjectionEngine {
    #[cfg(target_os = "linux")]
    {
        match matterhub_input::UinputDevice::open(&cfg.uinput_path) {
            Ok(device) => return InjectionEngine::new(Some(Box::new(device))),
            Err(e) => warn!(
                path = %cfg.uinput_path.display(),
                "virtual input device unavailable: {e}"
            ),
        }
    }
    #[cfg(not(target_os = "linux"))]
    let _ = cfg;
    InjectionEngine::new(None)
}

#[tokio::main]
async fn main() {
    init_tracing();
    info!("matterhub gateway starting");

    let cfg = load_config();
    info!(
        storage_dir = %cfg.storage_dir.display(),
        fabric_index = cfg.fabric_index,
        "configuration loaded"
    );

    let local_node = match NodeId::decode(&cfg.local_node_id) {
        Ok(node) => node,
        Err(e) => {
            error!(
                configured = %cfg.local_node_id,
                "invalid local node id, using default: {e}"
            );
            NodeId(0xAA01)
        }
    };

    let engine = build_engine(&cfg);
    let worker = executor::DeferredWorker::spawn();
    let service = Arc::new(GatewayService::new(
        engine,
        AppLauncher::new(cfg.launcher_url.clone()),
        worker,
        local_node,
        cfg.exposed_endpoints.clone(),
        cfg.fabric_index,
    ));

    // Standalone mode: no embedding host to call `attach_stack`, so the
    // commissioning surface stays unavailable; key injection and app
    // control still work. Hosts link the library crate and attach the
    // stack's client interfaces themselves.
    let listing = service.list_devices();
    info!(status = ?listing.status, "matterhub gateway ready");
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
    }
    info!("shutting down");
}
