// Framework bootstrap for the client runtime.

use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDateTime};
use tokio::sync::mpsc;

use crate::domain::entities::Notification;
use crate::domain::ports::Clock;
use crate::frameworks::config::ClientConfig;
use crate::interface_adapters::clients::ApiClient;
use crate::interface_adapters::fingerprint::HostFingerprint;
use crate::interface_adapters::notifier::ChannelNotifier;
use crate::interface_adapters::state::AppState;
use crate::interface_adapters::storage::FileStore;

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Diagnostics go to stderr; stdout belongs to command output.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Wall clock in the host's local timezone.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub struct Runtime {
    pub state: AppState,
    pub notifications: mpsc::UnboundedReceiver<Notification>,
}

pub fn build_runtime(config: &ClientConfig) -> anyhow::Result<Runtime> {
    let store = FileStore::open(&config.storage_path).map_err(anyhow::Error::msg)?;
    let store = Arc::new(store);

    let api_base = config.api_base();
    let api = ApiClient::new(api_base.clone(), store.clone())
        .context("failed to initialize api client")?;
    tracing::debug!(
        api_base = %api_base,
        storage = %config.storage_path.display(),
        "api client configured"
    );

    let (notifier, notifications) = ChannelNotifier::new();
    let state = AppState::with_api(
        api,
        store,
        Arc::new(notifier),
        Arc::new(HostFingerprint::new(
            config.screen.clone(),
            config.timezone.clone(),
        )),
        Arc::new(SystemClock),
    );
    Ok(Runtime {
        state,
        notifications,
    })
}
