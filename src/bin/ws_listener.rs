use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use ws_listener::bin_common::{
    init_logging_with_level, parse_args, resolve_config_path, BinaryRunner, ListenerSettings,
    PrintObserver, RunConfig,
};
use ws_listener::wslisten::{ConnectionManager, ListenerHandle, Metrics};

struct ListenerApp {
    run_config: RunConfig,
    settings: ListenerSettings,
    metrics: Option<Metrics>,
}

impl ListenerApp {
    fn new(settings: ListenerSettings) -> Self {
        Self {
            run_config: RunConfig::new("WebSocket Listener").with_endpoint(settings.url.clone()),
            settings,
            metrics: None,
        }
    }
}

impl BinaryRunner for ListenerApp {
    async fn run(&mut self) -> Result<()> {
        let manager = ConnectionManager::new(self.settings.to_listener_config()?);

        let observer = PrintObserver::with_timestamp_id();
        info!("Registering observer {}", observer.id());
        manager.register(Arc::new(observer));

        let task = manager.spawn();
        let handle: ListenerHandle = task.handle().clone();

        tokio::signal::ctrl_c().await?;
        info!("Exiting...");

        task.shutdown().await;
        self.metrics = Some(handle.metrics());
        Ok(())
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }

    fn stats(&self) -> Option<String> {
        self.metrics.as_ref().map(|m| {
            format!(
                "Messages: {} | Connections: {} | Reconnects: {} | Probes: {} ({} failed)",
                m.messages_received, m.connections, m.reconnect_count, m.probes_sent, m.probe_failures
            )
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Load settings first (before logging is initialized)
    let config_path = resolve_config_path(&parse_args());
    let settings = ListenerSettings::load(&config_path)?;

    init_logging_with_level(&settings.log_level);
    info!("Settings file: {}", config_path.display());
    settings.log();

    ListenerApp::new(settings).execute().await
}
