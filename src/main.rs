use std::path::Path;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod page;
mod server;
mod template;

/// Config file used when no path is given (extension optional)
const DEFAULT_CONFIG_PATH: &str = "config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Templates are read once; a broken template stops startup
    let templates = template::Templates::load(Path::new(&cfg.templates.dir)).await?;
    logger::log_info(&format!(
        "Loaded templates {} and {} from {}",
        templates.view.name(),
        templates.edit.name(),
        cfg.templates.dir
    ));

    let listener = server::create_reusable_listener(addr)?;
    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown))?;

    let grace = Duration::from_secs(std::cmp::max(
        cfg.performance.read_timeout,
        cfg.performance.write_timeout,
    ));
    let state = Arc::new(config::AppState::new(cfg, templates));
    let active_connections = Arc::new(AtomicUsize::new(0));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            server::start_server_loop(
                listener,
                state,
                Arc::clone(&active_connections),
                shutdown,
            )
            .await;
            server::drain_connections(&active_connections, grace).await;
        })
        .await;
    Ok(())
}
