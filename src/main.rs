use std::sync::Arc;

use static_edge::config::{AppState, Config};
use static_edge::{logger, server, DirectoryStore};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First argument names the config file (extension optional)
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers.get());
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let store = DirectoryStore::open(&cfg.assets.directory, cfg.assets.index_files.clone())?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg, store.root());
    let state = Arc::new(AppState::new(&cfg, store));

    let shutdown = Arc::new(tokio::sync::Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));
    server::run(listener, state, shutdown).await;
    Ok(())
}
