//! CLI command implementations

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::http_server::{HttpServer, ServerConfig, StoreKind};
use crate::observability::{log_event, Event};
use crate::store::{FileStore, MemoryStore, PostStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
    }
}

/// Write a default config file and create its data directory.
///
/// Refuses to overwrite an existing config.
pub fn init(config_path: &Path) -> CliResult<()> {
    if config_path.exists() {
        return Err(CliError::already_initialized(config_path));
    }

    let config = ServerConfig::default();
    if let Some(parent) = config_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let content = serde_json::to_string_pretty(&config)
        .map_err(|e| CliError::io_error(format!("Failed to encode config: {}", e)))?;
    fs::write(config_path, content)?;

    // relative data_dir resolves against the config file's directory
    let data_dir = resolve_data_dir(config_path, &config);
    fs::create_dir_all(&data_dir)?;

    let data_dir = data_dir.display().to_string();
    log_event(Event::DataDirInitialized, &[("data_dir", data_dir.as_str())]);
    Ok(())
}

/// Load config, open the store and run the HTTP server until shutdown.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = ServerConfig::load(config_path)?;
    if let Some(port) = port {
        config.port = port;
        config.validate()?;
    }

    let path = config_path.display().to_string();
    log_event(Event::ConfigLoaded, &[("path", path.as_str())]);

    let store = open_store(config_path, &config)?;
    let server = HttpServer::with_store(config, store);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Open the store selected by the config.
pub fn open_store(config_path: &Path, config: &ServerConfig) -> CliResult<Arc<dyn PostStore>> {
    let store: Arc<dyn PostStore> = match config.store {
        StoreKind::Memory => {
            log_event(Event::StoreOpened, &[("kind", "memory")]);
            Arc::new(MemoryStore::new())
        }
        StoreKind::File => {
            let data_dir = resolve_data_dir(config_path, config);
            let store = FileStore::open(&data_dir)?;
            let path = store.path().display().to_string();
            let count = store.len()?.to_string();
            log_event(
                Event::StoreOpened,
                &[("kind", "file"), ("path", path.as_str()), ("posts", count.as_str())],
            );
            Arc::new(store)
        }
    };
    Ok(store)
}

fn resolve_data_dir(config_path: &Path, config: &ServerConfig) -> PathBuf {
    let data_dir = config.data_path();
    if data_dir.is_absolute() {
        return data_dir.to_path_buf();
    }
    match config_path.parent() {
        Some(parent) => parent.join(data_dir),
        None => data_dir.to_path_buf(),
    }
}
