//! diaglog demo binary.
//!
//! Loads a configuration file, installs the subscriber and global logger
//! from its `[Logger]` section, then logs a few entries inside a scope
//! tagged with a per-run id.
//!
//! ```text
//! diaglog -c conf/app          # reads conf/app.toml
//! diaglog -c conf/app --watch  # keeps running, reloads on change
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::Value;
use uuid::Uuid;

use diaglog::config::{
    load_or_default, ConfigError, ConfigFile, ConfigProvider, ConfigWatcher, DatabaseConfig,
};
use diaglog::observability::logging::init_subscriber;
use diaglog::{init_from_config, logger, Scope};

#[derive(Parser)]
#[command(name = "diaglog")]
#[command(about = "Structured diagnostic logger demo", long_about = None)]
struct Cli {
    /// Configuration file. For config.toml pass "-c config".
    #[arg(short, long, default_value = "")]
    config: String,

    /// Keep running and reload the configuration file when it changes
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let path = ConfigFile::from_path(&cli.config).resolve();

    // Loaded before the subscriber so `[Logger]` shapes it; a failure is
    // reported once the logger is up.
    let (config, provider, load_error) = load_or_default(&path);

    init_subscriber(&config.logger)?;
    init_from_config(&config.logger)?;

    let scope = Scope::root().with_value("run_id", Uuid::new_v4().to_string());
    scope
        .scope(run(cli.watch, path, Arc::new(provider), load_error))
        .await
}

async fn run(
    watch: bool,
    path: PathBuf,
    provider: Arc<ConfigProvider>,
    load_error: Option<ConfigError>,
) -> Result<(), Box<dyn std::error::Error>> {
    logger().domain("main").info("logger was running");

    if let Some(e) = &load_error {
        logger()
            .domain("main")
            .code("config_not_loaded")
            .with([("path", path.display().to_string())])
            .cause(e)
            .error("config not loaded, running with defaults");
    }

    let env = provider.get_string("Server.ENV", &["undefine"]);
    logger()
        .domain("main")
        .info_fmt(format_args!("server was running on env {env}"));

    let database = DatabaseConfig::from_provider(&provider, None);
    logger()
        .domain("main")
        .with([
            ("dialect", Value::from(database.dialect.as_str())),
            ("host", Value::from(database.primary.host.as_str())),
            ("port", Value::from(database.primary.port)),
            ("db_name", Value::from(database.primary.db_name.as_str())),
            ("max_open_conns", Value::from(database.max_open_conns)),
        ])
        .debug("database settings");

    if watch {
        let _watcher = ConfigWatcher::new(&path, Arc::clone(&provider)).run()?;
        tokio::signal::ctrl_c().await?;
        logger().domain("main").info("shutting down");
    }

    Ok(())
}
