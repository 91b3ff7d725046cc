mod commands;
mod conversation;
mod gateway;
mod replies;
#[cfg(test)]
mod test_utils;

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use teletask_channels::telegram::TelegramChannel;
use teletask_core::{
    config::{self, shellexpand, Config},
    traits::Channel,
};
use teletask_store::Store;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "teletask",
    version,
    about = "Teletask: a shared task list kept by a Telegram bot"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot and serve until Ctrl-C.
    Start,
    /// Show configuration and task counts.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The real subscriber needs data_dir and log_level from the file, so
    // loading is reported through a stdout-only one.
    let mut cfg = tracing::subscriber::with_default(stdout_subscriber("info"), || {
        config::load(&cli.config)
    })?;

    match cli.command {
        Commands::Start => {
            tracing::subscriber::with_default(stdout_subscriber(&cfg.teletask.log_level), || {
                config::ensure_layout(&cfg.teletask.data_dir)
            });
            let _guard = init_logging(&cfg);

            cfg.apply_env();
            cfg.validate()?;

            let store = Store::new(&cfg.store).await?;

            let mut channels: HashMap<String, Arc<dyn Channel>> = HashMap::new();
            let telegram = TelegramChannel::new(cfg.telegram.clone());
            channels.insert(telegram.name().to_string(), Arc::new(telegram));

            println!("{}: starting...", cfg.teletask.name);
            let gw = Arc::new(gateway::Gateway::new(
                channels,
                store,
                cfg.auth.clone(),
                cfg.telegram.allowed_users.clone(),
                cfg.teletask.name.clone(),
            ));
            gw.run().await?;
        }
        Commands::Status => {
            stdout_subscriber(&cfg.teletask.log_level).init();
            cfg.apply_env();

            println!("{} status\n", cfg.teletask.name);
            println!("Config: {}", cli.config);
            println!(
                "Bot credential: {}",
                if cfg.telegram.bot_token.trim().is_empty() {
                    "missing"
                } else {
                    "set"
                }
            );
            println!(
                "Allowed users: {}",
                if cfg.telegram.allowed_users.is_empty() {
                    "everyone".to_string()
                } else {
                    cfg.telegram.allowed_users.len().to_string()
                }
            );

            let db_path = shellexpand(&cfg.store.db_path);
            if !Path::new(&db_path).exists() {
                println!("Database: not created yet ({db_path})");
                return Ok(());
            }
            let store = Store::new(&cfg.store).await?;
            let (active, done) = store.task_counts().await?;
            let size = store.db_size().await?;
            println!("Database: {db_path} ({size} bytes)");
            println!("Open tasks: {active}");
            println!("Completed tasks: {done}");
        }
    }

    Ok(())
}

/// Stdout-only logging, used before the file writer exists and by `status`.
fn stdout_subscriber(default_level: &str) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer())
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Log to stdout and to `{data_dir}/logs/teletask.log`.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// life of the process.
fn init_logging(cfg: &Config) -> Option<WorkerGuard> {
    let filter = env_filter(&cfg.teletask.log_level);

    let logs = Path::new(&shellexpand(&cfg.teletask.data_dir)).join("logs");
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("teletask")
        .filename_suffix("log")
        .build(&logs);

    match appender {
        Ok(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .init();
            info!("logging to {}", logs.join("teletask.log").display());
            Some(guard)
        }
        Err(e) => {
            stdout_subscriber(&cfg.teletask.log_level).init();
            tracing::warn!("file logging disabled: {e}");
            None
        }
    }
}
