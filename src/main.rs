//! Warden entry point.
//!
//! Wires the stores, themes, registry and dispatcher together and runs
//! the event loop over the stdio driver: events in as JSON lines on
//! stdin, protocol calls out as JSON lines on stdout. A production
//! embedding uses the library directly with its own transport.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use warden::bot::{Dispatcher, Runtime};
use warden::client::stdio::{spawn_stdin_reader, StdioClient};
use warden::client::ChatClient;
use warden::commands;
use warden::config::Config;
use warden::events::{LinkGuard, ModerationReactor};
use warden::session;
use warden::store::Stores;
use warden::theme::ThemeManager;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const BANNER: &str = r"
╔══════════════════════════════════════╗
║              W A R D E N             ║
║      chat dispatch & moderation      ║
╚══════════════════════════════════════╝";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads the environment.
    dotenvy::dotenv().ok();

    // Default to info-level logs for our crate when RUST_LOG is unset.
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warden=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    eprintln!("{BANNER}");
    info!("starting warden...");

    let config = Arc::new(Config::from_env());
    info!("configuration loaded");
    info!("command prefix: {:?}", config.prefix);
    if config.owner_number.is_empty() {
        info!("no OWNER_NUMBER configured, only the connected account is owner");
    } else {
        info!("configured owner: {}", config.owner_number);
    }

    if config.session_id.is_some() {
        session::ensure(&config).await?;
    } else {
        info!("no SESSION_ID configured, skipping session bootstrap");
    }

    let stores = Arc::new(Stores::open(&config.data_dir).await?);

    let themes = Arc::new(ThemeManager::load(&config.theme_dir, &config.bot_theme));

    let registry = Arc::new(commands::default_registry());
    info!("{} commands registered", registry.len());

    let client: Arc<dyn ChatClient> = Arc::new(StdioClient::new());
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&client),
        Arc::clone(&stores),
        Arc::clone(&registry),
        Arc::clone(&themes),
        Arc::clone(&config),
    ));
    let moderation = Arc::new(ModerationReactor::new(
        Arc::clone(&client),
        Arc::clone(&stores),
        config.moderation_strictness,
    ));
    let antilink = Arc::new(LinkGuard::new(client, stores));

    let events = spawn_stdin_reader();
    let runtime = Arc::new(Runtime::new(
        dispatcher,
        moderation,
        antilink,
        config.auth_dir.clone(),
    ));
    runtime.run(events).await
}
