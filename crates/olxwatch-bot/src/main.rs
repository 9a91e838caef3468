use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use teloxide::Bot;
use tracing::info;

use olxwatch_core::config::WatchConfig;
use olxwatch_core::{ListingSource, Notifier, SeenStore, TrackedTermRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "olxwatch_bot=info,olxwatch_scheduler=info,olxwatch_telegram=info".into()
            }),
        )
        .init();

    // load config: explicit OLXWATCH_CONFIG path > ~/.olxwatch/olxwatch.toml
    let config_path = std::env::var("OLXWATCH_CONFIG").ok();
    let config =
        WatchConfig::load(config_path.as_deref()).context("loading configuration")?;

    let db_path = config.database.path.clone();
    ensure_parent_dir(&db_path);
    info!(path = %db_path, "opening SQLite database");

    let conn = rusqlite::Connection::open(&db_path)
        .with_context(|| format!("opening database at {db_path}"))?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    let store = olxwatch_store::SqliteStore::new(conn).context("running schema migration")?;
    let registry: Arc<dyn TrackedTermRegistry> = Arc::new(store.clone());
    let seen: Arc<dyn SeenStore> = Arc::new(store);

    let source: Arc<dyn ListingSource> = Arc::new(olxwatch_olx::OlxClient::new(
        Some(config.olx.base_url.clone()),
        config.olx.search_limit,
    ));

    // One Bot shared between the dispatcher and the scheduler's notifier.
    let bot = Bot::new(config.telegram.bot_token.clone());
    let notifier: Arc<dyn Notifier> =
        Arc::new(olxwatch_telegram::TelegramNotifier::new(bot.clone()));

    let scheduler = Arc::new(olxwatch_scheduler::PollScheduler::new(
        Arc::clone(&source),
        notifier,
        seen,
    ));

    let interval = Duration::from_secs(config.poll.interval_minutes * 60);
    let restored = scheduler
        .bulk_restore(registry.as_ref(), interval)
        .context("restoring jobs from the tracked-term registry")?;
    info!(jobs = restored, "restored tracked-term jobs");

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    let scheduler_task = tokio::spawn(Arc::clone(&scheduler).run(shutdown_rx));

    let ctx = Arc::new(olxwatch_telegram::BotContext::new(
        registry,
        scheduler,
        source,
        config.telegram.clone(),
        config.poll.clone(),
    ));

    olxwatch_telegram::TelegramAdapter::new(bot, ctx).run().await;

    // Dispatcher returned (ctrl-c); stop the tick loop before exiting.
    let _ = shutdown_tx.send(true);
    let _ = scheduler_task.await;

    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
}
