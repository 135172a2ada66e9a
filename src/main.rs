//! ChatCart webhook server

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use chatcart::config::Settings;
use chatcart::database::{create_pool, run_migrations, DatabaseService};
use chatcart::dispatch::Dispatcher;
use chatcart::flows::FlowContext;
use chatcart::i18n::I18n;
use chatcart::platform::webhook::{self, WebhookState};
use chatcart::services::ServiceFactory;
use chatcart::state::RedisDialogStore;
use chatcart::utils::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    let _log_guard = init_logging(&settings.logging).context("Failed to initialize logging")?;
    info!("Starting {} v{}", chatcart::NAME, chatcart::VERSION);

    let pool = create_pool(&settings.database)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Migrations failed")?;
    let db = DatabaseService::new(pool.clone());

    let store = RedisDialogStore::new(settings.redis.clone())
        .await
        .context("Failed to connect to Redis")?;
    store.ping().await.context("Redis ping failed")?;

    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations()
        .await
        .context("Failed to load translations")?;

    let factory = ServiceFactory::new(&settings).context("Failed to build services")?;
    let ctx = FlowContext {
        users: Arc::new(db.users.clone()),
        services: Arc::new(db.services.clone()),
        ledger: Arc::new(db.ledger.clone()),
        payment: factory.payment.clone(),
        messenger: factory.messenger.clone(),
        notifier: factory.notifier.clone(),
        broadcaster: factory.broadcaster.clone(),
        i18n,
    };
    let dispatcher = Arc::new(Dispatcher::new(ctx, Arc::new(store), &settings));

    let state = Arc::new(WebhookState {
        dispatcher,
        verify_token: settings.platform.verify_token.clone(),
        pool,
    });
    let app = webhook::router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Webhook server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("Webhook server exited")?;

    Ok(())
}
