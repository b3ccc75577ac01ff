use std::{
    io,
    sync::{Arc, OnceLock},
    time::Duration,
};

use tokio::net::TcpListener;
use tool_rental_rust::{
    catalog::Catalog,
    checkout::SimulatedPaymentGateway,
    config::StorageBackend,
    router::create_app_router,
    state::AppState,
    storage::{FileStorage, KeyValueStorage, MemoryStorage, WriteBehindStorage},
    suggest::GenerativeSuggestionService,
    Args, Config,
};
use tracing as log;
use tracing_subscriber::{
    filter::filter_fn,
    layer::{Layer as _, SubscriberExt as _},
    util::SubscriberInitExt as _,
};

const STDERR_LEVELS: &[log::Level] = &[log::Level::WARN, log::Level::ERROR];

static LOG_LEVEL: OnceLock<log::Level> = OnceLock::new();

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stdout)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (!STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO) >= *meta.level()
                })),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_filter(filter_fn(|meta| {
                    meta.is_span()
                        || (STDERR_LEVELS.contains(meta.level()))
                            && LOG_LEVEL.get().copied().unwrap_or(log::Level::INFO) >= *meta.level()
                })),
        )
        .init();

    _ = start().await;
}

async fn start() -> Result<(), ()> {
    let Args { config } = Args::parse().map_err(|e| {
        log::error!("failed to parse command line arguments: {e}");
    })?;

    let Config {
        server,
        storage,
        session,
        payment,
        suggest,
        log,
    } = Config::new(config).map_err(|e| {
        log::error!("failed to load `Config`: {e}");
    })?;

    LOG_LEVEL
        .set(log.level.into())
        .unwrap_or_else(|_| unreachable!("first initialization"));

    let backend: Arc<dyn KeyValueStorage> = match storage.backend {
        StorageBackend::File => {
            let files = FileStorage::open(&storage.dir).map_err(|e| {
                log::error!("failed to open storage at `{}`: {e}", storage.dir.display());
            })?;
            Arc::new(WriteBehindStorage::new(Arc::new(files)).map_err(|e| {
                log::error!("failed to start storage writer: {e}");
            })?)
        }
        StorageBackend::Memory => Arc::new(MemoryStorage::new()),
    };

    if suggest.api_key.is_none() {
        log::warn!("no suggestion API key configured, tool suggestions will fail");
    }

    let state = AppState::new(
        Catalog::builtin(),
        backend,
        Arc::new(SimulatedPaymentGateway::new(payment.delay, payment.success_rate)),
        Arc::new(GenerativeSuggestionService::from_config(&suggest)),
    )
    .with_namespace(storage.namespace);
    let state = Arc::new(state);

    tokio::spawn({
        let state = state.clone();
        async move {
            // A zero period would make `interval` panic.
            let period = session.sweep_interval.max(Duration::from_secs(1));
            let mut sweep = tokio::time::interval(period);
            loop {
                sweep.tick().await;
                state.evict_idle(session.idle_timeout);
            }
        }
    });

    let app = create_app_router(state);

    let listener = TcpListener::bind((server.host.clone(), server.port))
        .await
        .map_err(|e| {
            log::error!("failed to listen on `{}:{}`: {e}", server.host, server.port);
        })?;

    log::info!("listening on `{}:{}`", server.host, server.port);

    axum::serve(listener, app)
        .await
        .map_err(|e| log::error!("webserver failed: {e}"))
}
