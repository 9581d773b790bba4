use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::config::{AppConfig, SecurityConfig, StoreKind};
use crate::database::{DatabaseManager, JournalStore, MemoryStore, PgJournalStore, StoreError};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

/// Shared handler state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn JournalStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn JournalStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }
}

/// Open the configured journal store, applying migrations when enabled
pub async fn build_store(config: &AppConfig) -> Result<Arc<dyn JournalStore>, StoreError> {
    match config.store {
        StoreKind::Memory => {
            tracing::info!("Using in-memory journal store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreKind::Postgres => {
            let pool = DatabaseManager::connect(&config.database).await?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            Ok(Arc::new(PgJournalStore::new(pool)))
        }
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(calendar_routes())
        .merge(journal_routes())
        .merge(export_routes())
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let mut app = Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        // Protected API
        .merge(api)
        .layer(RequestBodyLimitLayer::new(state.config.api.max_request_size_bytes));

    if state.config.security.enable_cors {
        app = app.layer(cors_layer(&state.config.security));
    }
    if state.config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn calendar_routes() -> Router<AppState> {
    use protected::{calendar, streak};

    Router::new()
        .route("/api/calendar/month/:year/:month", get(calendar::month))
        .route("/api/calendar/week", get(calendar::week))
        .route("/api/streak", get(streak::get))
}

fn journal_routes() -> Router<AppState> {
    use protected::{day_card, praises, stamps};

    Router::new()
        // Praises
        .route(
            "/api/days/:date/praises",
            get(praises::list).post(praises::create),
        )
        .route(
            "/api/praises/:id",
            put(praises::update).delete(praises::delete),
        )
        // Polaroid card
        .route("/api/days/:date/card", get(day_card::get).put(day_card::put))
        // Stamps
        .route(
            "/api/days/:date/stamp",
            get(stamps::get).put(stamps::put).delete(stamps::delete),
        )
        .route("/api/stamps", get(stamps::assets))
}

fn export_routes() -> Router<AppState> {
    Router::new().route("/api/export/plan", get(protected::export::plan))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
