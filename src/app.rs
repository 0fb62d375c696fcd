use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::{AppConfig, SaleCommitMode, SessionConfig},
    database,
    error::Result,
    middleware::session_gate,
    routes,
    services::import_staging::ImportStaging,
    store::{PgStore, Store},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub session: Arc<SessionConfig>,
    pub sale_commit: SaleCommitMode,
    pub imports: ImportStaging,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, session: SessionConfig, sale_commit: SaleCommitMode) -> Self {
        Self {
            store,
            session: Arc::new(session),
            sale_commit,
            imports: ImportStaging::new(),
        }
    }
}

pub async fn build(config: &AppConfig) -> Result<Router> {
    let pool = database::create_pool(&config.database).await?;
    let state = AppState::new(
        Arc::new(PgStore::new(pool)),
        config.session.clone(),
        config.sales.commit_mode,
    );

    tracing::info!(
        "Sale commit mode: {:?}, login path: {}",
        state.sale_commit,
        state.session.login_path
    );

    let allowed_origins: Vec<HeaderValue> = config
        .cors
        .allowed_origins
        .iter()
        .map(|origin| {
            origin.parse::<HeaderValue>().map_err(|_| {
                crate::error::AppError::ConfigError(format!("Invalid CORS origin: {}", origin))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_credentials(true)
        .allow_origin(allowed_origins);

    let app = router(state)
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// All routes behind the session gate, bound to `state`.
pub fn router(state: AppState) -> Router {
    routes::create_router(&state.session.login_path)
        .layer(middleware::from_fn_with_state(state.clone(), session_gate))
        .with_state(state)
}
