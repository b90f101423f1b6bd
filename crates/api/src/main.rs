use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use esg_core::domain::contract::parse_analyze;
use esg_core::domain::stock::{PreferenceVector, RankedResult, StockRecord};
use esg_core::error::StockError;
use esg_core::rank::rank;
use esg_core::storage::StockStore;

const DEFAULT_PORT: u16 = 5001;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = esg_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let store = StockStore::from_config(&settings.store_config())?;
    let state = AppState {
        store: Arc::new(store),
    };

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/analyze", post(analyze))
        .route("/api/stocks", get(list_stocks).post(add_stock))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Clone)]
struct AppState {
    store: Arc<StockStore>,
}

/// `{"error": "..."}` with a status code.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<StockError> for ApiError {
    fn from(err: StockError) -> Self {
        match err {
            StockError::Validation(message) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            err @ StockError::Conflict { .. } => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: err.to_string(),
            },
            StockError::Storage(err) => {
                let err = anyhow::Error::new(err);
                sentry_anyhow::capture_anyhow(&err);
                tracing::error!(error = %err, "stock database save failed");
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: "Failed to save stock database".to_string(),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    preferences: PreferenceVector,
    stocks: Vec<RankedResult>,
}

#[derive(Debug, Serialize)]
struct StocksResponse {
    stocks: Vec<StockRecord>,
}

#[derive(Debug, Serialize)]
struct AddStockResponse {
    success: bool,
    stock: StockRecord,
}

async fn analyze(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let params = parse_analyze(body.as_ref().map(|Json(v)| v))?;

    let stocks = state.store.load().await;
    let ranked = rank(&stocks, &params.prefs, params.top_n);

    Ok(Json(AnalyzeResponse {
        preferences: params.prefs,
        stocks: ranked,
    }))
}

async fn list_stocks(State(state): State<AppState>) -> Json<StocksResponse> {
    Json(StocksResponse {
        stocks: state.store.load().await,
    })
}

async fn add_stock(
    State(state): State<AppState>,
    body: Option<Json<Value>>,
) -> Result<Json<AddStockResponse>, ApiError> {
    let stock = state
        .store
        .add_stock(body.as_ref().map(|Json(v)| v))
        .await?;

    Ok(Json(AddStockResponse {
        success: true,
        stock,
    }))
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &esg_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
