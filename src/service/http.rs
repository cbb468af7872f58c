use super::{Admission, MetricsSnapshot, TransactionService};
use crate::aggregation::Statistics;
use crate::error::StatsError;
use crate::service::config::HttpConfig;
use crate::transaction::Transaction;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post, Router},
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info, warn};

/// Statistics as returned by `GET /statistics`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    /// Sum of amounts
    pub sum: f64,
    /// Mean amount
    pub avg: f64,
    /// Largest amount
    pub max: f64,
    /// Smallest amount
    pub min: f64,
    /// Number of transactions
    pub count: u64,
}

impl StatisticsResponse {
    /// Round the float fields to `precision` decimal places (0 keeps them exact)
    pub fn from_statistics(stats: Statistics, precision: u32) -> Self {
        Self {
            sum: round_to(stats.sum, precision),
            avg: round_to(stats.avg, precision),
            max: round_to(stats.max, precision),
            min: round_to(stats.min, precision),
            count: stats.count,
        }
    }
}

fn round_to(value: f64, precision: u32) -> f64 {
    if precision == 0 {
        return value;
    }
    let factor = 10f64.powi(precision as i32);
    let rounded = (value * factor).round() / factor;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// Body of `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process serves requests
    pub status: String,
    /// Crate version
    pub version: String,
    /// Seconds since the service started
    pub uptime_seconds: u64,
}

/// Body returned alongside client errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable reason
    pub error: String,
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        if self.is_client_error() {
            let body = ErrorResponse {
                error: self.to_string(),
            };
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response();
        }

        error!("Request failed: {}", self);
        // Don't expose internal error details
        let body = ErrorResponse {
            error: "internal error".to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Axum front end for [`TransactionService`]
#[derive(Clone, Debug)]
pub struct HttpService {
    service: TransactionService,
    config: HttpConfig,
}

impl HttpService {
    /// Wrap `service` with the given transport settings
    pub fn new(service: TransactionService, config: HttpConfig) -> Self {
        Self { service, config }
    }

    /// Wrapped transaction service
    pub fn service(&self) -> &TransactionService {
        &self.service
    }

    /// Router exposing the transaction, statistics, health and metrics endpoints
    pub fn router(&self) -> Router {
        let app = Router::new()
            .route("/transactions", post(Self::create_transaction_handler))
            .route("/statistics", get(Self::statistics_handler))
            .route("/health", get(Self::health_handler))
            .route("/metrics", get(Self::metrics_handler))
            .with_state(self.clone());

        app.layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                self.config.request_timeout(),
            ))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    async fn create_transaction_handler(
        State(http): State<HttpService>,
        Json(transaction): Json<Transaction>,
    ) -> Result<StatusCode, StatsError> {
        match http.service.submit_transaction(&transaction) {
            Ok(Admission::Recorded) => Ok(StatusCode::CREATED),
            Ok(Admission::Expired) => Ok(StatusCode::NO_CONTENT),
            Err(e) => {
                warn!("Rejected transaction: {}", e);
                Err(e)
            }
        }
    }

    async fn statistics_handler(State(http): State<HttpService>) -> Json<StatisticsResponse> {
        let stats = http.service.current_statistics();
        Json(StatisticsResponse::from_statistics(
            stats,
            http.config.precision,
        ))
    }

    async fn health_handler(State(http): State<HttpService>) -> Json<HealthResponse> {
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: http.service.uptime().as_secs(),
        })
    }

    async fn metrics_handler(State(http): State<HttpService>) -> Json<MetricsSnapshot> {
        Json(http.service.metrics())
    }
}

/// HTTP server bound to a single address
pub struct HttpServer {
    app: Router,
    addr: SocketAddr,
}

impl HttpServer {
    /// Build a server for `service` listening on `config`'s address
    pub fn new(service: TransactionService, config: HttpConfig) -> crate::Result<Self> {
        let addr = config.socket_addr()?;
        let app = HttpService::new(service, config).router();
        Ok(Self { app, addr })
    }

    /// Address the server will bind
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> crate::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        info!("Starting HTTP server on {}", self.addr);

        if let Err(e) = axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!("Server error: {}", e);
            return Err(e.into());
        }

        info!("HTTP server stopped");
        Ok(())
    }
}
