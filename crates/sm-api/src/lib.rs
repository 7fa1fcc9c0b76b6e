use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Router,
    body::Body,
    extract::DefaultBodyLimit,
    http::Method,
    http::Request,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
    middleware,
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use clap::Parser;
use dotenvy::dotenv;
use sm_common::MatchConfig;
use sm_common::logging::{init_tracing_subscriber, install_tracing_panic_hook};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;

pub mod error;
pub mod handlers;

use error::ApiError;
use handlers::{health, matching};

const SHUTDOWN_DRAIN_GRACE: std::time::Duration = std::time::Duration::from_millis(200);
const BODY_LIMIT_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Parser)]
#[command(name = "sm-api", about = "Skill-aware re-ranking of similarity search results")]
struct Cli {
    /// Server port
    #[arg(long, env = "PORT", default_value_t = 3001)]
    port: u16,

    /// Comma separated list of allowed CORS origins
    #[arg(long, env = "SM_CORS_ORIGINS", default_value = "http://localhost:3000")]
    cors_origins: String,

    /// Port for the Prometheus exporter
    #[arg(long, env = "SM_METRICS_PORT", default_value_t = 9102)]
    metrics_port: u16,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub metrics_port: u16,
}

impl AppConfig {
    fn from_cli(cli: Cli) -> Result<Self, ApiError> {
        let cors_origins = parse_origins(&cli.cors_origins);

        if cors_origins.iter().any(|origin| origin == "*") {
            return Err(ApiError::BadRequest(
                "SM_CORS_ORIGINS must list explicit origins".into(),
            ));
        }

        Ok(Self {
            port: cli.port,
            cors_origins,
            metrics_port: cli.metrics_port,
        })
    }

    pub fn for_tests() -> Self {
        Self {
            port: 3001,
            cors_origins: vec!["http://localhost:3000".into()],
            metrics_port: 9102,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub match_config: MatchConfig,
    pub readiness: Arc<AtomicBool>,
}

pub type SharedState = Arc<AppState>;

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed = origins
        .iter()
        .filter_map(|origin| origin.parse::<HeaderValue>().ok())
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

async fn attach_request_id_context(req: Request<Body>, next: Next) -> Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string());

    error::with_request_id(request_id, next.run(req)).await
}

pub fn create_router(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_header = request_id_header.clone();

    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(&trace_header)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        tracing::info_span!(
            "http_request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
            status = tracing::field::Empty,
        )
    });

    let matching_routes = Router::new()
        .route("/students-for-job", post(matching::students_for_job))
        .route("/jobs-for-student", post(matching::jobs_for_student));

    Router::new()
        .route("/health", get(health::readyz))
        .route("/livez", get(health::livez))
        .route("/readyz", get(health::readyz))
        .nest("/api/v1/matching", matching_routes)
        .layer(middleware::from_fn(attach_request_id_context))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(trace)
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid::default(),
        ))
        .layer(cors)
        .with_state(state)
}

pub fn test_state() -> SharedState {
    test_state_with(MatchConfig::default())
}

pub fn test_state_with(match_config: MatchConfig) -> SharedState {
    Arc::new(AppState {
        config: AppConfig::for_tests(),
        match_config,
        readiness: Arc::new(AtomicBool::new(true)),
    })
}

pub async fn run() -> Result<(), ApiError> {
    dotenv().ok();
    init_tracing_subscriber(env!("CARGO_PKG_NAME"));
    install_tracing_panic_hook(env!("CARGO_PKG_NAME"));

    let cli = Cli::parse();
    let config = AppConfig::from_cli(cli)?;
    let match_config = MatchConfig::from_env();

    sm_metrics::init_metrics(config.metrics_port);

    let state = Arc::new(AppState {
        config: config.clone(),
        match_config: match_config.clone(),
        readiness: Arc::new(AtomicBool::new(true)),
    });

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let app = create_router(state.clone());

    info!(
        %addr,
        run_id = sm_common::run_id::get(),
        max_top_k = match_config.max_top_k,
        max_candidates = match_config.max_candidates,
        default_min_similarity = match_config.default_min_similarity,
        "sm-api listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state.clone()))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(())
}

async fn shutdown_signal(state: SharedState) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
            let _ = sigterm.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    state.readiness.store(false, Ordering::SeqCst);
    info!("shutdown signal received; draining");

    // Load balancers need a moment to see /readyz fail before the listener closes.
    tokio::time::sleep(SHUTDOWN_DRAIN_GRACE).await;
}
