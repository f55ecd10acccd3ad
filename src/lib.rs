pub mod auth;
pub mod board;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod sample;
pub mod settings;
pub mod store;
pub mod validation;

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use handlers::{
    create_course, get_course, get_course_board, healthz_live, healthz_ready, list_courses, root,
    update_course,
};
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::require_bearer;
use crate::board::BoardStore;
use crate::openapi::ApiDoc;
use crate::settings::Settings;
use crate::store::CourseStore;

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub courses: Arc<CourseStore>,
    pub boards: Arc<BoardStore>,
}

impl AppState {
    /// State seeded with the bundled sample courses and boards.
    pub fn with_sample_data(settings: Settings) -> Self {
        Self {
            settings,
            courses: Arc::new(CourseStore::new(sample::courses())),
            boards: Arc::new(BoardStore::new(sample::boards())),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState::with_sample_data(settings.clone());
    let app = build_router(state);

    let addr = format!("{}:{}", settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Starting Course Dashboard API on {} (auth {})",
        listener.local_addr()?,
        if settings.require_auth { "required" } else { "disabled" }
    );

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => return Ok(joined??),
        () = shutdown_signal() => {}
    }

    info!("Shutting down, waiting for in-flight requests");
    let _ = stop_tx.send(());
    match tokio::time::timeout(settings.shutdown_timeout(), server).await {
        Ok(joined) => joined??,
        Err(_) => warn!(
            "Graceful shutdown exceeded {}s, dropping remaining connections",
            settings.shutdown_timeout_secs
        ),
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut api = Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route("/courses/{id}", get(get_course).put(update_course))
        .route("/courses/{id}/board", get(get_course_board));

    if state.settings.require_auth {
        api = api.route_layer(middleware::from_fn(require_bearer));
    }

    let mut router = Router::new()
        .route("/", get(root))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .nest("/api", api)
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    if state.settings.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.layer(trace_layer)
}
