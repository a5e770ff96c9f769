use axum::{
    Router,
    extract::{State, rejection::JsonRejection},
    response::Json,
    routing::{get, post},
};
use serde_json::Value;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::Config,
    error::Result,
    router::{BackendFactory, BackendSelector, CompletionRouter},
};

pub mod error_handling;
pub mod personas;
pub mod routes;

use personas::Persona;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub completion: CompletionRouter,
    pub backend: BackendSelector,
}

impl AppState {
    pub fn new(completion: CompletionRouter, backend: BackendSelector) -> Self {
        Self {
            completion,
            backend,
        }
    }
}

/// Build the full application: persona endpoints, health check, and the
/// bundled front-end (if `static_dir` exists) for everything else.
pub fn build_app(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app: Router<AppState> = Router::new().route("/health", get(routes::health_check));

    for persona in Persona::ALL {
        app = app.route(
            persona.path(),
            post(
                move |State(state): State<AppState>, body: std::result::Result<Json<Value>, JsonRejection>| {
                    routes::ask_persona(persona, state, body)
                },
            ),
        );
    }

    if let Some(dir) = static_dir {
        if dir.is_dir() {
            info!("Serving static files from {}", dir.display());
            let index = ServeFile::new(dir.join("index.html"));
            app = app.fallback_service(ServeDir::new(dir).fallback(index));
        } else {
            warn!("Static directory {} not found, front-end disabled", dir.display());
        }
    }

    app.with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub struct SahayakServer {
    config: Config,
}

impl SahayakServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn start(&self) -> Result<()> {
        let (selector, completion) = BackendFactory::create_router(&self.config.backends)?;
        let state = AppState::new(completion, selector);

        let static_dir = self.config.server.static_dir.as_deref().map(Path::new);
        let app = build_app(state, static_dir);

        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = TcpListener::bind(&addr).await?;

        info!("Sahayak server starting on http://{} (backend: {})", addr, selector);

        axum::serve(listener, app).await?;

        Ok(())
    }
}
