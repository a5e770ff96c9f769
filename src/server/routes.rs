use axum::{
    extract::{State, rejection::JsonRejection},
    response::{Json, Response},
};
use serde_json::{Value, json};
use tracing::info;

use super::{
    AppState,
    error_handling::{completion_response, rejected_body},
    personas::Persona,
};

/// Shared handler behind every persona endpoint
pub async fn ask_persona(
    persona: Persona,
    state: AppState,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return rejected_body(rejection),
    };

    info!(persona = persona.name(), backend = %state.backend, "Persona request");

    let turns = persona.conversation_from_body(&body);
    let result = state.completion.complete(&turns).await;
    completion_response(result)
}

pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "sahayak",
        "version": env!("CARGO_PKG_VERSION"),
        "backend": state.backend.as_str(),
    }))
}
