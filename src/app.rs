use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::controller::{Controller, ControllerState, Outcome};
use crate::downloader::{XLSX_MIME, to_csv};
use crate::entry::{EntryFields, Field};
use crate::store::FILE_NAME;

pub struct AppState {
    controller: Mutex<Controller>,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        AppState {
            controller: Mutex::new(controller),
        }
    }

    // A panic mid-request leaves the state as the last transition wrote it,
    // which is still consistent, so a poisoned lock is taken over.
    fn lock(&self) -> MutexGuard<'_, Controller> {
        self.controller.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[derive(Deserialize)]
struct FieldUpdate {
    field: String,
    value: String,
}

#[derive(Serialize)]
struct ActionResponse {
    outcome: &'static str,
    state: ControllerState,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/field", post(set_field))
        .route("/api/form", post(set_form))
        .route("/api/submit", post(submit))
        .route("/api/edit/:id", post(begin_edit))
        .route("/api/cancel", post(cancel_edit))
        .route("/api/entries/:id", delete(delete_entry))
        .route("/api/share", post(share))
        .route("/api/export", get(export_xlsx))
        .route("/api/export.csv", get(export_csv))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(mut controller: Controller, bind: &str) -> Result<(), Box<dyn std::error::Error>> {
    controller.start();
    let app = router(Arc::new(AppState::new(controller)));

    let listener = TcpListener::bind(bind).await?;
    info!("Listening on http://{}", bind);
    axum::serve(listener, app).await?;

    Ok(())
}

fn outcome_name(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Loaded => "loaded",
        Outcome::Saved => "saved",
        Outcome::Updated => "updated",
        Outcome::Deleted => "deleted",
        Outcome::Rejected => "rejected",
        Outcome::Missing => "missing",
        Outcome::Shared => "shared",
        Outcome::Failed => "failed",
    }
}

fn outcome_status(outcome: Outcome) -> StatusCode {
    match outcome {
        Outcome::Rejected => StatusCode::UNPROCESSABLE_ENTITY,
        Outcome::Missing => StatusCode::NOT_FOUND,
        Outcome::Failed => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    }
}

// The notice is reported once, then cleared.
fn respond(controller: &mut Controller, outcome: Outcome) -> Response {
    let body = ActionResponse {
        outcome: outcome_name(outcome),
        state: controller.state().clone(),
    };
    controller.take_notice();
    (outcome_status(outcome), Json(body)).into_response()
}

async fn get_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let controller = state.lock();
    Json(controller.state().clone())
}

async fn set_field(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FieldUpdate>,
) -> impl IntoResponse {
    let Some(field) = Field::from_strng(&payload.field) else {
        return (
            StatusCode::BAD_REQUEST,
            format!("unknown field: {}", payload.field),
        )
            .into_response();
    };

    let mut controller = state.lock();
    controller.set_field(field, payload.value);
    Json(controller.state().clone()).into_response()
}

async fn set_form(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EntryFields>,
) -> impl IntoResponse {
    let mut controller = state.lock();
    controller.set_form(payload);
    Json(controller.state().clone())
}

async fn submit(State(state): State<Arc<AppState>>) -> Response {
    let mut controller = state.lock();
    let outcome = controller.submit();
    respond(&mut controller, outcome)
}

async fn begin_edit(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let mut controller = state.lock();
    if !controller.begin_edit(&id) {
        return (StatusCode::NOT_FOUND, format!("no entry with id {}", id)).into_response();
    }
    Json(controller.state().clone()).into_response()
}

async fn cancel_edit(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut controller = state.lock();
    controller.cancel_edit();
    Json(controller.state().clone())
}

async fn delete_entry(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let mut controller = state.lock();
    let outcome = controller.delete(&id);
    respond(&mut controller, outcome)
}

async fn share(State(state): State<Arc<AppState>>) -> Response {
    let mut controller = state.lock();
    let outcome = controller.share();
    respond(&mut controller, outcome)
}

async fn export_xlsx(State(state): State<Arc<AppState>>) -> Response {
    let controller = state.lock();
    match controller.store().export_bytes() {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, XLSX_MIME.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", FILE_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn export_csv(State(state): State<Arc<AppState>>) -> Response {
    let controller = state.lock();
    match controller.store().load_all() {
        Ok(entries) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"data.csv\"".to_string(),
                ),
            ],
            to_csv(&entries),
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
