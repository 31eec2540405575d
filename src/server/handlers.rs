//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Html,
    Form, Json,
};
use serde::Deserialize;
use tracing::info;

use crate::booking::{records_to_frame, BookingRecord};
use crate::config::MAX_PREVIEW_ROWS;
use crate::dataset::DatasetPreview;
use crate::encoding::SchemaReport;
use crate::inference::{PredictionOutcome, StatsSnapshot};
use crate::samples::{self, SampleCase};

use super::error::{Result, ServerError};
use super::form::parse_booking_form;
use super::state::AppState;
use super::views::{render_form_page, FormPage, Panel};

// ============================================================================
// Form Handlers
// ============================================================================

fn render(state: &AppState, record: &BookingRecord, panel: Panel<'_>) -> Html<String> {
    let samples = samples::sample_cases();
    let preview = state.preview.as_ref().map(|p| p.head(state.config.preview_rows));
    Html(render_form_page(&FormPage {
        record,
        panel,
        disabled_reason: state.service.disabled_reason(),
        samples: &samples,
        preview: preview.as_ref(),
    }))
}

pub async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    render(&state, &BookingRecord::default(), Panel::Empty)
}

pub async fn serve_sample(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Html<String>> {
    let case = samples::find(&name)
        .ok_or_else(|| ServerError::NotFound(format!("Sample case not found: {}", name)))?;
    Ok(render(&state, &case.record, Panel::Empty))
}

pub async fn submit_form(
    State(state): State<Arc<AppState>>,
    form: std::result::Result<Form<HashMap<String, String>>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let values = match form {
        Ok(Form(values)) => values,
        Err(rejection) => {
            let message = format!("Invalid form submission: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                render(&state, &BookingRecord::default(), Panel::Error(&message)),
            );
        }
    };

    let parsed = parse_booking_form(&values);
    if !parsed.is_valid() {
        let message = parsed.error_message();
        return (
            StatusCode::BAD_REQUEST,
            render(&state, &parsed.record, Panel::Error(&message)),
        );
    }
    let record = parsed.record;

    let result = state
        .service
        .predictor()
        .and_then(|predictor| predictor.predict(&record));
    match result {
        Ok(outcome) => {
            info!(label = %outcome.label, probability = ?outcome.probability, "Form prediction");
            (StatusCode::OK, render(&state, &record, Panel::Outcome(&outcome)))
        }
        Err(e) => {
            let err = ServerError::from(e);
            let message = err.message();
            (err.status(), render(&state, &record, Panel::Error(&message)))
        }
    }
}

// ============================================================================
// Inference Handlers
// ============================================================================

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BookingRecord>, JsonRejection>,
) -> Result<Json<PredictionOutcome>> {
    let Json(record) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let outcome = state.service.predictor()?.predict(&record)?;
    Ok(Json(outcome))
}

pub async fn predict_batch(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Vec<BookingRecord>>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(records) = payload.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    let predictor = state.service.predictor()?;

    if records.is_empty() {
        return Err(ServerError::BadRequest("Records array is empty".to_string()));
    }
    for (i, record) in records.iter().enumerate() {
        record
            .validate()
            .map_err(|e| ServerError::BadRequest(format!("record {}: {}", i, e)))?;
    }

    let raw = records_to_frame(&records)?;
    let verdicts = predictor.predict_frame(&raw)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "count": verdicts.len(),
        "predictions": verdicts,
    })))
}

pub async fn get_schema(State(state): State<Arc<AppState>>) -> Result<Json<SchemaReport>> {
    Ok(Json(state.service.predictor()?.pipeline().schema_report()))
}

pub async fn list_samples() -> Json<Vec<SampleCase>> {
    Json(samples::sample_cases())
}

pub async fn get_inference_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsSnapshot>> {
    Ok(Json(state.service.predictor()?.stats()))
}

// ============================================================================
// Data Handlers
// ============================================================================

#[derive(Deserialize)]
pub struct PreviewQuery {
    rows: Option<usize>,
}

pub async fn get_dataset_preview(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PreviewQuery>,
) -> Result<Json<DatasetPreview>> {
    if state.config.dataset_path.is_none() {
        return Err(ServerError::NotFound("No reference dataset configured".to_string()));
    }
    let preview = state
        .preview
        .as_ref()
        .ok_or_else(|| ServerError::NotFound("Reference dataset unavailable".to_string()))?;

    let n_rows = query.rows.unwrap_or(state.config.preview_rows).min(MAX_PREVIEW_ROWS);
    Ok(Json(preview.head(n_rows)))
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let artifacts = state
        .service
        .predictor()
        .ok()
        .and_then(|predictor| predictor.info().cloned());

    Json(serde_json::json!({
        "status": if state.service.is_ready() { "ok" } else { "degraded" },
        "version": env!("CARGO_PKG_VERSION"),
        "prediction_enabled": state.service.is_ready(),
        "disabled_reason": state.service.disabled_reason(),
        "artifacts": artifacts,
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": state.uptime_secs(),
    }))
}
