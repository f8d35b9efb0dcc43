//! Prediction handlers
//!
//! Scoring is CPU-bound, so each request runs on the blocking pool.

use axum::{extract::{rejection::JsonRejection, State}, Json};
use validator::Validate;
use xdetect_core::{FlowRecord, ScoreResult};

use crate::{AppState, AppResult, AppError};
use crate::models::{BatchItem, BatchPredictRequest, BatchPredictResponse, PredictRequest};

/// Score a single flow
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<ScoreResult>> {
    let Json(req) = payload?;
    req.validate()?;

    let record = FlowRecord::from(req);
    let pipeline = state.pipeline.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.predict(&record)).await??;

    Ok(Json(result))
}

/// Score many flows; failures are reported per record
pub async fn predict_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchPredictRequest>, JsonRejection>,
) -> AppResult<Json<BatchPredictResponse>> {
    let Json(req) = payload?;

    if req.records.is_empty() {
        return Err(AppError::ValidationError("records must not be empty".to_string()));
    }
    if req.records.len() > state.config.max_batch_size {
        return Err(AppError::ValidationError(format!(
            "batch of {} records exceeds the limit of {}",
            req.records.len(),
            state.config.max_batch_size
        )));
    }

    let pipeline = state.pipeline.clone();
    let outcomes = tokio::task::spawn_blocking(move || pipeline.predict_batch(&req.records)).await?;

    let results: Vec<BatchItem> = outcomes
        .into_iter()
        .map(|outcome| match outcome {
            Ok(result) => BatchItem::Scored(result),
            Err(e) => BatchItem::Failed { error: e.to_string() },
        })
        .collect();

    let failed = results
        .iter()
        .filter(|item| matches!(item, BatchItem::Failed { .. }))
        .count();

    tracing::debug!("Batch scored: {} records, {} failed", results.len(), failed);

    Ok(Json(BatchPredictResponse {
        scored: results.len() - failed,
        failed,
        results,
    }))
}
