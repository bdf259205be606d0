//! CRUD handlers for the medications table.

use crate::models::{DeleteResponse, MedicationRequest, MedicationResponse};
use crate::services::record_medication_operation;
use crate::AppState;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use service_core::error::AppError;

/// Create a new medication.
///
/// Rejects the request when another row already holds the code or the name,
/// compared case-insensitively.
pub async fn create_medication(
    State(state): State<AppState>,
    Json(request): Json<MedicationRequest>,
) -> Result<Json<MedicationResponse>, AppError> {
    if let Some(existing) = state
        .db
        .find_conflicting(&request.code, &request.name)
        .await?
    {
        tracing::debug!(code = %existing.code, "Rejected duplicate medication");
        record_medication_operation("create", "conflict");
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Medication with the same code or name already exists"
        )));
    }

    let medication = state.db.insert(&request).await?;
    record_medication_operation("create", "ok");
    tracing::info!(id = medication.id, code = %medication.code, "Created medication");

    Ok(Json(medication.into()))
}

/// Replace an existing medication.
///
/// All four fields are overwritten unconditionally; there is no partial
/// update. A changed code is re-checked for collisions. A changed name is
/// not pre-checked; the store's unique index still backstops it.
pub async fn update_medication(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<MedicationRequest>,
) -> Result<Json<MedicationResponse>, AppError> {
    let current = state
        .db
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Medication not found")))?;

    if request.code.to_lowercase() != current.code.to_lowercase()
        && state.db.find_by_code(&request.code).await?.is_some()
    {
        record_medication_operation("update", "conflict");
        return Err(AppError::Conflict(anyhow::anyhow!(
            "Medication with the same code already exists"
        )));
    }

    let updated = state
        .db
        .update(id, &request)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Medication not found")))?;
    record_medication_operation("update", "ok");
    tracing::info!(id = updated.id, code = %updated.code, "Updated medication");

    Ok(Json(updated.into()))
}

/// Delete a medication, echoing the removed row's code.
pub async fn delete_medication(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeleteResponse>, AppError> {
    let deleted = state
        .db
        .delete(id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Medication not found")))?;
    record_medication_operation("delete", "ok");
    tracing::info!(id = deleted.id, code = %deleted.code, "Deleted medication");

    Ok(Json(DeleteResponse {
        detail: "Medication deleted successfully".to_string(),
        code: deleted.code,
    }))
}

/// Query parameters for medication lookup.
#[derive(Debug, Deserialize)]
pub struct LookupParams {
    pub code: Option<String>,
    pub name: Option<String>,
}

/// Look up a medication by code or name, case-insensitively.
///
/// Exactly one parameter is expected; code takes priority when both are
/// supplied.
pub async fn get_medication(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<MedicationResponse>, AppError> {
    let medication = if let Some(code) = params.code.as_deref() {
        state.db.find_by_code(code).await?
    } else if let Some(name) = params.name.as_deref() {
        state.db.find_by_name(name).await?
    } else {
        record_medication_operation("lookup", "bad_request");
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Either code or name must be provided"
        )));
    };

    let medication =
        medication.ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Medication not found")))?;
    record_medication_operation("lookup", "ok");

    Ok(Json(medication.into()))
}
