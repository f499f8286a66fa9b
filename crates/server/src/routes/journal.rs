use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use models::{JournalEntry, NewJournalEntry};
use service::errors::ServiceError;
use tracing::{error, warn};

use crate::errors::ApiError;
use crate::state::AppState;

const FETCH_FAILED: &str = "Failed to fetch journal entries";
const CREATE_FAILED: &str = "Failed to create journal entry";

#[utoipa::path(
    get, path = "/api/journal-entries", tag = "journal",
    responses(
        (status = 200, description = "All entries, newest first", body = [crate::openapi::JournalEntryDoc]),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn list_entries(State(state): State<AppState>) -> Result<Json<Vec<JournalEntry>>, ApiError> {
    match state.journal.list().await {
        Ok(entries) => Ok(Json(entries)),
        Err(e) => {
            error!(error = %e, "fetching journal entries failed");
            Err(ApiError::Internal(FETCH_FAILED))
        }
    }
}

#[utoipa::path(
    post, path = "/api/journal-entries", tag = "journal",
    request_body = crate::openapi::NewJournalEntryDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::JournalEntryDoc),
        (status = 400, description = "Malformed body or empty content", body = crate::openapi::ErrorBody),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create_entry(
    State(state): State<AppState>,
    payload: Result<Json<NewJournalEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<JournalEntry>), ApiError> {
    let Json(input) = payload.map_err(|rejection| {
        warn!(reason = %rejection.body_text(), "rejected journal entry body");
        ApiError::Validation(rejection.body_text())
    })?;

    match state.journal.create(input).await {
        Ok(entry) => Ok((StatusCode::CREATED, Json(entry))),
        Err(ServiceError::Validation(msg)) => {
            warn!(reason = %msg, "rejected journal entry");
            Err(ApiError::Validation(msg))
        }
        Err(e) => {
            error!(error = %e, "creating journal entry failed");
            Err(ApiError::Internal(CREATE_FAILED))
        }
    }
}
