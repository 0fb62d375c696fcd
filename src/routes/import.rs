use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{ImportCommitResponse, ImportStagedResponse},
    services::import_service,
    utils::session::SessionUser,
};

const FILE_FIELD: &str = "file";

/// Parses the uploaded workbook and stages its rows for the caller. Any failure drops
/// previously staged rows so the user starts again from a fresh upload.
pub async fn upload_spreadsheet(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
    mut multipart: Multipart,
) -> Result<Json<ImportStagedResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid upload: {}", e)))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        AppError::BadRequest(format!("Attach the spreadsheet as the '{}' field", FILE_FIELD))
    })?;

    let parsed = import_service::check_extension(&file_name)
        .and_then(|_| import_service::parse_workbook(&bytes));

    let rows = match parsed {
        Ok(rows) => rows,
        Err(e) => {
            state.imports.clear(&username).await;
            tracing::warn!("Rejected import {:?} from {}: {}", file_name, username, e);
            return Err(e.into());
        }
    };

    let staged = state.imports.stage(&username, rows.clone()).await;
    tracing::info!("Staged {} product row(s) from {:?} for {}", staged, file_name, username);

    Ok(Json(ImportStagedResponse { staged, rows }))
}

pub async fn staged_rows(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
) -> Json<ImportStagedResponse> {
    let rows = state.imports.peek(&username).await;

    Json(ImportStagedResponse {
        staged: rows.len(),
        rows,
    })
}

/// Inserts the staged rows as one batch. The batch is consumed either way; after a
/// failed insert the spreadsheet has to be uploaded again.
pub async fn commit_rows(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
) -> Result<Json<ImportCommitResponse>> {
    let rows = state
        .imports
        .take(&username)
        .await
        .filter(|rows| !rows.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest("No rows staged; upload a spreadsheet first".to_string())
        })?;

    let inserted = state
        .store
        .insert_products(&rows)
        .await
        .map_err(|e| AppError::StoreError(format!("Upload failed: {}", e)))?;

    tracing::info!("Imported {} product(s) for {}", inserted.len(), username);

    Ok(Json(ImportCommitResponse {
        inserted: inserted.len(),
    }))
}

pub async fn discard_rows(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
) -> StatusCode {
    state.imports.clear(&username).await;
    StatusCode::NO_CONTENT
}
