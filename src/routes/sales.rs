use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    AppState,
    error::Result,
    models::{Sale, SaleReceipt, SaleRequest},
    services::{
        export_service::{
            self, PDF_CONTENT_TYPE, SALES_PDF_FILE, SALES_XLSX_FILE, XLSX_CONTENT_TYPE,
        },
        sale_recorder,
    },
    utils::session::SessionUser,
};

pub async fn list_sales(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Sale>>> {
    let sales = state.store.list_sales(id).await?;
    Ok(Json(sales))
}

pub async fn record_sale(
    State(state): State<AppState>,
    SessionUser(username): SessionUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaleRequest>,
) -> Result<(StatusCode, Json<SaleReceipt>)> {
    let receipt = sale_recorder::record_sale(
        state.store.as_ref(),
        state.sale_commit,
        id,
        &payload,
        &username,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn export_xlsx(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let sales = state.store.list_sales(id).await?;
    let bytes = export_service::sales_workbook(&sales)?;

    Ok(attachment(XLSX_CONTENT_TYPE, SALES_XLSX_FILE, bytes))
}

pub async fn export_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let sales = state.store.list_sales(id).await?;
    let bytes = export_service::sales_document(&sales)?;

    Ok(attachment(PDF_CONTENT_TYPE, SALES_PDF_FILE, bytes))
}

fn attachment(
    content_type: &'static str,
    file_name: &'static str,
    bytes: Vec<u8>,
) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
}
