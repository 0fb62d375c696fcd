mod health;
mod import;
mod login;
mod products;
mod sales;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::AppState;

pub fn create_router(login_path: &str) -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            login_path,
            get(login::login_status)
                .post(login::login_user)
                .delete(login::logout_user),
        )
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/import",
            post(import::upload_spreadsheet)
                .get(import::staged_rows)
                .delete(import::discard_rows),
        )
        .route("/products/import/commit", post(import::commit_rows))
        .route(
            "/products/{id}",
            put(products::update_product).delete(products::delete_product),
        )
        .route(
            "/products/{id}/sales",
            get(sales::list_sales).post(sales::record_sale),
        )
        .route("/products/{id}/sales/export.xlsx", get(sales::export_xlsx))
        .route("/products/{id}/sales/export.pdf", get(sales::export_pdf))
}
