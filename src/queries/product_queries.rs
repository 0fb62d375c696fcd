use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{NewProduct, Product, ProductChanges},
};

const PRODUCT_COLUMNS: &str = "id, name, product_no, description, company, total_in_store";

pub async fn list_products(pool: &PgPool) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products ORDER BY name",
        PRODUCT_COLUMNS
    ))
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "SELECT {} FROM products WHERE id = $1",
        PRODUCT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn create_product(pool: &PgPool, req: &NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, product_no, description, company, total_in_store)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {}",
        PRODUCT_COLUMNS
    ))
    .bind(&req.name)
    .bind(&req.product_no)
    .bind(&req.description)
    .bind(&req.company)
    .bind(req.total_in_store)
    .fetch_one(pool)
    .await?;

    Ok(product)
}

/// Inserts every row in one statement; the batch lands entirely or not at all.
pub async fn create_products(pool: &PgPool, rows: &[NewProduct]) -> Result<Vec<Product>> {
    let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
    let product_nos: Vec<&str> = rows.iter().map(|r| r.product_no.as_str()).collect();
    let descriptions: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
    let companies: Vec<&str> = rows.iter().map(|r| r.company.as_str()).collect();
    let totals: Vec<i32> = rows.iter().map(|r| r.total_in_store).collect();

    let products = sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (name, product_no, description, company, total_in_store)
         SELECT unnest($1::text[]), unnest($2::text[]), unnest($3::text[]), unnest($4::text[]), unnest($5::int[])
         RETURNING {}",
        PRODUCT_COLUMNS
    ))
    .bind(&names)
    .bind(&product_nos)
    .bind(&descriptions)
    .bind(&companies)
    .bind(&totals)
    .fetch_all(pool)
    .await?;

    Ok(products)
}

pub async fn update_product(
    pool: &PgPool,
    id: Uuid,
    changes: &ProductChanges,
) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
        "UPDATE products
         SET name = $1, product_no = $2, description = $3, company = $4
         WHERE id = $5
         RETURNING {}",
        PRODUCT_COLUMNS
    ))
    .bind(&changes.name)
    .bind(&changes.product_no)
    .bind(&changes.description)
    .bind(&changes.company)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(product)
}

pub async fn set_stock(pool: &PgPool, id: Uuid, total_in_store: i32) -> Result<u64> {
    let result = sqlx::query("UPDATE products SET total_in_store = $1 WHERE id = $2")
        .bind(total_in_store)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_product(pool: &PgPool, id: Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
