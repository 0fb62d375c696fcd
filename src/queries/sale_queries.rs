use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    error::Result,
    models::{NewSale, Sale},
};

const SALE_COLUMNS: &str = "id, product_id, name, customer_name, mob, location, description, color, \
                            quantity, type, created_by, created_at";

pub async fn list_for_product(pool: &PgPool, product_id: Uuid) -> Result<Vec<Sale>> {
    let sales = sqlx::query_as::<_, Sale>(&format!(
        "SELECT {} FROM sales WHERE product_id = $1 ORDER BY created_at ASC",
        SALE_COLUMNS
    ))
    .bind(product_id)
    .fetch_all(pool)
    .await?;

    Ok(sales)
}

pub async fn insert_sale(conn: &mut PgConnection, sale: &NewSale) -> Result<Sale> {
    let sale = sqlx::query_as::<_, Sale>(&format!(
        "INSERT INTO sales (product_id, name, customer_name, mob, location, description, color,
                            quantity, type, created_by)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
         RETURNING {}",
        SALE_COLUMNS
    ))
    .bind(sale.product_id)
    .bind(&sale.name)
    .bind(&sale.customer_name)
    .bind(&sale.mob)
    .bind(&sale.location)
    .bind(&sale.description)
    .bind(&sale.color)
    .bind(sale.quantity)
    .bind(sale.kind.as_str())
    .bind(&sale.created_by)
    .fetch_one(&mut *conn)
    .await?;

    Ok(sale)
}

/// Inserts the sale and moves the product's stock from `expected_stock` to `new_stock`
/// in one transaction. Returns `None` and writes nothing when the stock no longer
/// matches `expected_stock`.
pub async fn record_sale_atomic(
    pool: &PgPool,
    sale: &NewSale,
    expected_stock: i32,
    new_stock: i32,
) -> Result<Option<Sale>> {
    let mut tx = pool.begin().await?;

    let inserted = insert_sale(&mut tx, sale).await?;

    let updated = sqlx::query(
        "UPDATE products SET total_in_store = $1 WHERE id = $2 AND total_in_store = $3",
    )
    .bind(new_stock)
    .bind(sale.product_id)
    .bind(expected_stock)
    .execute(&mut *tx)
    .await?;

    if updated.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }

    tx.commit().await?;
    Ok(Some(inserted))
}
