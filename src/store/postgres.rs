use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    database,
    error::Result,
    models::{Credential, NewProduct, NewSale, Product, ProductChanges, Sale},
    queries::{login_queries, product_queries, sale_queries},
    store::Store,
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<()> {
        database::check_health(&self.pool).await
    }

    async fn find_credential(&self, username: &str) -> Result<Option<Credential>> {
        login_queries::find_by_username(&self.pool, username).await
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        product_queries::list_products(&self.pool).await
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        product_queries::find_by_id(&self.pool, id).await
    }

    async fn insert_product(&self, row: &NewProduct) -> Result<Product> {
        product_queries::create_product(&self.pool, row).await
    }

    async fn insert_products(&self, rows: &[NewProduct]) -> Result<Vec<Product>> {
        product_queries::create_products(&self.pool, rows).await
    }

    async fn update_product(&self, id: Uuid, changes: &ProductChanges) -> Result<Option<Product>> {
        product_queries::update_product(&self.pool, id, changes).await
    }

    async fn set_stock(&self, id: Uuid, total_in_store: i32) -> Result<u64> {
        product_queries::set_stock(&self.pool, id, total_in_store).await
    }

    async fn delete_product(&self, id: Uuid) -> Result<u64> {
        product_queries::delete_product(&self.pool, id).await
    }

    async fn list_sales(&self, product_id: Uuid) -> Result<Vec<Sale>> {
        sale_queries::list_for_product(&self.pool, product_id).await
    }

    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale> {
        let mut conn = self.pool.acquire().await?;
        sale_queries::insert_sale(&mut conn, sale).await
    }

    async fn record_sale_atomic(
        &self,
        sale: &NewSale,
        expected_stock: i32,
        new_stock: i32,
    ) -> Result<Option<Sale>> {
        sale_queries::record_sale_atomic(&self.pool, sale, expected_stock, new_stock).await
    }
}
