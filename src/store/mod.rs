mod memory;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{Credential, NewProduct, NewSale, Product, ProductChanges, Sale},
};

pub use memory::{MemoryStore, StoreOp};
pub use postgres::PgStore;

#[async_trait]
pub trait Store: Send + Sync {
    async fn ping(&self) -> Result<()>;

    // login
    /// `None` for an unknown username and for one shared by several rows.
    async fn find_credential(&self, username: &str) -> Result<Option<Credential>>;

    // products
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn find_product(&self, id: Uuid) -> Result<Option<Product>>;
    async fn insert_product(&self, row: &NewProduct) -> Result<Product>;
    async fn insert_products(&self, rows: &[NewProduct]) -> Result<Vec<Product>>;
    async fn update_product(&self, id: Uuid, changes: &ProductChanges) -> Result<Option<Product>>;
    /// Unconditional write; the last writer wins.
    async fn set_stock(&self, id: Uuid, total_in_store: i32) -> Result<u64>;
    async fn delete_product(&self, id: Uuid) -> Result<u64>;

    // sales
    async fn list_sales(&self, product_id: Uuid) -> Result<Vec<Sale>>;
    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale>;
    /// `Ok(None)` means the stock no longer equals `expected_stock` and nothing was written.
    async fn record_sale_atomic(
        &self,
        sale: &NewSale,
        expected_stock: i32,
        new_stock: i32,
    ) -> Result<Option<Sale>>;
}
