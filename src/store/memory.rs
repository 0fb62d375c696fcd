use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, Result},
    models::{Credential, NewProduct, NewSale, Product, ProductChanges, Sale},
    store::Store,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    FindCredential,
    ListProducts,
    FindProduct,
    InsertProduct,
    InsertProducts,
    UpdateProduct,
    SetStock,
    DeleteProduct,
    ListSales,
    InsertSale,
}

#[derive(Default)]
struct Tables {
    credentials: Vec<Credential>,
    products: Vec<Product>,
    sales: Vec<Sale>,
}

/// In-process store with the same semantics as the Postgres one.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    failures: RwLock<HashMap<StoreOp, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_credential(&self, username: &str, password: &str) {
        self.tables.write().await.credentials.push(Credential {
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    pub async fn add_product(&self, row: NewProduct) -> Product {
        let product = row.into_product(Uuid::new_v4());
        self.tables.write().await.products.push(product.clone());
        product
    }

    /// Makes every later call of `op` fail with `message` until cleared.
    pub async fn fail(&self, op: StoreOp, message: &str) {
        self.failures.write().await.insert(op, message.to_string());
    }

    pub async fn clear_failure(&self, op: StoreOp) {
        self.failures.write().await.remove(&op);
    }

    pub async fn products(&self) -> Vec<Product> {
        self.tables.read().await.products.clone()
    }

    pub async fn sales(&self) -> Vec<Sale> {
        self.tables.read().await.sales.clone()
    }

    async fn check(&self, op: StoreOp) -> Result<()> {
        match self.failures.read().await.get(&op) {
            Some(message) => Err(AppError::StoreError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_credential(&self, username: &str) -> Result<Option<Credential>> {
        self.check(StoreOp::FindCredential).await?;
        let tables = self.tables.read().await;
        let mut matches = tables.credentials.iter().filter(|c| c.username == username);
        match (matches.next(), matches.next()) {
            (Some(credential), None) => Ok(Some(credential.clone())),
            _ => Ok(None),
        }
    }

    async fn list_products(&self) -> Result<Vec<Product>> {
        self.check(StoreOp::ListProducts).await?;
        let mut products = self.tables.read().await.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn find_product(&self, id: Uuid) -> Result<Option<Product>> {
        self.check(StoreOp::FindProduct).await?;
        let tables = self.tables.read().await;
        Ok(tables.products.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_product(&self, row: &NewProduct) -> Result<Product> {
        self.check(StoreOp::InsertProduct).await?;
        let product = row.clone().into_product(Uuid::new_v4());
        self.tables.write().await.products.push(product.clone());
        Ok(product)
    }

    async fn insert_products(&self, rows: &[NewProduct]) -> Result<Vec<Product>> {
        self.check(StoreOp::InsertProducts).await?;
        let inserted: Vec<Product> = rows
            .iter()
            .cloned()
            .map(|row| row.into_product(Uuid::new_v4()))
            .collect();
        self.tables
            .write()
            .await
            .products
            .extend(inserted.iter().cloned());
        Ok(inserted)
    }

    async fn update_product(&self, id: Uuid, changes: &ProductChanges) -> Result<Option<Product>> {
        self.check(StoreOp::UpdateProduct).await?;
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        product.name = changes.name.clone();
        product.product_no = changes.product_no.clone();
        product.description = changes.description.clone();
        product.company = changes.company.clone();
        Ok(Some(product.clone()))
    }

    async fn set_stock(&self, id: Uuid, total_in_store: i32) -> Result<u64> {
        self.check(StoreOp::SetStock).await?;
        let mut tables = self.tables.write().await;
        match tables.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.total_in_store = total_in_store;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_product(&self, id: Uuid) -> Result<u64> {
        self.check(StoreOp::DeleteProduct).await?;
        let mut tables = self.tables.write().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != id);
        Ok((before - tables.products.len()) as u64)
    }

    async fn list_sales(&self, product_id: Uuid) -> Result<Vec<Sale>> {
        self.check(StoreOp::ListSales).await?;
        let tables = self.tables.read().await;
        Ok(tables
            .sales
            .iter()
            .filter(|s| s.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn insert_sale(&self, sale: &NewSale) -> Result<Sale> {
        self.check(StoreOp::InsertSale).await?;
        let sale = sale.clone().into_sale(Uuid::new_v4(), Utc::now());
        self.tables.write().await.sales.push(sale.clone());
        Ok(sale)
    }

    async fn record_sale_atomic(
        &self,
        sale: &NewSale,
        expected_stock: i32,
        new_stock: i32,
    ) -> Result<Option<Sale>> {
        // Both writes share one transaction, so a failure of either writes nothing.
        self.check(StoreOp::InsertSale).await?;
        self.check(StoreOp::SetStock).await?;

        let mut tables = self.tables.write().await;
        let Some(product) = tables
            .products
            .iter_mut()
            .find(|p| p.id == sale.product_id && p.total_in_store == expected_stock)
        else {
            return Ok(None);
        };
        product.total_in_store = new_stock;

        let sale = sale.clone().into_sale(Uuid::new_v4(), Utc::now());
        tables.sales.push(sale.clone());
        Ok(Some(sale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp() -> NewProduct {
        NewProduct {
            name: "Tracklight".to_string(),
            product_no: "SL-00123".to_string(),
            description: "45W".to_string(),
            company: "saiwin lights".to_string(),
            total_in_store: 10,
        }
    }

    fn sale_of(product: &Product, quantity: i32) -> NewSale {
        NewSale {
            product_id: product.id,
            name: product.name.clone(),
            customer_name: "Asha".to_string(),
            mob: "9876543210".to_string(),
            location: "Pune".to_string(),
            description: product.description.clone(),
            color: "white".to_string(),
            quantity,
            kind: crate::models::SaleType::Sold,
            created_by: "ravi".to_string(),
        }
    }

    #[tokio::test]
    async fn injected_failures_surface_as_store_errors() {
        let store = MemoryStore::new();
        store.fail(StoreOp::ListProducts, "connection reset").await;

        let err = store.list_products().await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");

        store.clear_failure(StoreOp::ListProducts).await;
        assert!(store.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn duplicate_usernames_resolve_to_no_credential() {
        let store = MemoryStore::new();
        store.add_credential("ravi", "lamp42").await;
        assert!(store.find_credential("ravi").await.unwrap().is_some());

        store.add_credential("ravi", "other").await;
        assert!(store.find_credential("ravi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_batch_insert_inserts_nothing() {
        let store = MemoryStore::new();
        store.fail(StoreOp::InsertProducts, "value too long").await;

        assert!(store.insert_products(&[lamp(), lamp()]).await.is_err());
        assert!(store.products().await.is_empty());
    }

    #[tokio::test]
    async fn atomic_record_refuses_stale_stock() {
        let store = MemoryStore::new();
        let product = store.add_product(lamp()).await;

        let outcome = store
            .record_sale_atomic(&sale_of(&product, 3), 9, 6)
            .await
            .unwrap();

        assert!(outcome.is_none());
        assert!(store.sales().await.is_empty());
        assert_eq!(store.products().await[0].total_in_store, 10);
    }

    #[tokio::test]
    async fn atomic_record_applies_both_writes() {
        let store = MemoryStore::new();
        let product = store.add_product(lamp()).await;

        let sale = store
            .record_sale_atomic(&sale_of(&product, 3), 10, 7)
            .await
            .unwrap()
            .expect("stock matched");

        assert_eq!(sale.created_by.as_deref(), Some("ravi"));
        assert_eq!(store.sales().await.len(), 1);
        assert_eq!(store.products().await[0].total_in_store, 7);
    }
}
