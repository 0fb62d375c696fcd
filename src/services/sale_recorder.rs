use uuid::Uuid;

use crate::{
    config::SaleCommitMode,
    error::{AppError, Result},
    models::{NewSale, Product, SaleReceipt, SaleRequest, TransactionKind},
    store::Store,
};

pub const MOBILE_DIGITS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct SalePlan {
    pub sale: NewSale,
    pub current_stock: i32,
    pub new_stock: i32,
}

/// Stock level after applying `quantity` in the direction of `kind`.
pub fn next_stock(current: i32, kind: TransactionKind, quantity: i32) -> Result<i32> {
    match kind {
        TransactionKind::Incoming => current
            .checked_add(quantity)
            .ok_or_else(|| AppError::BadRequest("quantity is too large".to_string())),
        TransactionKind::Outgoing if quantity > current => Err(AppError::BadRequest(format!(
            "Only {} in stock; cannot sell {}.",
            current, quantity
        ))),
        TransactionKind::Outgoing => Ok(current - quantity),
    }
}

pub fn is_valid_mobile(mob: &str) -> bool {
    mob.len() == MOBILE_DIGITS && mob.bytes().all(|b| b.is_ascii_digit())
}

pub fn is_valid_customer_name(name: &str) -> bool {
    !name.chars().any(|c| c.is_ascii_digit())
}

/// `actor` is the session user; it is attributed unless the draft names someone else.
pub fn validate(draft: &SaleRequest, product: &Product, actor: &str) -> Result<SalePlan> {
    let customer_name = draft.customer_name.trim();
    let mob = draft.mob.as_str();
    let location = draft.location.trim();
    let color = draft.color.trim();

    if customer_name.is_empty()
        || mob.trim().is_empty()
        || location.is_empty()
        || color.is_empty()
        || draft.quantity < 1
    {
        return Err(AppError::BadRequest(
            "All fields are required and quantity must be > 0.".to_string(),
        ));
    }

    if !is_valid_mobile(mob) {
        return Err(AppError::BadRequest(
            "Mobile must be exactly 10 digits.".to_string(),
        ));
    }

    if !is_valid_customer_name(customer_name) {
        return Err(AppError::BadRequest(
            "Customer name must not contain numbers.".to_string(),
        ));
    }

    let quantity = i32::try_from(draft.quantity)
        .map_err(|_| AppError::BadRequest("quantity is too large".to_string()))?;

    let new_stock = next_stock(product.total_in_store, draft.kind, quantity)?;

    let created_by = draft
        .created_by
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(actor)
        .to_string();

    Ok(SalePlan {
        sale: NewSale {
            product_id: product.id,
            name: product.name.clone(),
            customer_name: customer_name.to_string(),
            mob: mob.to_string(),
            location: location.to_string(),
            description: product.description.clone(),
            color: color.to_string(),
            quantity,
            kind: draft.kind.sale_type(),
            created_by,
        },
        current_stock: product.total_in_store,
        new_stock,
    })
}

pub async fn commit(store: &dyn Store, plan: SalePlan, mode: SaleCommitMode) -> Result<SaleReceipt> {
    match mode {
        SaleCommitMode::Atomic => commit_atomic(store, plan).await,
        SaleCommitMode::Sequential => commit_sequential(store, plan).await,
    }
}

async fn commit_atomic(store: &dyn Store, plan: SalePlan) -> Result<SaleReceipt> {
    let sale = store
        .record_sale_atomic(&plan.sale, plan.current_stock, plan.new_stock)
        .await
        .map_err(|e| AppError::StoreError(format!("Sale commit failed: {}", e)))?
        .ok_or_else(|| {
            AppError::Conflict(
                "Stock changed since it was read; reload the product and try again.".to_string(),
            )
        })?;

    Ok(SaleReceipt {
        sale,
        total_in_store: plan.new_stock,
    })
}

// The sale row is not rolled back when the stock write fails afterwards.
async fn commit_sequential(store: &dyn Store, plan: SalePlan) -> Result<SaleReceipt> {
    let sale = store
        .insert_sale(&plan.sale)
        .await
        .map_err(|e| AppError::StoreError(format!("Insert failed: {}", e)))?;

    match store.set_stock(plan.sale.product_id, plan.new_stock).await {
        Ok(0) => {
            tracing::warn!(
                sale_id = %sale.id,
                product_id = %plan.sale.product_id,
                "Sale recorded for a product that no longer exists"
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(
                sale_id = %sale.id,
                product_id = %plan.sale.product_id,
                expected_stock = plan.new_stock,
                "Sale recorded but stock was not updated"
            );
            return Err(AppError::StoreError(format!("Stock update failed: {}", e)));
        }
    }

    Ok(SaleReceipt {
        sale,
        total_in_store: plan.new_stock,
    })
}

pub async fn record_sale(
    store: &dyn Store,
    mode: SaleCommitMode,
    product_id: Uuid,
    draft: &SaleRequest,
    actor: &str,
) -> Result<SaleReceipt> {
    let product = store
        .find_product(product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let plan = validate(draft, &product, actor)?;
    let receipt = commit(store, plan, mode).await?;

    tracing::info!(
        product_id = %product_id,
        sale_id = %receipt.sale.id,
        kind = receipt.sale.kind.as_str(),
        quantity = receipt.sale.quantity,
        total_in_store = receipt.total_in_store,
        "Sale recorded"
    );

    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{NewProduct, SaleType},
        store::{MemoryStore, StoreOp},
    };

    fn product(stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Tracklight".to_string(),
            product_no: "SL-00123".to_string(),
            description: "45W".to_string(),
            company: "saiwin lights".to_string(),
            total_in_store: stock,
        }
    }

    fn draft(kind: TransactionKind, quantity: i64) -> SaleRequest {
        SaleRequest {
            customer_name: "Asha Kulkarni".to_string(),
            mob: "9876543210".to_string(),
            location: "Pune".to_string(),
            color: "warm white".to_string(),
            quantity,
            kind,
            created_by: None,
        }
    }

    async fn seeded(stock: i32) -> (MemoryStore, Product) {
        let store = MemoryStore::new();
        let product = store
            .add_product(NewProduct {
                name: "Tracklight".to_string(),
                product_no: "SL-00123".to_string(),
                description: "45W".to_string(),
                company: "saiwin lights".to_string(),
                total_in_store: stock,
            })
            .await;
        (store, product)
    }

    fn message<T: std::fmt::Debug>(result: Result<T>) -> String {
        result.unwrap_err().to_string()
    }

    #[test]
    fn incoming_adds_and_outgoing_subtracts() {
        for stock in [0, 1, 7, 250] {
            for qty in 1..=10 {
                assert_eq!(
                    next_stock(stock, TransactionKind::Incoming, qty).unwrap(),
                    stock + qty
                );
                if qty <= stock {
                    assert_eq!(
                        next_stock(stock, TransactionKind::Outgoing, qty).unwrap(),
                        stock - qty
                    );
                } else {
                    assert_eq!(
                        message(next_stock(stock, TransactionKind::Outgoing, qty)),
                        format!("Only {} in stock; cannot sell {}.", stock, qty)
                    );
                }
            }
        }
    }

    #[test]
    fn mobile_needs_exactly_ten_ascii_digits() {
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("987654321"));
        assert!(!is_valid_mobile("98765432101"));
        assert!(!is_valid_mobile("98765-3210"));
        assert!(!is_valid_mobile("987654321a"));
        assert!(!is_valid_mobile("٩٨٧٦٥٤٣٢١٠"));
        assert!(!is_valid_mobile(""));
    }

    #[test]
    fn customer_name_rejects_digits() {
        assert!(is_valid_customer_name("Asha Kulkarni"));
        assert!(!is_valid_customer_name("Asha 2"));
        assert!(!is_valid_customer_name("7"));
    }

    #[test]
    fn validation_stops_at_the_first_failure() {
        let p = product(5);

        let mut d = draft(TransactionKind::Outgoing, 0);
        d.mob = "12".to_string();
        assert_eq!(
            message(validate(&d, &p, "ravi")),
            "All fields are required and quantity must be > 0."
        );

        let mut d = draft(TransactionKind::Outgoing, 9);
        d.mob = "12".to_string();
        d.customer_name = "R2D2".to_string();
        assert_eq!(
            message(validate(&d, &p, "ravi")),
            "Mobile must be exactly 10 digits."
        );

        let mut d = draft(TransactionKind::Outgoing, 9);
        d.customer_name = "R2D2".to_string();
        assert_eq!(
            message(validate(&d, &p, "ravi")),
            "Customer name must not contain numbers."
        );

        let d = draft(TransactionKind::Outgoing, 9);
        assert_eq!(
            message(validate(&d, &p, "ravi")),
            "Only 5 in stock; cannot sell 9."
        );
    }

    #[test]
    fn mobile_is_checked_without_trimming() {
        let p = product(5);

        for mob in [" 9876543210", "9876543210 ", " 9876543210 "] {
            let mut d = draft(TransactionKind::Incoming, 1);
            d.mob = mob.to_string();
            assert_eq!(
                message(validate(&d, &p, "ravi")),
                "Mobile must be exactly 10 digits."
            );
        }

        let mut d = draft(TransactionKind::Incoming, 1);
        d.mob = "   ".to_string();
        assert_eq!(
            message(validate(&d, &p, "ravi")),
            "All fields are required and quantity must be > 0."
        );
    }

    #[test]
    fn plan_copies_product_details_and_attributes_the_actor() {
        let p = product(5);
        let plan = validate(&draft(TransactionKind::Outgoing, 2), &p, "ravi").unwrap();

        assert_eq!(plan.current_stock, 5);
        assert_eq!(plan.new_stock, 3);
        assert_eq!(plan.sale.product_id, p.id);
        assert_eq!(plan.sale.name, "Tracklight");
        assert_eq!(plan.sale.description, "45W");
        assert_eq!(plan.sale.kind, SaleType::Sold);
        assert_eq!(plan.sale.created_by, "ravi");
    }

    #[test]
    fn explicit_attribution_wins_and_blank_falls_back() {
        let p = product(5);

        let mut d = draft(TransactionKind::Incoming, 1);
        d.created_by = Some("meena".to_string());
        assert_eq!(validate(&d, &p, "ravi").unwrap().sale.created_by, "meena");

        d.created_by = Some("   ".to_string());
        assert_eq!(validate(&d, &p, "ravi").unwrap().sale.created_by, "ravi");
    }

    #[tokio::test]
    async fn rejected_sale_writes_nothing() {
        let (store, p) = seeded(2).await;

        let result = record_sale(
            &store,
            SaleCommitMode::Atomic,
            p.id,
            &draft(TransactionKind::Outgoing, 3),
            "ravi",
        )
        .await;

        assert_eq!(message(result), "Only 2 in stock; cannot sell 3.");
        assert!(store.sales().await.is_empty());
        assert_eq!(store.products().await[0].total_in_store, 2);
    }

    #[tokio::test]
    async fn both_modes_record_sale_and_stock() {
        for mode in [SaleCommitMode::Atomic, SaleCommitMode::Sequential] {
            let (store, p) = seeded(10).await;

            let receipt = record_sale(&store, mode, p.id, &draft(TransactionKind::Outgoing, 4), "ravi")
                .await
                .unwrap();

            assert_eq!(receipt.total_in_store, 6);
            assert_eq!(receipt.sale.kind, SaleType::Sold);
            assert_eq!(store.products().await[0].total_in_store, 6);
            assert_eq!(store.sales().await.len(), 1);
        }
    }

    #[tokio::test]
    async fn sequential_mode_keeps_the_sale_when_stock_update_fails() {
        let (store, p) = seeded(10).await;
        store.fail(StoreOp::SetStock, "deadlock detected").await;

        let result = record_sale(
            &store,
            SaleCommitMode::Sequential,
            p.id,
            &draft(TransactionKind::Incoming, 4),
            "ravi",
        )
        .await;

        assert_eq!(message(result), "Stock update failed: deadlock detected");
        assert_eq!(store.sales().await.len(), 1);
        assert_eq!(store.products().await[0].total_in_store, 10);
    }

    #[tokio::test]
    async fn atomic_mode_rolls_back_when_stock_update_fails() {
        let (store, p) = seeded(10).await;
        store.fail(StoreOp::SetStock, "deadlock detected").await;

        let result = record_sale(
            &store,
            SaleCommitMode::Atomic,
            p.id,
            &draft(TransactionKind::Incoming, 4),
            "ravi",
        )
        .await;

        assert_eq!(message(result), "Sale commit failed: deadlock detected");
        assert!(store.sales().await.is_empty());
        assert_eq!(store.products().await[0].total_in_store, 10);
    }

    #[tokio::test]
    async fn failed_sale_insert_aborts_before_stock_update() {
        let (store, p) = seeded(10).await;
        store.fail(StoreOp::InsertSale, "permission denied").await;

        let result = record_sale(
            &store,
            SaleCommitMode::Sequential,
            p.id,
            &draft(TransactionKind::Outgoing, 1),
            "ravi",
        )
        .await;

        assert_eq!(message(result), "Insert failed: permission denied");
        assert_eq!(store.products().await[0].total_in_store, 10);
    }

    #[tokio::test]
    async fn atomic_mode_refuses_a_stale_read() {
        let (store, p) = seeded(10).await;
        let plan = validate(&draft(TransactionKind::Outgoing, 4), &p, "ravi").unwrap();

        // Another sale lands between the read and the commit.
        store.set_stock(p.id, 8).await.unwrap();

        let err = commit(&store, plan, SaleCommitMode::Atomic).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
        assert!(store.sales().await.is_empty());
        assert_eq!(store.products().await[0].total_in_store, 8);
    }

    #[tokio::test]
    async fn sequential_mode_lets_the_last_writer_win() {
        let (store, p) = seeded(10).await;
        let first = validate(&draft(TransactionKind::Outgoing, 4), &p, "ravi").unwrap();
        let second = validate(&draft(TransactionKind::Outgoing, 3), &p, "meena").unwrap();

        commit(&store, first, SaleCommitMode::Sequential).await.unwrap();
        commit(&store, second, SaleCommitMode::Sequential).await.unwrap();

        assert_eq!(store.sales().await.len(), 2);
        assert_eq!(store.products().await[0].total_in_store, 7);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let store = MemoryStore::new();

        let err = record_sale(
            &store,
            SaleCommitMode::Atomic,
            Uuid::new_v4(),
            &draft(TransactionKind::Incoming, 1),
            "ravi",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }
}
