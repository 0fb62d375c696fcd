use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Stored direction of a sale row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    /// Stock came in.
    Bought,
    /// Stock went out.
    Sold,
}

impl SaleType {
    pub fn as_str(self) -> &'static str {
        match self {
            SaleType::Bought => "bought",
            SaleType::Sold => "sold",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown sale type: {0}")]
pub struct UnknownSaleType(pub String);

impl TryFrom<String> for SaleType {
    type Error = UnknownSaleType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "bought" => Ok(SaleType::Bought),
            "sold" => Ok(SaleType::Sold),
            _ => Err(UnknownSaleType(value)),
        }
    }
}

/// Direction chosen on the billing form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    #[serde(alias = "income")]
    Incoming,
    Outgoing,
}

impl TransactionKind {
    pub fn sale_type(self) -> SaleType {
        match self {
            TransactionKind::Incoming => SaleType::Bought,
            TransactionKind::Outgoing => SaleType::Sold,
        }
    }
}

// DB models

/// Field order is the column order of the spreadsheet export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub name: String,
    pub customer_name: String,
    pub mob: String,
    pub location: String,
    pub description: String,
    pub color: String,
    pub quantity: i32,
    #[serde(rename = "type")]
    #[sqlx(rename = "type", try_from = "String")]
    pub kind: SaleType,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub product_id: Uuid,
    pub name: String,
    pub customer_name: String,
    pub mob: String,
    pub location: String,
    pub description: String,
    pub color: String,
    pub quantity: i32,
    pub kind: SaleType,
    pub created_by: String,
}

impl NewSale {
    pub fn into_sale(self, id: Uuid, created_at: DateTime<Utc>) -> Sale {
        Sale {
            id,
            product_id: self.product_id,
            name: self.name,
            customer_name: self.customer_name,
            mob: self.mob,
            location: self.location,
            description: self.description,
            color: self.color,
            quantity: self.quantity,
            kind: self.kind,
            created_by: Some(self.created_by),
            created_at,
        }
    }
}

// Request types

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SaleRequest {
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub mob: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub kind: TransactionKind,
    pub created_by: Option<String>,
}

// Response types

#[derive(Debug, Serialize)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub total_in_store: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sale_type_round_trips_through_its_stored_label() {
        for kind in [SaleType::Bought, SaleType::Sold] {
            assert_eq!(SaleType::try_from(kind.as_str().to_string()).unwrap(), kind);
        }
        assert!(SaleType::try_from("returned".to_string()).is_err());
    }

    #[test]
    fn sale_request_defaults_to_incoming() {
        let req: SaleRequest = serde_json::from_str(r#"{"quantity": 2}"#).unwrap();
        assert_eq!(req.kind, TransactionKind::Incoming);
        assert_eq!(req.kind.sale_type(), SaleType::Bought);

        let req: SaleRequest = serde_json::from_str(r#"{"kind": "income"}"#).unwrap();
        assert_eq!(req.kind, TransactionKind::Incoming);

        let req: SaleRequest = serde_json::from_str(r#"{"kind": "outgoing"}"#).unwrap();
        assert_eq!(req.kind.sale_type(), SaleType::Sold);
    }
}
