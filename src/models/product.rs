use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Companies a product may belong to, stored lower-cased.
pub const COMPANIES: [&str; 2] = ["saiwin lights", "prana lights"];

/// Resolves a free-form company label to its canonical stored form.
pub fn canonical_company(raw: &str) -> Option<&'static str> {
    let wanted = raw.trim().to_lowercase();
    COMPANIES.iter().copied().find(|c| *c == wanted)
}

// DB models

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub product_no: String,
    pub description: String,
    pub company: String,
    pub total_in_store: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub product_no: String,
    pub description: String,
    pub company: String,
    pub total_in_store: i32,
}

impl NewProduct {
    pub fn into_product(self, id: Uuid) -> Product {
        Product {
            id,
            name: self.name,
            product_no: self.product_no,
            description: self.description,
            company: self.company,
            total_in_store: self.total_in_store,
        }
    }
}

// Request types

#[derive(Debug, Default, Deserialize)]
pub struct CreateProductRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product_no: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company: String,
    pub total_in_store: Option<i64>,
}

/// Editable product fields. Stock is only changed through recorded sales.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductChanges {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub product_no: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub company: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub company: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteProductQuery {
    #[serde(default)]
    pub confirm: bool,
}

// Response types

#[derive(Debug, Serialize)]
pub struct ImportStagedResponse {
    pub staged: usize,
    pub rows: Vec<NewProduct>,
}

#[derive(Debug, Serialize)]
pub struct ImportCommitResponse {
    pub inserted: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_labels_are_matched_case_insensitively() {
        assert_eq!(canonical_company(" Saiwin Lights "), Some("saiwin lights"));
        assert_eq!(canonical_company("PRANA LIGHTS"), Some("prana lights"));
        assert_eq!(canonical_company("acme"), None);
        assert_eq!(canonical_company(""), None);
    }
}
