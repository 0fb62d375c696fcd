use crate::models::Product;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CompanyFilter {
    #[default]
    All,
    Company(String),
}

impl CompanyFilter {
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()) {
            None => CompanyFilter::All,
            Some(label) if label.is_empty() || label == "all" => CompanyFilter::All,
            Some(label) => CompanyFilter::Company(label),
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        match self {
            CompanyFilter::All => true,
            CompanyFilter::Company(label) => product.company.to_lowercase() == *label,
        }
    }

    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        products.into_iter().filter(|p| self.matches(p)).collect()
    }
}
