pub mod login_queries;
pub mod product_queries;
pub mod sale_queries;
