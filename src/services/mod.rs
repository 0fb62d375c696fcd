pub mod catalog;
pub mod export_service;
pub mod import_service;
pub mod import_staging;
pub mod product_validation;
pub mod sale_recorder;
