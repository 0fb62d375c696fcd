use crate::{
    error::{AppError, Result},
    models::{COMPANIES, CreateProductRequest, NewProduct, ProductChanges, canonical_company},
};

pub fn validate_new_product(req: &CreateProductRequest) -> Result<NewProduct> {
    let name = required("name", &req.name)?;
    let product_no = required("product_no", &req.product_no)?;
    let description = required("description", &req.description)?;
    let company = company(&req.company)?;

    let total = req
        .total_in_store
        .ok_or_else(|| AppError::BadRequest("total_in_store is required".to_string()))?;

    if total < 0 {
        return Err(AppError::BadRequest(
            "Total in store cannot be negative.".to_string(),
        ));
    }

    let total_in_store = i32::try_from(total)
        .map_err(|_| AppError::BadRequest("total_in_store is too large".to_string()))?;

    Ok(NewProduct {
        name,
        product_no,
        description,
        company,
        total_in_store,
    })
}

pub fn validate_changes(changes: &ProductChanges) -> Result<ProductChanges> {
    Ok(ProductChanges {
        name: required("name", &changes.name)?,
        product_no: required("product_no", &changes.product_no)?,
        description: required("description", &changes.description)?,
        company: company(&changes.company)?,
    })
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn company(value: &str) -> Result<String> {
    required("company", value)?;
    canonical_company(value)
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "company must be one of: {}",
                COMPANIES.join(", ")
            ))
        })
}
