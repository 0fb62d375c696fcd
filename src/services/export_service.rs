use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Value};

use crate::{
    error::{AppError, Result},
    models::Sale,
};

pub const SALES_XLSX_FILE: &str = "sales.xlsx";
pub const SALES_PDF_FILE: &str = "sales.pdf";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

pub const SALES_PDF_COLUMNS: [&str; 9] = [
    "S.No",
    "Name",
    "Mob",
    "Location",
    "Description",
    "Color",
    "Qty",
    "Type",
    "Added By",
];

const MISSING_USER: &str = "—";

// A4 landscape, in millimetres.
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 14.0;
const ROW_HEIGHT: f32 = 5.0;
const FONT_SIZE: f32 = 8.0;
const COLUMN_WIDTHS: [f32; 9] = [12.0, 35.0, 26.0, 30.0, 70.0, 25.0, 14.0, 18.0, 39.0];
// Rough width of one Helvetica character at 8pt.
const CHAR_WIDTH: f32 = 1.6;

/// Each sale as an ordered record without its `id`, in field declaration order.
pub fn sale_records(sales: &[Sale]) -> Result<Vec<Map<String, Value>>> {
    sales
        .iter()
        .map(|sale| {
            let value = serde_json::to_value(sale)
                .map_err(|e| AppError::InternalError(format!("Failed to serialize sale: {}", e)))?;
            let Value::Object(fields) = value else {
                return Err(AppError::InternalError(
                    "Sale did not serialize to an object".to_string(),
                ));
            };
            Ok(fields.into_iter().filter(|(key, _)| key != "id").collect())
        })
        .collect()
}

pub fn sales_workbook(sales: &[Sale]) -> Result<Vec<u8>> {
    let records = sale_records(sales)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sales").map_err(xlsx_error)?;

    if let Some(first) = records.first() {
        let columns: Vec<&String> = first.keys().collect();

        for (col, name) in columns.iter().enumerate() {
            sheet
                .write_string(0, col as u16, name.as_str())
                .map_err(xlsx_error)?;
        }

        for (idx, record) in records.iter().enumerate() {
            let row = (idx + 1) as u32;
            for (col, name) in columns.iter().enumerate() {
                let col = col as u16;
                match record.get(name.as_str()) {
                    None | Some(Value::Null) => {}
                    Some(Value::String(s)) => {
                        sheet.write_string(row, col, s.as_str()).map_err(xlsx_error)?;
                    }
                    Some(Value::Number(n)) => {
                        sheet
                            .write_number(row, col, n.as_f64().unwrap_or_default())
                            .map_err(xlsx_error)?;
                    }
                    Some(Value::Bool(b)) => {
                        sheet.write_boolean(row, col, *b).map_err(xlsx_error)?;
                    }
                    Some(other) => {
                        sheet
                            .write_string(row, col, other.to_string())
                            .map_err(xlsx_error)?;
                    }
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(xlsx_error)
}

pub fn sales_document_rows(sales: &[Sale]) -> Vec<[String; 9]> {
    sales
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            [
                (idx + 1).to_string(),
                s.name.clone(),
                s.mob.clone(),
                s.location.clone(),
                s.description.clone(),
                s.color.clone(),
                s.quantity.to_string(),
                s.kind.as_str().to_string(),
                s.created_by
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .unwrap_or(MISSING_USER)
                    .to_string(),
            ]
        })
        .collect()
}

/// Document export: landscape A4 table, repeating the header on each page.
pub fn sales_document(sales: &[Sale]) -> Result<Vec<u8>> {
    let rows = sales_document_rows(sales);

    let (doc, page, layer) =
        PdfDocument::new("Sales", Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Sales");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let header = SALES_PDF_COLUMNS.map(str::to_string);
    let top = PAGE_HEIGHT - MARGIN;

    let mut current = doc.get_page(page).get_layer(layer);
    draw_row(&current, &bold, &header, top);
    let mut y = top - ROW_HEIGHT;

    for row in &rows {
        if y < MARGIN {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Sales");
            current = doc.get_page(page).get_layer(layer);
            draw_row(&current, &bold, &header, top);
            y = top - ROW_HEIGHT;
        }
        draw_row(&current, &font, row, y);
        y -= ROW_HEIGHT;
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn draw_row(layer: &PdfLayerReference, font: &IndirectFontRef, cells: &[String; 9], y: f32) {
    let mut x = MARGIN;
    for (text, width) in cells.iter().zip(COLUMN_WIDTHS) {
        layer.use_text(fit(text, width), FONT_SIZE, Mm(x + 1.0), Mm(y), font);
        x += width;
    }
}

fn fit(text: &str, width: f32) -> String {
    let max_chars = ((width - 2.0) / CHAR_WIDTH).max(1.0) as usize;
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    clipped.push_str("...");
    clipped
}

fn xlsx_error(e: rust_xlsxwriter::XlsxError) -> AppError {
    AppError::InternalError(format!("Spreadsheet export failed: {}", e))
}

fn pdf_error(e: printpdf::Error) -> AppError {
    AppError::InternalError(format!("Document export failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SaleType;
    use chrono::Utc;
    use uuid::Uuid;

    fn sale(created_by: Option<&str>) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            name: "Tracklight".to_string(),
            customer_name: "Asha".to_string(),
            mob: "9876543210".to_string(),
            location: "Pune".to_string(),
            description: "45W".to_string(),
            color: "white".to_string(),
            quantity: 3,
            kind: SaleType::Sold,
            created_by: created_by.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn records_drop_id_and_keep_field_order() {
        let records = sale_records(&[sale(Some("ravi"))]).unwrap();
        let keys: Vec<&str> = records[0].keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec![
                "product_id",
                "name",
                "customer_name",
                "mob",
                "location",
                "description",
                "color",
                "quantity",
                "type",
                "created_by",
                "created_at",
            ]
        );
        assert_eq!(records[0]["type"], Value::String("sold".into()));
    }

    #[test]
    fn document_rows_are_numbered_with_user_fallback() {
        let rows = sales_document_rows(&[sale(Some("ravi")), sale(None), sale(Some(""))]);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "1");
        assert_eq!(rows[2][0], "3");
        assert_eq!(rows[0][6], "3");
        assert_eq!(rows[0][7], "sold");
        assert_eq!(rows[0][8], "ravi");
        assert_eq!(rows[1][8], "—");
        assert_eq!(rows[2][8], "—");
    }

    #[test]
    fn long_cells_are_clipped() {
        assert_eq!(fit("Pune", 30.0), "Pune");
        let clipped = fit(&"x".repeat(100), 12.0);
        assert!(clipped.ends_with("..."));
        assert!(clipped.chars().count() <= 6);
    }

    #[test]
    fn workbook_is_a_zip_container() {
        let bytes = sales_workbook(&[sale(Some("ravi"))]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn document_spans_pages_for_long_lists() {
        let sales: Vec<Sale> = (0..120).map(|_| sale(Some("ravi"))).collect();
        let bytes = sales_document(&sales).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
