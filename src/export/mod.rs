
use std::io::Write;

use csv::{QuoteStyle, WriterBuilder};
use thiserror::Error;

use crate::import::FIELD_DELIMITER;
use crate::models::{Field, PurchaseFilter, PurchaseRecord};
use crate::storage::{DatasetStore, StoreError};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Export write failed: {0}")]
    Csv(#[from] csv::Error)
}

/// Writes every record matching `filter` in the source file shape.
/// Returns the number of records written.
pub fn export_filtered<S: DatasetStore, W: Write>(store: &S, filter: &PurchaseFilter, writer: W) -> Result<usize, ExportError> {
    let records = store.query_all(filter)?;

    write_purchases(&records, writer)?;

    Ok(records.len())
}

/// Writes a header line followed by one pipe-delimited line per record.
///
/// Fields that contain the delimiter are quoted so the output imports back
/// unchanged.
pub fn write_purchases<W: Write>(records: &[PurchaseRecord], writer: W) -> Result<(), csv::Error> {
    let mut writer = WriterBuilder::new()
        .delimiter(FIELD_DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .has_headers(false)
        .from_writer(writer);

    writer.write_record(Field::header())?;

    for record in records {
        writer.write_record([
            record.serial_number.to_string(),
            record.date.to_string(),
            record.tracking_number.clone(),
            record.company_name.clone(),
            record.item_name.clone(),
            record.quantity.to_string(),
            record.price.cny().to_string(),
            record.export_status.clone(),
            record.order_id.clone()
        ])?;
    }

    writer.flush()?;

    Ok(())
}
