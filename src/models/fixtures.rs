use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::PurchaseRecord;
use crate::types::CurrencyConverter;

/// Builds a valid record at the default exchange rate.
pub fn create_record(order_id: &str, date: &str, item_name: &str, quantity: u32, price: &str) -> Result<PurchaseRecord> {
    let price = CurrencyConverter::default()
        .convert(Decimal::from_str(price)?)
        .ok_or_else(|| anyhow!("Price [{price}] cannot be converted"))?;

    Ok(PurchaseRecord {
        serial_number: 1,
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d")?,
        tracking_number: format!("TRK-{order_id}"),
        company_name: "SF Express".to_string(),
        item_name: item_name.to_string(),
        quantity,
        price,
        export_status: "Delivered".to_string(),
        order_id: order_id.to_string()
    })
}
