use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{Field, PurchaseRecord, RawRow, Rejection, RowError};
use crate::types::{CurrencyConverter, SerialNumber, PRICE_DECIMAL_PLACES};

/// Turns raw fields into a validated [`PurchaseRecord`].
///
/// Checks run in a fixed order and the first failure decides the reason:
/// serial number, date, tracking number and company, quantity, price, order id.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    converter: CurrencyConverter
}

impl Normalizer {
    pub fn new(converter: CurrencyConverter) -> Self {
        Self { converter }
    }

    pub fn normalize(&self, row: RawRow) -> Result<PurchaseRecord, Rejection> {
        match self.build(&row) {
            Ok(record) => Ok(record),
            Err(reason) => Err(Rejection { row, reason })
        }
    }

    fn build(&self, row: &RawRow) -> Result<PurchaseRecord, RowError> {
        let serial_number = parse_serial_number(&row.serial_number)?;
        let date = parse_date(&row.date)?;
        let tracking_number = required(&row.tracking_number, Field::TrackingNumber)?;
        let company_name = required(&row.company_name, Field::CompanyName)?;
        let quantity = parse_quantity(&row.quantity)?;
        let item_price_cny = parse_price(&row.item_price)?;

        let price = self.converter.convert(item_price_cny)
            .ok_or_else(|| RowError::invalid_price(&row.item_price))?;

        let order_id = required(&row.order_id, Field::OrderId)?;

        Ok(PurchaseRecord {
            serial_number,
            date,
            tracking_number,
            company_name,
            item_name: row.item_name.trim().to_string(),
            quantity,
            price,
            export_status: row.export_status.trim().to_string(),
            order_id
        })
    }
}

fn parse_serial_number(value: &str) -> Result<SerialNumber, RowError> {
    let value = value.trim();

    if !is_unsigned_integer(value) {
        return Err(RowError::invalid_serial_number(value));
    }

    value.parse::<SerialNumber>().map_err(|_| RowError::invalid_serial_number(value))
}

fn parse_date(value: &str) -> Result<NaiveDate, RowError> {
    let value = value.trim();
    let bytes = value.as_bytes();

    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(index, byte)| match index {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit()
        });

    if !well_formed {
        return Err(RowError::invalid_date(value));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| RowError::invalid_date(value))
}

fn required(value: &str, field: Field) -> Result<String, RowError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(RowError::missing_field(field));
    }

    Ok(value.to_string())
}

fn parse_quantity(value: &str) -> Result<u32, RowError> {
    let value = value.trim();

    match value.parse::<i64>() {
        Ok(quantity) if quantity >= 1 => u32::try_from(quantity).map_err(|_| RowError::invalid_quantity(value)),
        _ => Err(RowError::invalid_quantity(value))
    }
}

fn parse_price(value: &str) -> Result<Decimal, RowError> {
    let value = value.trim();
    let digits = value.strip_prefix('+').unwrap_or(value);

    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (digits, "")
    };

    if !is_unsigned_integer(integer) || !fraction.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(RowError::invalid_price(value));
    }

    //NOTE: Counted on the text, Decimal parsing rounds fractions past its precision
    let fraction = fraction.trim_end_matches('0');

    if fraction.len() > PRICE_DECIMAL_PLACES as usize {
        return Err(RowError::invalid_price(value));
    }

    let canonical = if fraction.is_empty() { integer.to_string() } else { format!("{integer}.{fraction}") };

    Decimal::from_str(&canonical).map_err(|_| RowError::invalid_price(value))
}

fn is_unsigned_integer(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|byte| byte.is_ascii_digit())
}
