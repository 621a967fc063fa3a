use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};

use crate::types::{Currency, DualPrice, OrderId, SerialNumber};

/// Number of fields every source line must carry.
pub const FIELD_COUNT: usize = 9;

/// The fields of a source line, in their fixed on-disk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    SerialNumber,
    Date,
    TrackingNumber,
    CompanyName,
    ItemName,
    Quantity,
    ItemPrice,
    ExportStatus,
    OrderId
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::SerialNumber,
        Field::Date,
        Field::TrackingNumber,
        Field::CompanyName,
        Field::ItemName,
        Field::Quantity,
        Field::ItemPrice,
        Field::ExportStatus,
        Field::OrderId
    ];

    /// Column name as written in the source file header.
    pub fn header_name(&self) -> &'static str {
        match self {
            Field::SerialNumber => "SN",
            Field::Date => "date",
            Field::TrackingNumber => "tracking_number",
            Field::CompanyName => "companyName",
            Field::ItemName => "itemName",
            Field::Quantity => "quantity",
            Field::ItemPrice => "itemPrice",
            Field::ExportStatus => "exportStatus",
            Field::OrderId => "orderId"
        }
    }

    pub fn header() -> [&'static str; FIELD_COUNT] {
        Field::ALL.map(|field| field.header_name())
    }
}

impl Display for Field {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.header_name())
    }
}

/// One source line split into its nine un-coerced fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub serial_number: String,
    pub date: String,
    pub tracking_number: String,
    pub company_name: String,
    pub item_name: String,
    pub quantity: String,
    pub item_price: String,
    pub export_status: String,
    pub order_id: String
}

impl RawRow {
    /// Builds a row from exactly [`FIELD_COUNT`] values in on-disk order.
    pub fn from_fields(fields: [String; FIELD_COUNT]) -> Self {
        let [serial_number, date, tracking_number, company_name, item_name, quantity, item_price, export_status, order_id] = fields;

        Self {
            serial_number,
            date,
            tracking_number,
            company_name,
            item_name,
            quantity,
            item_price,
            export_status,
            order_id
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::SerialNumber => &self.serial_number,
            Field::Date => &self.date,
            Field::TrackingNumber => &self.tracking_number,
            Field::CompanyName => &self.company_name,
            Field::ItemName => &self.item_name,
            Field::Quantity => &self.quantity,
            Field::ItemPrice => &self.item_price,
            Field::ExportStatus => &self.export_status,
            Field::OrderId => &self.order_id
        }
    }
}

/// A validated purchase, the unit of persisted data.
///
/// Built by the normalizer from one source line and never partially updated
/// afterwards; a correction is a re-import carrying the same `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseRecord {
    /// Line identifier from the source file. Not unique across files.
    pub serial_number: SerialNumber,
    pub date: NaiveDate,
    pub tracking_number: String,
    pub company_name: String,
    pub item_name: String,
    /// Always at least one.
    pub quantity: u32,
    /// Unit price in CNY together with its derived SGD value.
    #[serde(flatten)]
    pub price: DualPrice,
    pub export_status: String,
    /// Primary key of the dataset.
    pub order_id: OrderId
}

impl PurchaseRecord {
    pub fn total(&self, currency: Currency) -> rust_decimal::Decimal {
        self.price.total(self.quantity, currency)
    }
}
