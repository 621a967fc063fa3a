use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::{PurchaseFilter, PurchaseRecord};
use crate::storage::{DatasetStore, StoreError};
use crate::types::{Currency, CurrencyConverter, PRICE_DECIMAL_PLACES};

const CREATE_PURCHASES_SQL: &str = r"
CREATE TABLE IF NOT EXISTS purchases (
  order_id TEXT PRIMARY KEY,
  serial_number INTEGER NOT NULL CHECK (serial_number >= 0),
  date TEXT NOT NULL,
  tracking_number TEXT NOT NULL,
  company_name TEXT NOT NULL,
  item_name TEXT NOT NULL,
  quantity INTEGER NOT NULL CHECK (quantity >= 1),
  item_price_cny_cents INTEGER NOT NULL CHECK (item_price_cny_cents >= 0),
  item_price_sgd_cents INTEGER NOT NULL CHECK (item_price_sgd_cents >= 0),
  exchange_rate TEXT NOT NULL,
  export_status TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_purchases_date ON purchases(date);
";

const UPSERT_PURCHASE_SQL: &str = r"
INSERT INTO purchases (
  order_id, serial_number, date, tracking_number, company_name, item_name,
  quantity, item_price_cny_cents, item_price_sgd_cents, exchange_rate, export_status
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
ON CONFLICT(order_id) DO UPDATE SET
  serial_number = excluded.serial_number,
  date = excluded.date,
  tracking_number = excluded.tracking_number,
  company_name = excluded.company_name,
  item_name = excluded.item_name,
  quantity = excluded.quantity,
  item_price_cny_cents = excluded.item_price_cny_cents,
  item_price_sgd_cents = excluded.item_price_sgd_cents,
  exchange_rate = excluded.exchange_rate,
  export_status = excluded.export_status
";

const SELECT_PURCHASE_COLUMNS: &str = "order_id, serial_number, date, tracking_number, company_name, \
    item_name, quantity, item_price_cny_cents, exchange_rate, export_status";

/// Persistent dataset store backed by a single SQLite file.
///
/// Prices are stored as integer minor units so range filters compare exactly.
/// The SGD column only serves filtering; loaded records re-derive it from the
/// CNY price and the stored rate.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection
}

impl SqliteStore {
    /// Opens (creating if needed) the store at `path`, including its parent directory.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Open {
                path: path.display().to_string(),
                source
            })?;
        }

        let store = Self::initialize(Connection::open(path)?)?;
        info!("Dataset store ready at {}", path.display());

        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::initialize(Connection::open_in_memory()?)
    }

    fn initialize(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(CREATE_PURCHASES_SQL)?;

        Ok(Self { conn })
    }
}

impl DatasetStore for SqliteStore {
    fn upsert_batch(&mut self, records: &[PurchaseRecord]) -> Result<usize, StoreError> {
        let transaction = self.conn.transaction()?;
        let mut written = 0;

        {
            let mut statement = transaction.prepare_cached(UPSERT_PURCHASE_SQL)?;

            for record in records {
                written += statement.execute(params![
                    record.order_id,
                    record.serial_number,
                    record.date.to_string(),
                    record.tracking_number,
                    record.company_name,
                    record.item_name,
                    record.quantity,
                    record.price.cents(Currency::Cny),
                    record.price.cents(Currency::Sgd),
                    record.price.rate().to_string(),
                    record.export_status
                ])?;
            }
        }

        transaction.commit()?;
        debug!("Committed batch of {written} purchases");

        Ok(written)
    }

    fn query_all(&self, filter: &PurchaseFilter) -> Result<Vec<PurchaseRecord>, StoreError> {
        let (clauses, values) = where_clauses(filter);
        let mut sql = format!("SELECT {SELECT_PURCHASE_COLUMNS} FROM purchases");

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        sql.push_str(" ORDER BY date DESC, order_id ASC");

        let mut statement = self.conn.prepare(&sql)?;
        let rows = statement.query_map(params_from_iter(values), StoredRow::from_row)?;

        rows.map(|row| row.map_err(StoreError::from).and_then(StoredRow::into_record))
            .collect()
    }

    fn get(&self, order_id: &str) -> Result<Option<PurchaseRecord>, StoreError> {
        let sql = format!("SELECT {SELECT_PURCHASE_COLUMNS} FROM purchases WHERE order_id = ?1");

        self.conn.query_row(&sql, params![order_id], StoredRow::from_row)
            .optional()?
            .map(StoredRow::into_record)
            .transpose()
    }

    fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM purchases", [], |row| row.get(0))?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn where_clauses(filter: &PurchaseFilter) -> (Vec<String>, Vec<Value>) {
    let mut clauses = Vec::new();
    let mut values = Vec::new();

    if let Some(from) = filter.date_from {
        clauses.push("date >= ?".to_string());
        values.push(Value::Text(from.to_string()));
    }

    if let Some(to) = filter.date_to {
        clauses.push("date <= ?".to_string());
        values.push(Value::Text(to.to_string()));
    }

    let price_column = match filter.currency {
        Currency::Cny => "item_price_cny_cents",
        Currency::Sgd => "item_price_sgd_cents"
    };

    if let Some(min) = filter.price_min {
        clauses.push(format!("{price_column} >= ?"));
        values.push(Value::Integer(to_bound_cents(min, Decimal::ceil)));
    }

    if let Some(max) = filter.price_max {
        clauses.push(format!("{price_column} <= ?"));
        values.push(Value::Integer(to_bound_cents(max, Decimal::floor)));
    }

    if let Some(min_quantity) = filter.min_quantity {
        clauses.push("quantity >= ?".to_string());
        values.push(Value::Integer(i64::from(min_quantity)));
    }

    if let Some(needle) = filter.item_name_needle() {
        clauses.push("instr(lower(item_name), ?) > 0".to_string());
        values.push(Value::Text(needle));
    }

    (clauses, values)
}

/// Minor units for a price bound; integer cents compare against the rounded bound exactly.
fn to_bound_cents(bound: Decimal, round: fn(&Decimal) -> Decimal) -> i64 {
    bound.checked_mul(Decimal::ONE_HUNDRED)
        .map(|cents| round(&cents))
        .and_then(|cents| cents.to_i64())
        .unwrap_or(if bound.is_sign_negative() { i64::MIN } else { i64::MAX })
}

struct StoredRow {
    order_id: String,
    serial_number: i64,
    date: String,
    tracking_number: String,
    company_name: String,
    item_name: String,
    quantity: i64,
    item_price_cny_cents: i64,
    exchange_rate: String,
    export_status: String
}

impl StoredRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            order_id: row.get(0)?,
            serial_number: row.get(1)?,
            date: row.get(2)?,
            tracking_number: row.get(3)?,
            company_name: row.get(4)?,
            item_name: row.get(5)?,
            quantity: row.get(6)?,
            item_price_cny_cents: row.get(7)?,
            exchange_rate: row.get(8)?,
            export_status: row.get(9)?
        })
    }

    fn into_record(self) -> Result<PurchaseRecord, StoreError> {
        let order_id = self.order_id;

        let serial_number = u32::try_from(self.serial_number)
            .map_err(|error| StoreError::corrupt(&order_id, format!("serial number: {error}")))?;
        let quantity = u32::try_from(self.quantity)
            .map_err(|error| StoreError::corrupt(&order_id, format!("quantity: {error}")))?;
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|error| StoreError::corrupt(&order_id, format!("date: {error}")))?;
        let rate = Decimal::from_str(&self.exchange_rate)
            .map_err(|error| StoreError::corrupt(&order_id, format!("exchange rate: {error}")))?;
        let converter = CurrencyConverter::new(rate)
            .map_err(|error| StoreError::corrupt(&order_id, error.to_string()))?;
        let price = converter.convert(Decimal::new(self.item_price_cny_cents, PRICE_DECIMAL_PLACES))
            .ok_or_else(|| StoreError::corrupt(&order_id, "price out of range"))?;

        Ok(PurchaseRecord {
            serial_number,
            date,
            tracking_number: self.tracking_number,
            company_name: self.company_name,
            item_name: self.item_name,
            quantity,
            price,
            export_status: self.export_status,
            order_id
        })
    }
}
