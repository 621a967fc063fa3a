use super::{DatasetStore, MemoryStore, SqliteStore};
use crate::models::fixtures::create_record;
use crate::models::{PurchaseFilter, PurchaseRecord};
use crate::types::Currency;
use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::tempdir;

fn seed<S: DatasetStore>(store: &mut S) -> Result<()> {
    let records = vec![
        create_record("ORD001", "2025-06-27", "Blue Widget", 2, "100.00")?,
        create_record("ORD002", "2025-06-28", "Gadget", 1, "50.00")?,
        create_record("ORD003", "2025-06-28", "Widget Stand", 5, "12.50")?,
    ];

    assert_eq!(store.upsert_batch(&records)?, 3);

    Ok(())
}

fn assert_upsert_overwrites_by_order_id<S: DatasetStore>(mut store: S) -> Result<()> {
    seed(&mut store)?;

    let corrected = create_record("ORD001", "2025-06-27", "Blue Widget", 2, "120.00")?;
    store.upsert_batch(&[corrected])?;

    let record = store.get("ORD001")?.ok_or_else(|| anyhow!("ORD001 missing from store"))?;

    assert_eq!(store.count()?, 3);
    assert_eq!(record.price.cny().to_string(), "120.00");
    assert_eq!(record.price.sgd().to_string(), "23.54");

    Ok(())
}

fn assert_query_orders_newest_first<S: DatasetStore>(mut store: S) -> Result<()> {
    seed(&mut store)?;

    let order_ids: Vec<String> = store.query_all(&PurchaseFilter::default())?
        .into_iter()
        .map(|record| record.order_id)
        .collect();

    assert_eq!(order_ids, vec!["ORD002", "ORD003", "ORD001"]);

    Ok(())
}

fn assert_query_applies_every_filter<S: DatasetStore>(mut store: S) -> Result<()> {
    seed(&mut store)?;

    let by_name = PurchaseFilter { item_name: Some("widget".to_string()), ..Default::default() };
    let by_sgd_price = PurchaseFilter {
        price_min: Some(Decimal::from_str("9.81")?),
        price_max: Some(Decimal::from_str("19.615")?),
        currency: Currency::Sgd,
        ..Default::default()
    };
    let by_quantity = PurchaseFilter { min_quantity: Some(2), ..Default::default() };
    let by_date = PurchaseFilter { date_to: chrono::NaiveDate::from_ymd_opt(2025, 6, 27), ..Default::default() };

    assert_eq!(store.query_all(&by_name)?.len(), 2);
    assert_eq!(store.query_all(&by_sgd_price)?.iter().map(|r| r.order_id.as_str()).collect::<Vec<_>>(), vec!["ORD002"]);
    assert_eq!(store.query_all(&by_quantity)?.len(), 2);
    assert_eq!(store.query_all(&by_date)?.len(), 1);

    Ok(())
}

#[test]
fn test_memory_store_upsert_overwrites_by_order_id() -> Result<()> {
    assert_upsert_overwrites_by_order_id(MemoryStore::new())
}

#[test]
fn test_sqlite_store_upsert_overwrites_by_order_id() -> Result<()> {
    assert_upsert_overwrites_by_order_id(SqliteStore::open_in_memory()?)
}

#[test]
fn test_memory_store_query_orders_newest_first() -> Result<()> {
    assert_query_orders_newest_first(MemoryStore::new())
}

#[test]
fn test_sqlite_store_query_orders_newest_first() -> Result<()> {
    assert_query_orders_newest_first(SqliteStore::open_in_memory()?)
}

#[test]
fn test_memory_store_query_applies_every_filter() -> Result<()> {
    assert_query_applies_every_filter(MemoryStore::new())
}

#[test]
fn test_sqlite_store_query_applies_every_filter() -> Result<()> {
    assert_query_applies_every_filter(SqliteStore::open_in_memory()?)
}

#[test]
fn test_missing_order_id_is_none() -> Result<()> {
    assert!(MemoryStore::new().get("ORD404")?.is_none());
    assert!(SqliteStore::open_in_memory()?.get("ORD404")?.is_none());

    Ok(())
}

#[test]
fn test_sqlite_store_persists_across_reopen() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("nested").join("purchases.db");

    {
        let mut store = SqliteStore::open(&path)?;
        seed(&mut store)?;
    }

    let reopened = SqliteStore::open(&path)?;
    let record = reopened.get("ORD003")?.ok_or_else(|| anyhow!("ORD003 missing after reopen"))?;

    assert_eq!(reopened.count()?, 3);
    assert_eq!(record, create_record("ORD003", "2025-06-28", "Widget Stand", 5, "12.50")?);

    Ok(())
}

#[test]
fn test_sqlite_store_accepts_zero_serial_number() -> Result<()> {
    let mut store = SqliteStore::open_in_memory()?;
    let record = PurchaseRecord { serial_number: 0, ..create_record("ORD000", "2025-06-27", "Widget", 1, "10.00")? };

    assert_eq!(store.upsert_batch(std::slice::from_ref(&record))?, 1);
    assert_eq!(store.get("ORD000")?, Some(record));

    Ok(())
}
