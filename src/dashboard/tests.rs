use super::render::money;
use super::{daily_totals, top_items, Dashboard, SummaryStats};
use crate::models::fixtures::create_record;
use crate::models::{PurchaseFilter, PurchaseRecord};
use crate::storage::{DatasetStore, MemoryStore};
use crate::types::Currency;
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

fn sample_records() -> Result<Vec<PurchaseRecord>> {
    Ok(vec![
        create_record("ORD002", "2025-06-28", "Gadget", 1, "50.00")?,
        create_record("ORD003", "2025-06-28", "Widget Stand", 5, "12.50")?,
        create_record("ORD001", "2025-06-27", "Blue Widget", 2, "100.00")?,
    ])
}

#[test]
fn test_summary_stats_in_cny() -> Result<()> {
    let stats = SummaryStats::compute(&sample_records()?, Currency::Cny);

    assert_eq!(stats.total_purchases, 3);
    assert_eq!(stats.total_items, 8);
    assert_eq!(stats.total_amount, Decimal::from_str("312.50")?);
    assert_eq!(stats.average_price, Some(Decimal::from_str("54.17")?));
    assert_eq!(stats.earliest_date, NaiveDate::from_ymd_opt(2025, 6, 27));
    assert_eq!(stats.latest_date, NaiveDate::from_ymd_opt(2025, 6, 28));
    assert_eq!(stats.most_expensive_item.as_deref(), Some("Blue Widget"));

    Ok(())
}

#[test]
fn test_summary_stats_in_sgd_use_converted_prices() -> Result<()> {
    let stats = SummaryStats::compute(&sample_records()?, Currency::Sgd);

    // 2 x 19.62 + 9.81 + 5 x 2.45
    assert_eq!(stats.total_amount, Decimal::from_str("61.30")?);
    assert_eq!(stats.currency, Currency::Sgd);

    Ok(())
}

#[test]
fn test_summary_stats_empty() {
    let stats = SummaryStats::compute(&[], Currency::Cny);

    assert_eq!(stats.total_purchases, 0);
    assert_eq!(stats.total_amount, Decimal::ZERO);
    assert_eq!(stats.average_price, None);
    assert_eq!(stats.earliest_date, None);
    assert_eq!(stats.most_expensive_item, None);
}

#[test]
fn test_daily_totals_oldest_first() -> Result<()> {
    let totals = daily_totals(&sample_records()?, Currency::Cny);

    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0].date, NaiveDate::from_ymd_opt(2025, 6, 27).unwrap_or_default());
    assert_eq!(totals[0].amount, Decimal::from(200));
    assert_eq!(totals[0].purchases, 1);
    assert_eq!(totals[1].amount, Decimal::from_str("112.50")?);
    assert_eq!(totals[1].purchases, 2);

    Ok(())
}

#[test]
fn test_top_items_by_line_total() -> Result<()> {
    let items = top_items(&sample_records()?, Currency::Cny, 2);
    let order_ids: Vec<&str> = items.iter().map(|item| item.order_id.as_str()).collect();

    assert_eq!(order_ids, vec!["ORD001", "ORD003"]);
    assert_eq!(items[1].amount, Decimal::from_str("62.50")?);

    Ok(())
}

#[test]
fn test_money_formats_two_places_with_symbol() -> Result<()> {
    assert_eq!(money(Decimal::from(5), Currency::Cny), "¥5.00");
    assert_eq!(money(Decimal::from_str("19.62")?, Currency::Sgd), "S$19.62");

    Ok(())
}

#[test]
fn test_render_empty_dataset() -> Result<()> {
    let output = Dashboard::default().render(&MemoryStore::new(), &PurchaseFilter::default())?;

    assert!(output.starts_with("No purchase data found"));

    Ok(())
}

#[test]
fn test_render_shows_sections_and_counts() -> Result<()> {
    let mut store = MemoryStore::new();
    store.upsert_batch(&sample_records()?)?;

    let output = Dashboard::new(Currency::Sgd, 2, 3).render(&store, &PurchaseFilter::default())?;

    assert!(output.contains("Purchase Tracker Dashboard (SGD)"));
    assert!(output.contains("Showing 3 of 3 purchases"));
    assert!(output.contains("Daily Spend"));
    assert!(output.contains("Top 3 Items by Total"));
    assert!(output.contains("Recent Purchases (2)"));
    assert!(output.contains("S$61.30"));

    Ok(())
}

#[test]
fn test_render_reports_filtered_count() -> Result<()> {
    let mut store = MemoryStore::new();
    store.upsert_batch(&sample_records()?)?;

    let filter = PurchaseFilter { item_name: Some("WIDGET".to_string()), ..Default::default() };
    let output = Dashboard::default().render(&store, &filter)?;

    assert!(output.contains("Showing 2 of 3 purchases"));
    assert!(!output.contains("Gadget"));

    let filter = PurchaseFilter { min_quantity: Some(50), ..Default::default() };
    let output = Dashboard::default().render(&store, &filter)?;

    assert!(output.contains("Showing 0 of 3 purchases"));
    assert!(output.contains("No purchases match the current filters."));

    Ok(())
}
