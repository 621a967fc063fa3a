use std::ops::Range;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tabled::builder::Builder;
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Style};
use tabled::Table;

use crate::dashboard::{DailyTotal, ItemValue, SummaryStats};
use crate::models::PurchaseRecord;
use crate::types::Currency;

const BAR_WIDTH: usize = 40;
const ITEM_NAME_WIDTH: usize = 30;

pub fn summary_table(stats: &SummaryStats) -> String {
    let currency = stats.currency;
    let date_range = match (stats.earliest_date, stats.latest_date) {
        (Some(earliest), Some(latest)) => format!("{earliest} to {latest}"),
        _ => "-".to_string()
    };

    let mut builder = Builder::default();
    builder.push_record(["Metric", "Value"]);
    builder.push_record(["Date Range".to_string(), date_range]);
    builder.push_record(["Total Purchases".to_string(), stats.total_purchases.to_string()]);
    builder.push_record([format!("Total Amount ({currency})"), money(stats.total_amount, currency)]);
    builder.push_record([
        format!("Average Price ({currency})"),
        money(stats.average_price.unwrap_or_default(), currency)
    ]);
    builder.push_record(["Total Items".to_string(), stats.total_items.to_string()]);
    builder.push_record([
        "Most Expensive Item".to_string(),
        stats.most_expensive_item.as_deref().map(truncate).unwrap_or_else(|| "-".to_string())
    ]);

    styled(builder.build(), 1..2)
}

/// Horizontal bar chart of the amount spent per day.
pub fn daily_chart(totals: &[DailyTotal], currency: Currency) -> String {
    let peak = totals.iter().map(|day| day.amount).max().unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(["Date", "Purchases", "Amount", ""]);

    for day in totals {
        builder.push_record([
            day.date.to_string(),
            day.purchases.to_string(),
            money(day.amount, currency),
            bar(day.amount, peak)
        ]);
    }

    styled(builder.build(), 1..3)
}

pub fn top_items_table(items: &[ItemValue], currency: Currency) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "#".to_string(),
        "Item Name".to_string(),
        "Order ID".to_string(),
        format!("Total ({currency})")
    ]);

    for (rank, item) in items.iter().enumerate() {
        builder.push_record([
            (rank + 1).to_string(),
            truncate(&item.item_name),
            item.order_id.clone(),
            money(item.amount, currency)
        ]);
    }

    styled(builder.build(), 3..4)
}

pub fn recent_table(records: &[PurchaseRecord], currency: Currency, limit: usize) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Date".to_string(),
        "Item Name".to_string(),
        "Qty".to_string(),
        format!("Unit Price ({currency})"),
        format!("Total ({currency})"),
        "Status".to_string(),
        "Order ID".to_string()
    ]);

    for record in records.iter().take(limit) {
        builder.push_record([
            record.date.to_string(),
            truncate(&record.item_name),
            record.quantity.to_string(),
            money(record.price.in_currency(currency), currency),
            money(record.total(currency), currency),
            record.export_status.clone(),
            record.order_id.clone()
        ]);
    }

    styled(builder.build(), 2..5)
}

pub fn money(amount: Decimal, currency: Currency) -> String {
    format!("{}{:.2}", currency.symbol(), amount)
}

fn styled(mut table: Table, numeric_columns: Range<usize>) -> String {
    table.with(Style::rounded());
    table.modify(Columns::new(numeric_columns), Alignment::right());
    table.modify(Rows::first(), Color::BOLD);
    table.to_string()
}

fn bar(amount: Decimal, peak: Decimal) -> String {
    if peak <= Decimal::ZERO {
        return String::new();
    }

    let width = (amount / peak * Decimal::from(BAR_WIDTH))
        .round()
        .to_usize()
        .unwrap_or_default();

    "█".repeat(width.max(usize::from(!amount.is_zero())))
}

fn truncate(name: &str) -> String {
    if name.chars().count() <= ITEM_NAME_WIDTH {
        return name.to_string();
    }

    let mut shortened: String = name.chars().take(ITEM_NAME_WIDTH).collect();
    shortened.push_str("...");
    shortened
}
