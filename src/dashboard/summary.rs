use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::PurchaseRecord;
use crate::types::{Currency, PRICE_DECIMAL_PLACES};

/// Headline figures over a set of purchases, in one display currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub currency: Currency,
    pub total_purchases: usize,
    pub total_items: u64,
    /// Sum of unit price times quantity.
    pub total_amount: Decimal,
    /// Mean unit price, rounded to two places. `None` without purchases.
    pub average_price: Option<Decimal>,
    pub earliest_date: Option<NaiveDate>,
    pub latest_date: Option<NaiveDate>,
    /// Item with the highest line total.
    pub most_expensive_item: Option<String>
}

impl SummaryStats {
    pub fn compute(records: &[PurchaseRecord], currency: Currency) -> Self {
        let total_amount = records.iter()
            .fold(Decimal::ZERO, |total, record| total.saturating_add(record.total(currency)));

        let unit_prices = records.iter()
            .fold(Decimal::ZERO, |total, record| total.saturating_add(record.price.in_currency(currency)));

        let average_price = (!records.is_empty()).then(|| {
            (unit_prices / Decimal::from(records.len())).round_dp(PRICE_DECIMAL_PLACES)
        });

        let most_expensive_item = records.iter()
            .max_by_key(|record| record.total(currency))
            .map(|record| record.item_name.clone());

        Self {
            currency,
            total_purchases: records.len(),
            total_items: records.iter().map(|record| u64::from(record.quantity)).sum(),
            total_amount,
            average_price,
            earliest_date: records.iter().map(|record| record.date).min(),
            latest_date: records.iter().map(|record| record.date).max(),
            most_expensive_item
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub purchases: usize
}

/// Line totals per day, oldest first.
pub fn daily_totals(records: &[PurchaseRecord], currency: Currency) -> Vec<DailyTotal> {
    let mut days: BTreeMap<NaiveDate, (Decimal, usize)> = BTreeMap::new();

    for record in records {
        let (amount, purchases) = days.entry(record.date).or_insert((Decimal::ZERO, 0));
        *amount = amount.saturating_add(record.total(currency));
        *purchases += 1;
    }

    days.into_iter()
        .map(|(date, (amount, purchases))| DailyTotal { date, amount, purchases })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemValue {
    pub item_name: String,
    pub order_id: String,
    pub amount: Decimal
}

/// The `limit` purchases with the highest line totals, highest first.
pub fn top_items(records: &[PurchaseRecord], currency: Currency, limit: usize) -> Vec<ItemValue> {
    let mut items: Vec<ItemValue> = records.iter()
        .map(|record| ItemValue {
            item_name: record.item_name.clone(),
            order_id: record.order_id.clone(),
            amount: record.total(currency)
        })
        .collect();

    items.sort_by(|left, right| right.amount.cmp(&left.amount).then_with(|| left.order_id.cmp(&right.order_id)));
    items.truncate(limit);

    items
}
