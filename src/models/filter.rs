use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::PurchaseRecord;
use crate::types::Currency;

/// Read-side filter shared by the dashboard, the export and the HTTP API.
///
/// Every bound is inclusive. The price bounds apply to the unit price in
/// `currency`. Item name matching is a substring match that ignores ASCII case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PurchaseFilter {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub currency: Currency,
    #[serde(alias = "search")]
    pub item_name: Option<String>,
    pub min_quantity: Option<u32>
}

impl PurchaseFilter {
    /// The item name needle, or `None` when it is absent or blank.
    pub fn item_name_needle(&self) -> Option<String> {
        self.item_name.as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .map(str::to_ascii_lowercase)
    }

    pub fn matches(&self, record: &PurchaseRecord) -> bool {
        if self.date_from.is_some_and(|from| record.date < from) {
            return false;
        }

        if self.date_to.is_some_and(|to| record.date > to) {
            return false;
        }

        let price = record.price.in_currency(self.currency);

        if self.price_min.is_some_and(|min| price < min) {
            return false;
        }

        if self.price_max.is_some_and(|max| price > max) {
            return false;
        }

        if self.min_quantity.is_some_and(|min| record.quantity < min) {
            return false;
        }

        match self.item_name_needle() {
            Some(needle) => record.item_name.to_ascii_lowercase().contains(&needle),
            None => true
        }
    }
}
