mod render;
mod summary;
#[cfg(test)]
mod tests;

use crate::models::{PurchaseFilter, PurchaseRecord};
use crate::storage::{DatasetStore, StoreError};
use crate::types::Currency;

pub use summary::{daily_totals, top_items, DailyTotal, ItemValue, SummaryStats};

pub const DEFAULT_RECENT: usize = 20;
pub const DEFAULT_TOP: usize = 10;

/// Read-only text view over the dataset.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard {
    currency: Currency,
    recent: usize,
    top: usize
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(Currency::default(), DEFAULT_RECENT, DEFAULT_TOP)
    }
}

impl Dashboard {
    pub fn new(currency: Currency, recent: usize, top: usize) -> Self {
        Self { currency, recent, top }
    }

    pub fn render<S: DatasetStore>(&self, store: &S, filter: &PurchaseFilter) -> Result<String, StoreError> {
        let total = store.count()?;
        let records = store.query_all(filter)?;

        Ok(self.render_records(&records, total))
    }

    /// `records` are the filtered purchases, newest first. `total` is the size
    /// of the whole dataset.
    pub fn render_records(&self, records: &[PurchaseRecord], total: usize) -> String {
        if total == 0 {
            return "No purchase data found. Import an order export first: purchase-tracker import <path>\n".to_string();
        }

        let mut sections = vec![
            format!("Purchase Tracker Dashboard ({})", self.currency),
            format!("Showing {} of {} purchases", records.len(), total)
        ];

        if records.is_empty() {
            sections.push("No purchases match the current filters.".to_string());
            return sections.join("\n") + "\n";
        }

        sections.push(format!("\nSummary\n{}", render::summary_table(&SummaryStats::compute(records, self.currency))));
        sections.push(format!("\nDaily Spend\n{}", render::daily_chart(&daily_totals(records, self.currency), self.currency)));

        if self.top > 0 {
            let items = top_items(records, self.currency, self.top);
            sections.push(format!("\nTop {} Items by Total\n{}", items.len(), render::top_items_table(&items, self.currency)));
        }

        if self.recent > 0 {
            let shown = self.recent.min(records.len());
            sections.push(format!("\nRecent Purchases ({shown})\n{}", render::recent_table(records, self.currency, self.recent)));
        }

        sections.join("\n") + "\n"
    }
}
