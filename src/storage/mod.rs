mod errors;
mod memory_store;
mod sqlite_store;
#[cfg(test)]
mod tests;

use crate::models::{PurchaseFilter, PurchaseRecord};

pub use errors::StoreError;
pub use memory_store::MemoryStore;
pub use sqlite_store::SqliteStore;

/// The dataset of imported purchases, keyed by order id.
pub trait DatasetStore {
    /// Inserts or replaces every record by `order_id` as one unit of work.
    /// Returns the number of rows written.
    fn upsert_batch(&mut self, records: &[PurchaseRecord]) -> Result<usize, StoreError>;

    /// Records matching `filter`, newest date first, then by order id.
    fn query_all(&self, filter: &PurchaseFilter) -> Result<Vec<PurchaseRecord>, StoreError>;

    fn get(&self, order_id: &str) -> Result<Option<PurchaseRecord>, StoreError>;

    fn count(&self) -> Result<usize, StoreError>;
}

/// Ordering shared by every store implementation.
pub(crate) fn sort_newest_first(records: &mut [PurchaseRecord]) {
    records.sort_by(|left, right| {
        right.date.cmp(&left.date).then_with(|| left.order_id.cmp(&right.order_id))
    });
}
