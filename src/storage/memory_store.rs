use crate::models::{PurchaseFilter, PurchaseRecord};
use crate::storage::{sort_newest_first, DatasetStore, StoreError};
use crate::types::OrderId;
use dashmap::DashMap;

/// Volatile store used for dry-run imports.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<OrderId, PurchaseRecord>
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new()
        }
    }
}

impl DatasetStore for MemoryStore {
    fn upsert_batch(&mut self, records: &[PurchaseRecord]) -> Result<usize, StoreError> {
        for record in records {
            self.records.insert(record.order_id.clone(), record.clone());
        }

        Ok(records.len())
    }

    fn query_all(&self, filter: &PurchaseFilter) -> Result<Vec<PurchaseRecord>, StoreError> {
        let mut records: Vec<PurchaseRecord> = self.records.iter()
            .filter(|entry| filter.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        sort_newest_first(&mut records);

        Ok(records)
    }

    fn get(&self, order_id: &str) -> Result<Option<PurchaseRecord>, StoreError> {
        Ok(self.records.get(order_id).map(|entry| entry.value().clone()))
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.len())
    }
}
