use std::collections::HashMap;

use crate::models::PurchaseRecord;
use crate::types::OrderId;

/// Accepted records awaiting the end-of-run commit, at most one per order id.
///
/// A later record with an already buffered order id replaces the earlier one
/// in place, so the last occurrence in the file wins.
#[derive(Debug, Default)]
pub struct ImportBatch {
    records: Vec<PurchaseRecord>,
    positions: HashMap<OrderId, usize>
}

impl ImportBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers `record`, returning the record it replaced if any.
    pub fn push(&mut self, record: PurchaseRecord) -> Option<PurchaseRecord> {
        match self.positions.get(&record.order_id) {
            Some(&position) => self.records.get_mut(position)
                .map(|existing| std::mem::replace(existing, record)),
            None => {
                self.positions.insert(record.order_id.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn records(&self) -> &[PurchaseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
