mod errors;
mod filter;
#[cfg(test)]
pub mod fixtures;
mod purchase;

pub use errors::{Rejection, RowError};
pub use filter::PurchaseFilter;
pub use purchase::{Field, PurchaseRecord, RawRow, FIELD_COUNT};
