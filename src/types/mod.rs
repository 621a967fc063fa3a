mod currency;
mod errors;

pub use currency::{Currency, CurrencyConverter, DualPrice, PRICE_DECIMAL_PLACES};

pub type SerialNumber = u32;
pub type OrderId = String;
