use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CurrencyError {
    #[error("Currency error: exchange rate must be greater than zero, got [{0}]")]
    InvalidRate(Decimal)
}
