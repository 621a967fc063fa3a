use crate::types::errors::CurrencyError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Number of decimal places every stored price carries.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// The two currencies a purchase price is tracked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// Chinese yuan, the currency of the source export.
    #[default]
    Cny,
    /// Singapore dollar, derived from the yuan price.
    Sgd
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Cny => "¥",
            Currency::Sgd => "S$"
        }
    }
}

impl Display for Currency {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Cny => write!(formatter, "CNY"),
            Currency::Sgd => write!(formatter, "SGD")
        }
    }
}

/// A unit price expressed in both currencies.
///
/// Only [`CurrencyConverter::convert`] can build one, so the SGD side is always
/// the rounded product of the CNY side and the recorded rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DualPrice {
    #[serde(rename = "item_price_cny")]
    cny: Decimal,
    #[serde(rename = "item_price_sgd")]
    sgd: Decimal,
    #[serde(rename = "exchange_rate")]
    rate: Decimal
}

impl DualPrice {
    pub fn cny(&self) -> Decimal {
        self.cny
    }

    pub fn sgd(&self) -> Decimal {
        self.sgd
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn in_currency(&self, currency: Currency) -> Decimal {
        match currency {
            Currency::Cny => self.cny,
            Currency::Sgd => self.sgd
        }
    }

    /// Price in minor units (cents/fen). Always fits by construction.
    pub fn cents(&self, currency: Currency) -> i64 {
        to_cents(self.in_currency(currency)).unwrap_or_default()
    }

    /// Line total for `quantity` units, saturating at `Decimal::MAX`.
    pub fn total(&self, quantity: u32, currency: Currency) -> Decimal {
        self.in_currency(currency)
            .checked_mul(Decimal::from(quantity))
            .unwrap_or(Decimal::MAX)
    }
}

/// Converts CNY prices to SGD at a fixed rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrencyConverter {
    rate: Decimal
}

impl CurrencyConverter {
    /// Rate used when none is configured: 1 CNY = 0.1962 SGD.
    pub fn default_rate() -> Decimal {
        Decimal::new(1962, 4)
    }

    pub fn new(rate: Decimal) -> Result<Self, CurrencyError> {
        if rate <= Decimal::ZERO {
            return Err(CurrencyError::InvalidRate(rate));
        }

        Ok(Self { rate })
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// Derives the SGD price for `cny` using banker's rounding to two places.
    ///
    /// Returns `None` when either side does not fit in 64-bit minor units, which
    /// is the storage representation.
    pub fn convert(&self, cny: Decimal) -> Option<DualPrice> {
        let cny = normalize_price(cny);
        let sgd = cny.checked_mul(self.rate).map(normalize_price)?;

        to_cents(cny)?;
        to_cents(sgd)?;

        Some(DualPrice { cny, sgd, rate: self.rate })
    }
}

impl Default for CurrencyConverter {
    fn default() -> Self {
        Self { rate: Self::default_rate() }
    }
}

fn normalize_price(value: Decimal) -> Decimal {
    let mut value = value.round_dp_with_strategy(PRICE_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven);

    if value.is_zero() {
        value = Decimal::ZERO;
    }

    value.rescale(PRICE_DECIMAL_PLACES);
    value
}

fn to_cents(value: Decimal) -> Option<i64> {
    value.checked_mul(Decimal::ONE_HUNDRED)?.trunc().to_i64()
}
