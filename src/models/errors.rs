use crate::models::{Field, RawRow, FIELD_COUNT};
use thiserror::Error;

/// Why a line could not be split into a row at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Malformation {
    #[error("expected {expected} fields but found [{found}]", expected = FIELD_COUNT)]
    FieldCount {
        found: usize
    },
    #[error("line is not valid UTF-8")]
    InvalidEncoding
}

/// Reasons a single source line is rejected. None of them abort an import.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowError {
    #[error("Malformed row: {problem}")]
    MalformedRow {
        problem: Malformation
    },
    #[error("Invalid serial number [{value}], expected a non-negative integer")]
    InvalidSerialNumber {
        value: String
    },
    #[error("Invalid date [{value}], expected a calendar date formatted YYYY-MM-DD")]
    InvalidDate {
        value: String
    },
    #[error("Missing required field [{field}]")]
    MissingField {
        field: Field
    },
    #[error("Invalid quantity [{value}], expected a whole number of at least 1")]
    InvalidQuantity {
        value: String
    },
    #[error("Invalid price [{value}], expected a non-negative amount with at most two decimal places")]
    InvalidPrice {
        value: String
    }
}

impl RowError {
    pub fn malformed(found: usize) -> Self {
        Self::MalformedRow { problem: Malformation::FieldCount { found } }
    }

    pub fn invalid_encoding() -> Self {
        Self::MalformedRow { problem: Malformation::InvalidEncoding }
    }

    pub fn invalid_serial_number(value: &str) -> Self {
        Self::InvalidSerialNumber { value: value.to_string() }
    }

    pub fn invalid_date(value: &str) -> Self {
        Self::InvalidDate { value: value.to_string() }
    }

    pub fn missing_field(field: Field) -> Self {
        Self::MissingField { field }
    }

    pub fn invalid_quantity(value: &str) -> Self {
        Self::InvalidQuantity { value: value.to_string() }
    }

    pub fn invalid_price(value: &str) -> Self {
        Self::InvalidPrice { value: value.to_string() }
    }

    /// Stable reason code used in rejection reports.
    pub fn code(&self) -> &'static str {
        match self {
            RowError::MalformedRow { .. } => "MalformedRow",
            RowError::InvalidSerialNumber { .. } => "InvalidSerialNumber",
            RowError::InvalidDate { .. } => "InvalidDate",
            RowError::MissingField { .. } => "MissingField",
            RowError::InvalidQuantity { .. } => "InvalidQuantity",
            RowError::InvalidPrice { .. } => "InvalidPrice"
        }
    }
}

/// A row the normalizer refused, kept together with its raw fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Rejection {
    pub row: RawRow,
    pub reason: RowError
}
