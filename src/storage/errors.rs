use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Unable to open dataset store at [{path}]: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error
    },
    #[error("Dataset store error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Stored purchase [{order_id}] is corrupt: {message}")]
    Corrupt {
        order_id: String,
        message: String
    }
}

impl StoreError {
    pub fn corrupt(order_id: &str, message: impl Into<String>) -> Self {
        Self::Corrupt {
            order_id: order_id.to_string(),
            message: message.into()
        }
    }
}
