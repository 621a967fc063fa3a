mod batch;
mod errors;
mod normalizer;
mod parser;
mod pipeline;
mod summary;

pub use batch::ImportBatch;
pub use errors::ImportError;
pub use normalizer::Normalizer;
pub use parser::{RecordParser, FIELD_DELIMITER};
pub use pipeline::ImportPipeline;
pub use summary::{ImportSummary, RejectedLine, DEFAULT_REJECTION_LIMIT};
