pub mod error;
pub mod ingest;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use ingest::{parse_snapshot, read_snapshot};
pub use store::{MergeOutcome, RecordStore};
pub use types::{record_key, PrRecord, PrState, RecordMap, FIELDS};
