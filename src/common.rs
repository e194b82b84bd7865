pub mod error;
pub use error::AppError;
pub mod normalizer;
pub use normalizer::{decode_one, decode_records, normalize, normalize_one, RecordShape};
pub mod storage;
pub use storage::{FileStore, KeyValueStore, MemoryStore};
