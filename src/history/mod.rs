pub mod record;
pub mod storage;
pub mod store;

pub use record::GeneratedImage;
pub use storage::KeyValueStore;
pub use store::{DEFAULT_HISTORY_KEY, DEFAULT_HISTORY_LIMIT, HistoryStore};
