mod sqlite;
mod storage;

pub use sqlite::{SqliteChatStore, DEFAULT_DATABASE_FILE};
pub use storage::ChatStore;
