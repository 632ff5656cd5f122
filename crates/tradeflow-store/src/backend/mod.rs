//! Store backends.

mod memory;
mod redis_kv;
mod sqlite;

pub use memory::MemoryBackend;
pub use redis_kv::RedisBackend;
pub use sqlite::SqliteBackend;
