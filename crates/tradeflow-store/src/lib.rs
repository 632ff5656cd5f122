//! Tradeflow Entity Store
//!
//! Key-value persistence for the marketplace. Every collection lives under a
//! single key as a JSON array and is rewritten in full on each mutation.
//! Backends: in-memory, SQLite file, Redis.

pub mod backend;
pub mod broadcast;
pub mod client;
pub mod keys;
pub mod queries;

pub use backend::{MemoryBackend, RedisBackend, SqliteBackend};
pub use broadcast::{create_broadcast_channel, BroadcastReceiver, BroadcastSender, WorkflowEvent};
pub use client::{init_pool, Backend, BackendKind, StoreError, StorePool, StoreResult};
pub use queries::{
    buyers, clients, contracts, funded, invoices, notifications, opportunities, projects, session,
};
