//! Transport adapters.
//!
//! `RedisTransport` is the production pub/sub transport; `InMemoryTransport`
//! provides deterministic delivery for tests.

mod in_memory;
mod redis;

pub use in_memory::InMemoryTransport;
pub use redis::RedisTransport;
