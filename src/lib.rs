//! Farmstand Realtime - Client-side realtime subscription coordination
//!
//! This crate multiplexes many independent UI consumers onto deduplicated
//! pub/sub channel connections, with refcounted lifecycle management,
//! connection health classification, and exponential-backoff reconnection.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
