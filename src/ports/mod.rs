//! Ports - interfaces the coordination layer depends on.
//!
//! The realtime transport is an opaque collaborator; adapters provide
//! concrete implementations (Redis pub/sub in production, an in-memory
//! transport in tests).

mod transport;

pub use transport::{
    ChannelConnection, ChannelTransport, OpenedChannel, TransportEvent, TransportError,
};
