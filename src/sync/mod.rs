//! Live queue synchronization over a persistent socket.
//!
//! [`QueueSyncClient`] composes the socket wrapper, heartbeat, reconnect
//! supervisor and observer registries. Timers and the transport are seams so
//! the browser and the tests can each plug in their own.

#[cfg(target_arch = "wasm32")]
mod browser;
mod client;
mod heartbeat;
mod protocol;
mod reconnect;
mod registry;
#[cfg(test)]
pub(crate) mod testing;
mod timers;
mod transport;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserTimers, WebSocketTransport};
pub use client::{QueueSnapshot, QueueSyncClient, SkipError};
pub use heartbeat::Heartbeat;
pub use protocol::{InboundMessage, MessageKind, OutboundMessage, PlaybackStatus, QueueItem};
pub use reconnect::ReconnectSupervisor;
pub use registry::{Delivery, Handler, ListenerRegistry, SubscriptionId};
pub use timers::{TimerId, Timers};
pub use transport::{
    ConnectionState, EventSink, SocketEvent, SocketWrapper, Transport, TransportError,
    TransportEvent,
};
