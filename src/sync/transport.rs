//! Socket wrapper: owns the one live connection and turns raw transport
//! callbacks into typed events for the sync client.

use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

use super::protocol::{InboundMessage, OutboundMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Idle,
    Connecting,
    Open,
    Closing,
}

impl ConnectionState {
    pub fn is_live(self) -> bool {
        self == Self::Open
    }

    /// A connect request in this state would create a duplicate socket.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Open)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Opened,
    Text(String),
    Error(String),
    Closed { code: u16, reason: String },
}

#[derive(Debug, Error, PartialEq)]
pub enum TransportError {
    #[error("failed to open socket: {0}")]
    Open(String),
    #[error("failed to send frame: {0}")]
    Send(String),
    #[error("socket is not open")]
    NotOpen,
}

pub type EventSink = Rc<dyn Fn(TransportEvent)>;

/// A duplex text connection.
///
/// Implementations must deliver events asynchronously: `events` is never
/// invoked from inside `open`, `send` or `close`. After `close` returns no
/// further events may be delivered for that connection.
pub trait Transport {
    fn open(&mut self, url: &str, events: EventSink) -> Result<(), TransportError>;
    fn send(&mut self, text: &str) -> Result<(), TransportError>;
    fn close(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SocketEvent {
    Opened,
    Message(InboundMessage),
    Closed,
}

pub struct SocketWrapper {
    transport: Box<dyn Transport>,
    state: ConnectionState,
    generation: u64,
}

impl SocketWrapper {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            state: ConnectionState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Starts a new connection. `on_event` receives every raw event tagged
    /// with the generation it belongs to, so events from an abandoned
    /// connection can be told apart.
    pub fn open<F>(&mut self, url: &str, on_event: F) -> Result<(), TransportError>
    where
        F: Fn(u64, TransportEvent) + 'static,
    {
        self.generation += 1;
        let generation = self.generation;
        let sink: EventSink = Rc::new(move |event| on_event(generation, event));

        self.state = ConnectionState::Connecting;
        if let Err(err) = self.transport.open(url, sink) {
            self.state = ConnectionState::Idle;
            return Err(err);
        }
        Ok(())
    }

    /// Classifies a raw event. Returns `None` for stale generations, error
    /// notifications and frames that do not parse.
    pub fn accept(&mut self, generation: u64, event: TransportEvent) -> Option<SocketEvent> {
        if generation != self.generation || self.state == ConnectionState::Idle {
            debug!(generation, current = self.generation, "dropping event from stale socket");
            return None;
        }

        match event {
            TransportEvent::Opened => {
                self.state = ConnectionState::Open;
                Some(SocketEvent::Opened)
            }
            TransportEvent::Text(text) => match InboundMessage::parse(&text) {
                Ok(message) => Some(SocketEvent::Message(message)),
                Err(err) => {
                    warn!(error = %err, payload_len = text.len(), "dropping unparsable queue frame");
                    None
                }
            },
            TransportEvent::Error(detail) => {
                warn!(%detail, "queue socket error");
                None
            }
            TransportEvent::Closed { code, reason } => {
                debug!(code, %reason, "queue socket closed");
                self.state = ConnectionState::Idle;
                Some(SocketEvent::Closed)
            }
        }
    }

    pub fn send(&mut self, message: OutboundMessage) -> Result<(), TransportError> {
        if self.state != ConnectionState::Open {
            return Err(TransportError::NotOpen);
        }
        let text = message
            .to_text()
            .map_err(|err| TransportError::Send(err.to_string()))?;
        self.transport.send(&text)
    }

    /// Closes the current connection and orphans its pending events.
    pub fn close(&mut self) {
        if self.state == ConnectionState::Idle {
            return;
        }
        self.state = ConnectionState::Closing;
        self.generation += 1;
        self.transport.close();
        self.state = ConnectionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::testing::FakeTransport;
    use assert_matches::assert_matches;
    use std::cell::RefCell;

    fn wrapper() -> (SocketWrapper, FakeTransport, Rc<RefCell<Vec<(u64, TransportEvent)>>>) {
        let fake = FakeTransport::default();
        let socket = SocketWrapper::new(Box::new(fake.clone()));
        (socket, fake, Rc::new(RefCell::new(Vec::new())))
    }

    #[test]
    fn open_tags_events_with_generation() {
        let (mut socket, fake, seen) = wrapper();
        let sink = seen.clone();
        socket
            .open("wss://bot/?guildid=1", move |gen, ev| sink.borrow_mut().push((gen, ev)))
            .unwrap();
        assert_eq!(socket.state(), ConnectionState::Connecting);

        fake.emit(TransportEvent::Opened);
        assert_eq!(seen.borrow().as_slice(), &[(1, TransportEvent::Opened)]);
    }

    #[test]
    fn accept_tracks_state() {
        let (mut socket, _fake, _) = wrapper();
        socket.open("wss://bot", |_, _| {}).unwrap();

        assert_matches!(socket.accept(1, TransportEvent::Opened), Some(SocketEvent::Opened));
        assert_eq!(socket.state(), ConnectionState::Open);

        let closed = TransportEvent::Closed {
            code: 1006,
            reason: String::new(),
        };
        assert_matches!(socket.accept(1, closed), Some(SocketEvent::Closed));
        assert_eq!(socket.state(), ConnectionState::Idle);
    }

    #[test]
    fn stale_generation_is_ignored() {
        let (mut socket, _fake, _) = wrapper();
        socket.open("wss://bot", |_, _| {}).unwrap();
        socket.accept(1, TransportEvent::Opened);
        socket.close();

        assert!(socket.accept(1, TransportEvent::Opened).is_none());
        assert_eq!(socket.state(), ConnectionState::Idle);
    }

    #[test]
    fn garbage_frames_are_dropped() {
        let (mut socket, _fake, _) = wrapper();
        socket.open("wss://bot", |_, _| {}).unwrap();
        socket.accept(1, TransportEvent::Opened);

        assert!(socket.accept(1, TransportEvent::Text("{oops".into())).is_none());
        assert_eq!(socket.state(), ConnectionState::Open);
    }

    #[test]
    fn send_requires_open_socket() {
        let (mut socket, fake, _) = wrapper();
        assert_eq!(socket.send(OutboundMessage::Ping), Err(TransportError::NotOpen));

        socket.open("wss://bot", |_, _| {}).unwrap();
        assert_eq!(socket.send(OutboundMessage::Ping), Err(TransportError::NotOpen));

        socket.accept(1, TransportEvent::Opened);
        socket.send(OutboundMessage::Ping).unwrap();
        assert_eq!(fake.sent(), vec![r#"{"type":"ping"}"#.to_string()]);
    }

    #[test]
    fn failed_open_returns_to_idle() {
        let (mut socket, fake, _) = wrapper();
        fake.fail_next_open();
        assert_matches!(socket.open("wss://bot", |_, _| {}), Err(TransportError::Open(_)));
        assert_eq!(socket.state(), ConnectionState::Idle);
    }
}
