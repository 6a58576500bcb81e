//! The live queue client: one socket, one heartbeat, one reconnect timer and
//! three observer lists, behind a cheap clonable handle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use super::heartbeat::Heartbeat;
use super::protocol::{MessageKind, OutboundMessage, PlaybackStatus, QueueItem};
use super::reconnect::ReconnectSupervisor;
use super::registry::{Delivery, ListenerRegistry, SubscriptionId};
use super::timers::Timers;
use super::transport::{ConnectionState, SocketEvent, SocketWrapper, Transport, TransportEvent};
use crate::api::{ApiError, MusicApi};
use crate::config::SyncConfig;

pub type QueueSnapshot = Rc<[QueueItem]>;

#[derive(Debug, Error)]
pub enum SkipError {
    #[error("there is no track to skip")]
    EmptyQueue,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Fan-outs collected under the borrow and run after it is released, so
/// handlers may call back into the client.
#[derive(Default)]
struct Outbox {
    queue: Option<Delivery<QueueSnapshot>>,
    playback: Option<Delivery<PlaybackStatus>>,
    connection: Option<Delivery<ConnectionState>>,
}

impl Outbox {
    fn flush(self) {
        if let Some(delivery) = self.connection {
            delivery.deliver();
        }
        if let Some(delivery) = self.queue {
            delivery.deliver();
        }
        if let Some(delivery) = self.playback {
            delivery.deliver();
        }
    }
}

struct Inner {
    this: Weak<RefCell<Inner>>,
    config: SyncConfig,
    ws_url: String,
    socket: SocketWrapper,
    timers: Box<dyn Timers>,
    heartbeat: Heartbeat,
    reconnect: ReconnectSupervisor,
    session: Option<String>,
    queue: ListenerRegistry<QueueSnapshot>,
    playback: ListenerRegistry<PlaybackStatus>,
    connection: ListenerRegistry<ConnectionState>,
}

#[derive(Clone)]
pub struct QueueSyncClient {
    inner: Rc<RefCell<Inner>>,
}

impl QueueSyncClient {
    pub fn new(
        config: SyncConfig,
        ws_url: impl Into<String>,
        transport: impl Transport + 'static,
        timers: impl Timers + 'static,
    ) -> Self {
        let ws_url = ws_url.into();
        let inner = Rc::new_cyclic(|this| {
            RefCell::new(Inner {
                this: this.clone(),
                config,
                ws_url,
                socket: SocketWrapper::new(Box::new(transport)),
                timers: Box::new(timers),
                heartbeat: Heartbeat::default(),
                reconnect: ReconnectSupervisor::default(),
                session: None,
                queue: ListenerRegistry::default(),
                playback: ListenerRegistry::default(),
                connection: ListenerRegistry::default(),
            })
        });
        Self { inner }
    }

    /// Opens the live connection for `session`. A no-op while a connection
    /// is already open or being opened.
    pub fn connect(&self, session: &str) {
        let outbox = self.inner.borrow_mut().connect(session);
        outbox.flush();
    }

    /// Stops the heartbeat, cancels any pending reconnect and closes the
    /// socket. Events that arrive afterwards are ignored.
    pub fn disconnect(&self) {
        let outbox = self.inner.borrow_mut().disconnect();
        outbox.flush();
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.inner.borrow().socket.state()
    }

    pub fn is_live(&self) -> bool {
        self.connection_state().is_live()
    }

    pub fn session(&self) -> Option<String> {
        self.inner.borrow().session.clone()
    }

    /// The last queue snapshot received, empty before the first one.
    pub fn queue(&self) -> QueueSnapshot {
        self.inner
            .borrow()
            .queue
            .latest()
            .cloned()
            .unwrap_or_else(|| Rc::from(Vec::new()))
    }

    pub fn playback_status(&self) -> Option<PlaybackStatus> {
        self.inner.borrow().playback.latest().cloned()
    }

    /// Skipping only makes sense while the queue has something in it.
    pub fn can_skip(&self) -> bool {
        !self.queue().is_empty()
    }

    pub fn subscribe_queue<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&[QueueItem]) + 'static,
    {
        let (id, replay) = self
            .inner
            .borrow_mut()
            .queue
            .subscribe(Rc::new(move |items: &QueueSnapshot| handler(items)));
        if let Some(replay) = replay {
            replay.deliver();
        }
        id
    }

    pub fn unsubscribe_queue(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().queue.unsubscribe(id)
    }

    pub fn subscribe_playback<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&PlaybackStatus) + 'static,
    {
        let (id, replay) = self.inner.borrow_mut().playback.subscribe(Rc::new(handler));
        if let Some(replay) = replay {
            replay.deliver();
        }
        id
    }

    pub fn unsubscribe_playback(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().playback.unsubscribe(id)
    }

    /// Connection state changes. The current state is delivered immediately.
    pub fn subscribe_connection<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ConnectionState) + 'static,
    {
        let handler: Rc<dyn Fn(&ConnectionState)> = Rc::new(handler);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            let (id, _) = inner.connection.subscribe(handler.clone());
            (id, inner.socket.state())
        };
        handler(&current);
        id
    }

    pub fn unsubscribe_connection(&self, id: SubscriptionId) -> bool {
        self.inner.borrow_mut().connection.unsubscribe(id)
    }

    /// Asks the bot to skip the current track. Refused locally when the last
    /// snapshot is empty.
    pub async fn request_skip(&self, api: &MusicApi, session: &str) -> Result<(), SkipError> {
        if !self.can_skip() {
            return Err(SkipError::EmptyQueue);
        }
        api.submit_skip(session).await?;
        Ok(())
    }
}

impl Inner {
    fn connect(&mut self, session: &str) -> Outbox {
        let state = self.socket.state();
        if state.is_active() {
            debug!(?state, "queue socket already active, ignoring connect");
            return Outbox::default();
        }
        self.reconnect.cancel(self.timers.as_mut());
        self.reconnect.reset_attempts();
        self.session = Some(session.to_string());
        self.open()
    }

    fn disconnect(&mut self) -> Outbox {
        self.session = None;
        self.reconnect.cancel(self.timers.as_mut());
        self.heartbeat.stop(self.timers.as_mut());
        if self.socket.state() == ConnectionState::Idle {
            return Outbox::default();
        }
        self.socket.close();
        info!("queue socket disconnected");
        self.connection_changed()
    }

    fn open(&mut self) -> Outbox {
        let Some(session) = self.session.clone() else {
            return Outbox::default();
        };
        let url = SyncConfig::endpoint(&self.ws_url, &session);
        let this = self.this.clone();
        let opened = self
            .socket
            .open(&url, move |generation, event| on_event(&this, generation, event));

        match opened {
            Ok(()) => {
                debug!(%url, "queue socket connecting");
                self.connection_changed()
            }
            Err(err) => {
                warn!(error = %err, "queue socket failed to open");
                self.schedule_reconnect();
                Outbox::default()
            }
        }
    }

    fn handle(&mut self, generation: u64, event: TransportEvent) -> Outbox {
        let Some(event) = self.socket.accept(generation, event) else {
            return Outbox::default();
        };

        match event {
            SocketEvent::Opened => {
                info!("queue socket connected");
                self.reconnect.reset_attempts();
                self.start_heartbeat();
                self.connection_changed()
            }
            SocketEvent::Message(message) => {
                let mut outbox = Outbox::default();
                if let Some(items) = message.queue_snapshot() {
                    trace!(items = items.len(), "queue snapshot");
                    outbox.queue = Some(self.queue.publish(Rc::from(items)));
                }
                if let Some(status) = message.playback() {
                    outbox.playback = Some(self.playback.publish(status.clone()));
                }
                if matches!(message.kind, MessageKind::Ping | MessageKind::Pong) {
                    trace!(kind = ?message.kind, "heartbeat frame");
                }
                outbox
            }
            SocketEvent::Closed => {
                warn!("queue socket dropped unexpectedly");
                self.heartbeat.stop(self.timers.as_mut());
                self.schedule_reconnect();
                self.connection_changed()
            }
        }
    }

    fn start_heartbeat(&mut self) {
        let this = self.this.clone();
        let period = self.config.heartbeat_interval;
        self.heartbeat.start(
            self.timers.as_mut(),
            period,
            Box::new(move || {
                if let Some(inner) = this.upgrade() {
                    inner.borrow_mut().beat();
                }
            }),
        );
    }

    fn beat(&mut self) {
        if !self.socket.state().is_live() {
            self.heartbeat.stop(self.timers.as_mut());
            return;
        }
        if let Err(err) = self.socket.send(OutboundMessage::Ping) {
            warn!(error = %err, "heartbeat ping failed");
        }
    }

    fn schedule_reconnect(&mut self) {
        if self.session.is_none() {
            return;
        }
        let this = self.this.clone();
        let delay = self.config.reconnect_delay;
        self.reconnect.schedule(
            self.timers.as_mut(),
            delay,
            Box::new(move || {
                let Some(inner) = this.upgrade() else {
                    return;
                };
                let outbox = inner.borrow_mut().retry();
                outbox.flush();
            }),
        );
    }

    fn retry(&mut self) -> Outbox {
        if !self.reconnect.fired(self.timers.as_mut()) {
            return Outbox::default();
        }
        let state = self.socket.state();
        if state.is_active() {
            debug!(?state, "reconnect found socket active");
            return Outbox::default();
        }
        self.open()
    }

    fn connection_changed(&mut self) -> Outbox {
        Outbox {
            connection: Some(self.connection.publish(self.socket.state())),
            ..Outbox::default()
        }
    }
}

fn on_event(this: &Weak<RefCell<Inner>>, generation: u64, event: TransportEvent) {
    let Some(inner) = this.upgrade() else {
        return;
    };
    let outbox = inner.borrow_mut().handle(generation, event);
    outbox.flush();
}
