// Browser adapters: `web_sys::WebSocket` transport and gloo-backed timers.

use std::collections::HashMap;
use std::time::Duration;

use futures_util::future::{abortable, AbortHandle};
use gloo_timers::future::TimeoutFuture;
use tracing::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::timers::{TimerId, Timers};
use super::transport::{EventSink, Transport, TransportError, TransportEvent};

fn js_error(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}

fn millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Timers run as local tasks awaiting `TimeoutFuture`; clearing aborts the task.
#[derive(Default)]
pub struct BrowserTimers {
    next_id: u64,
    tasks: HashMap<TimerId, AbortHandle>,
}

impl BrowserTimers {
    fn next_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }
}

impl Timers for BrowserTimers {
    fn set_interval(&mut self, period: Duration, mut tick: Box<dyn FnMut()>) -> TimerId {
        let id = self.next_id();
        let period = millis(period);
        let (task, handle) = abortable(async move {
            loop {
                TimeoutFuture::new(period).await;
                tick();
            }
        });
        spawn_local(async move {
            let _ = task.await;
        });
        self.tasks.insert(id, handle);
        id
    }

    fn set_timeout(&mut self, delay: Duration, fire: Box<dyn FnOnce()>) -> TimerId {
        let id = self.next_id();
        let delay = millis(delay);
        let (task, handle) = abortable(async move {
            TimeoutFuture::new(delay).await;
            fire();
        });
        spawn_local(async move {
            let _ = task.await;
        });
        self.tasks.insert(id, handle);
        id
    }

    fn clear(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
        }
    }
}

struct Listeners {
    _open: Closure<dyn FnMut(Event)>,
    _message: Closure<dyn FnMut(MessageEvent)>,
    _error: Closure<dyn FnMut(Event)>,
    _close: Closure<dyn FnMut(CloseEvent)>,
}

/// Forwards through a local task so the sync client never runs inside a JS
/// callback that `close` may be about to drop.
fn forward(sink: &EventSink, event: TransportEvent) {
    let sink = sink.clone();
    spawn_local(async move { sink(event) });
}

impl Listeners {
    fn attach(socket: &WebSocket, events: EventSink) -> Self {
        let sink = events.clone();
        let open = Closure::wrap(Box::new(move |_: Event| {
            forward(&sink, TransportEvent::Opened);
        }) as Box<dyn FnMut(Event)>);

        let sink = events.clone();
        let message = Closure::wrap(Box::new(move |event: MessageEvent| {
            match event.data().as_string() {
                Some(text) => forward(&sink, TransportEvent::Text(text)),
                None => debug!("ignoring binary queue frame"),
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        let sink = events.clone();
        let error = Closure::wrap(Box::new(move |event: Event| {
            forward(&sink, TransportEvent::Error(event.type_()));
        }) as Box<dyn FnMut(Event)>);

        let sink = events;
        let close = Closure::wrap(Box::new(move |event: CloseEvent| {
            forward(
                &sink,
                TransportEvent::Closed {
                    code: event.code(),
                    reason: event.reason(),
                },
            );
        }) as Box<dyn FnMut(CloseEvent)>);

        socket.set_onopen(Some(open.as_ref().unchecked_ref()));
        socket.set_onmessage(Some(message.as_ref().unchecked_ref()));
        socket.set_onerror(Some(error.as_ref().unchecked_ref()));
        socket.set_onclose(Some(close.as_ref().unchecked_ref()));

        Self {
            _open: open,
            _message: message,
            _error: error,
            _close: close,
        }
    }
}

#[derive(Default)]
pub struct WebSocketTransport {
    socket: Option<WebSocket>,
    listeners: Option<Listeners>,
}

impl Transport for WebSocketTransport {
    fn open(&mut self, url: &str, events: EventSink) -> Result<(), TransportError> {
        self.close();
        let socket = WebSocket::new(url).map_err(|err| TransportError::Open(js_error(&err)))?;
        self.listeners = Some(Listeners::attach(&socket, events));
        self.socket = Some(socket);
        Ok(())
    }

    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        let Some(socket) = self.socket.as_ref() else {
            return Err(TransportError::NotOpen);
        };
        socket
            .send_with_str(text)
            .map_err(|err| TransportError::Send(js_error(&err)))
    }

    fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            socket.set_onopen(None);
            socket.set_onmessage(None);
            socket.set_onerror(None);
            socket.set_onclose(None);
            let _ = socket.close();
        }
        self.listeners = None;
    }
}
