//! Scripted transport and virtual clock for driving the sync client in tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use super::timers::{TimerId, Timers};
use super::transport::{EventSink, Transport, TransportError, TransportEvent};

#[derive(Default)]
struct FakeSocket {
    opened: Vec<String>,
    sent: Vec<String>,
    closes: usize,
    sink: Option<EventSink>,
    fail_next_open: bool,
}

/// Records every call and lets the test push events into the last opened
/// connection. Clones share state.
#[derive(Clone, Default)]
pub struct FakeTransport {
    socket: Rc<RefCell<FakeSocket>>,
}

impl FakeTransport {
    pub fn emit(&self, event: TransportEvent) {
        let sink = self.socket.borrow().sink.clone();
        if let Some(sink) = sink {
            sink(event);
        }
    }

    pub fn emit_text(&self, text: &str) {
        self.emit(TransportEvent::Text(text.to_string()));
    }

    pub fn drop_connection(&self) {
        self.emit(TransportEvent::Closed {
            code: 1006,
            reason: "abnormal closure".to_string(),
        });
    }

    pub fn opened(&self) -> Vec<String> {
        self.socket.borrow().opened.clone()
    }

    pub fn sent(&self) -> Vec<String> {
        self.socket.borrow().sent.clone()
    }

    pub fn closes(&self) -> usize {
        self.socket.borrow().closes
    }

    pub fn fail_next_open(&self) {
        self.socket.borrow_mut().fail_next_open = true;
    }

    /// Total number of calls that reached the network.
    pub fn activity(&self) -> usize {
        let socket = self.socket.borrow();
        socket.opened.len() + socket.sent.len()
    }
}

impl Transport for FakeTransport {
    fn open(&mut self, url: &str, events: EventSink) -> Result<(), TransportError> {
        let mut socket = self.socket.borrow_mut();
        if std::mem::take(&mut socket.fail_next_open) {
            return Err(TransportError::Open("connection refused".to_string()));
        }
        socket.opened.push(url.to_string());
        socket.sink = Some(events);
        Ok(())
    }

    fn send(&mut self, text: &str) -> Result<(), TransportError> {
        self.socket.borrow_mut().sent.push(text.to_string());
        Ok(())
    }

    fn close(&mut self) {
        let mut socket = self.socket.borrow_mut();
        socket.closes += 1;
        // Keep the sink: a late event after close is exactly what the
        // generation check has to reject.
    }
}

enum Callback {
    Interval {
        period: Duration,
        tick: Option<Box<dyn FnMut()>>,
    },
    Timeout(Option<Box<dyn FnOnce()>>),
}

struct Scheduled {
    due: Duration,
    callback: Callback,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<TimerId, Scheduled>,
}

/// Manual timer wheel. Nothing fires until `advance` is called.
#[derive(Clone, Default)]
pub struct VirtualTimers {
    clock: Rc<RefCell<Clock>>,
}

impl VirtualTimers {
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    pub fn pending(&self) -> usize {
        self.clock.borrow().timers.len()
    }

    /// Moves time forward, firing due timers in order. Callbacks may schedule
    /// or clear timers.
    pub fn advance(&self, by: Duration) {
        let target = self.clock.borrow().now + by;
        loop {
            let next = {
                let clock = self.clock.borrow();
                clock
                    .timers
                    .iter()
                    .filter(|(_, s)| s.due <= target)
                    .min_by_key(|(id, s)| (s.due, **id))
                    .map(|(id, s)| (*id, s.due))
            };
            let Some((id, due)) = next else {
                break;
            };
            self.fire(id, due);
        }
        self.clock.borrow_mut().now = target;
    }

    fn fire(&self, id: TimerId, due: Duration) {
        let mut clock = self.clock.borrow_mut();
        clock.now = due;
        let Some(scheduled) = clock.timers.get_mut(&id) else {
            return;
        };
        match &mut scheduled.callback {
            Callback::Timeout(fire) => {
                let fire = fire.take();
                clock.timers.remove(&id);
                drop(clock);
                if let Some(fire) = fire {
                    fire();
                }
            }
            Callback::Interval { period, tick } => {
                let period = *period;
                let taken = tick.take();
                scheduled.due = due + period;
                drop(clock);
                let Some(mut tick) = taken else {
                    return;
                };
                tick();
                let mut clock = self.clock.borrow_mut();
                if let Some(Scheduled {
                    callback: Callback::Interval { tick: slot, .. },
                    ..
                }) = clock.timers.get_mut(&id)
                {
                    *slot = Some(tick);
                }
            }
        }
    }

    fn insert(&mut self, due_in: Duration, callback: Callback) -> TimerId {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = TimerId(clock.next_id);
        let due = clock.now + due_in;
        clock.timers.insert(id, Scheduled { due, callback });
        id
    }
}

impl Timers for VirtualTimers {
    fn set_interval(&mut self, period: Duration, tick: Box<dyn FnMut()>) -> TimerId {
        self.insert(
            period,
            Callback::Interval {
                period,
                tick: Some(tick),
            },
        )
    }

    fn set_timeout(&mut self, delay: Duration, fire: Box<dyn FnOnce()>) -> TimerId {
        self.insert(delay, Callback::Timeout(Some(fire)))
    }

    fn clear(&mut self, id: TimerId) {
        self.clock.borrow_mut().timers.remove(&id);
    }
}
