use std::time::Duration;

use tracing::debug;

use super::timers::{TimerId, Timers};

/// Periodic keep-alive on an open socket. At most one interval is live.
#[derive(Debug, Default)]
pub struct Heartbeat {
    timer: Option<TimerId>,
}

impl Heartbeat {
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// (Re)starts the interval, replacing any previous one.
    pub fn start(&mut self, timers: &mut dyn Timers, period: Duration, tick: Box<dyn FnMut()>) {
        self.stop(timers);
        debug!(period_ms = period.as_millis() as u64, "heartbeat started");
        self.timer = Some(timers.set_interval(period, tick));
    }

    pub fn stop(&mut self, timers: &mut dyn Timers) {
        if let Some(id) = self.timer.take() {
            timers.clear(id);
            debug!("heartbeat stopped");
        }
    }
}
