use std::time::Duration;

use tracing::{debug, info};

use super::timers::{TimerId, Timers};

/// Schedules reconnect attempts after an unexpected close. Holds at most one
/// pending attempt; further requests while one is pending are ignored.
#[derive(Debug, Default)]
pub struct ReconnectSupervisor {
    pending: Option<TimerId>,
    attempts: u32,
}

impl ReconnectSupervisor {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Attempts scheduled since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns `false` when an attempt was already pending.
    pub fn schedule(
        &mut self,
        timers: &mut dyn Timers,
        delay: Duration,
        fire: Box<dyn FnOnce()>,
    ) -> bool {
        if self.pending.is_some() {
            debug!("reconnect already pending");
            return false;
        }
        self.attempts = self.attempts.saturating_add(1);
        info!(
            attempt = self.attempts,
            delay_ms = delay.as_millis() as u64,
            "scheduling queue reconnect"
        );
        self.pending = Some(timers.set_timeout(delay, fire));
        true
    }

    /// Called from the timer callback before reconnecting. Returns `false`
    /// if the attempt was cancelled in the meantime.
    pub fn fired(&mut self, timers: &mut dyn Timers) -> bool {
        match self.pending.take() {
            Some(id) => {
                timers.clear(id);
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self, timers: &mut dyn Timers) {
        if let Some(id) = self.pending.take() {
            timers.clear(id);
            debug!("pending reconnect cancelled");
        }
    }

    pub fn reset_attempts(&mut self) {
        self.attempts = 0;
    }
}
