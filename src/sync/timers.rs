use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Timer seam for the sync client. Callbacks run later on the same thread,
/// never from inside the scheduling call. A cleared timer never fires again.
pub trait Timers {
    fn set_interval(&mut self, period: Duration, tick: Box<dyn FnMut()>) -> TimerId;
    fn set_timeout(&mut self, delay: Duration, fire: Box<dyn FnOnce()>) -> TimerId;
    fn clear(&mut self, id: TimerId);
}
