//! Observer list with latest-value replay.

use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type Handler<T> = Rc<dyn Fn(&T)>;

/// Handlers plus the value they should see, collected while the owner is
/// borrowed and invoked after the borrow is released.
pub struct Delivery<T> {
    handlers: Vec<Handler<T>>,
    value: T,
}

impl<T> Delivery<T> {
    pub fn deliver(self) {
        for handler in &self.handlers {
            handler(&self.value);
        }
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

pub struct ListenerRegistry<T> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<T>)>,
    latest: Option<T>,
}

impl<T> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            handlers: Vec::new(),
            latest: None,
        }
    }
}

impl<T: Clone> ListenerRegistry<T> {
    /// Registers `handler`. If a value was already published, the returned
    /// delivery replays it to the new handler only.
    pub fn subscribe(&mut self, handler: Handler<T>) -> (SubscriptionId, Option<Delivery<T>>) {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.handlers.push((id, handler.clone()));
        let replay = self.latest.clone().map(|value| Delivery {
            handlers: vec![handler],
            value,
        });
        (id, replay)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        before != self.handlers.len()
    }

    /// Records `value` as latest and fans it out to every current handler.
    pub fn publish(&mut self, value: T) -> Delivery<T> {
        self.latest = Some(value.clone());
        Delivery {
            handlers: self.handlers.iter().map(|(_, h)| h.clone()).collect(),
            value,
        }
    }

    pub fn latest(&self) -> Option<&T> {
        self.latest.as_ref()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
