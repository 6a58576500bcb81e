// `window.history` and the right-hand scroll pane.

use gloo_timers::callback::Timeout;
use js_sys::JSON;
use tracing::warn;
use wasm_bindgen::JsValue;
use web_sys::{window, History};

use super::entry::NavigationEntry;
use super::history::{HistoryStack, ScrollSurface};

pub struct BrowserHistory {
    history: Option<History>,
}

impl BrowserHistory {
    pub fn new() -> Self {
        let history = window().and_then(|w| w.history().ok());
        if history.is_none() {
            warn!("window.history unavailable, navigation entries will not persist");
        }
        Self { history }
    }

    /// Decodes the `state` carried by a `popstate` event. Entries are written
    /// as JSON strings; older builds pushed plain objects.
    pub fn decode_state(state: &JsValue) -> Option<NavigationEntry> {
        if state.is_null() || state.is_undefined() {
            return None;
        }
        let raw = match state.as_string() {
            Some(raw) => raw,
            None => match JSON::stringify(state) {
                Ok(raw) => String::from(raw),
                Err(err) => {
                    warn!(error = ?err, "history state is not serializable");
                    return None;
                }
            },
        };
        NavigationEntry::decode(&raw)
    }
}

impl Default for BrowserHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStack for BrowserHistory {
    fn current(&self) -> Option<NavigationEntry> {
        let state = self.history.as_ref()?.state().ok()?;
        Self::decode_state(&state)
    }

    fn push(&mut self, entry: &NavigationEntry) {
        let Some(history) = self.history.as_ref() else {
            return;
        };
        if let Err(err) = history.push_state(&JsValue::from_str(&entry.encode()), "") {
            warn!(error = ?err, "history.pushState failed");
        }
    }

    fn replace(&mut self, entry: &NavigationEntry) {
        let Some(history) = self.history.as_ref() else {
            return;
        };
        if let Err(err) = history.replace_state(&JsValue::from_str(&entry.encode()), "") {
            warn!(error = ?err, "history.replaceState failed");
        }
    }
}

/// Scroll position of the element matching `selector`.
pub struct PaneScroll {
    selector: &'static str,
}

impl PaneScroll {
    pub const RIGHT_PANE: &'static str = ".right-pane";

    pub fn new(selector: &'static str) -> Self {
        Self { selector }
    }

    fn element(selector: &str) -> Option<web_sys::Element> {
        window()?
            .document()?
            .query_selector(selector)
            .ok()
            .flatten()
    }
}

impl ScrollSurface for PaneScroll {
    fn offset(&self) -> i32 {
        Self::element(self.selector)
            .map(|el| el.scroll_top())
            .unwrap_or(0)
    }

    fn restore_later(&self, offset: i32) {
        let selector = self.selector;
        Timeout::new(0, move || {
            if let Some(el) = Self::element(selector) {
                el.set_scroll_top(offset);
            }
        })
        .forget();
    }
}
