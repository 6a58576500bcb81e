//! History-driven artist → album navigation.
//!
//! Selection stage is encoded in browser history entries so back/forward
//! can restore selection and scroll position without a server round trip.

#[cfg(target_arch = "wasm32")]
mod browser;
mod entry;
mod history;
mod machine;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserHistory, PaneScroll};
pub use entry::{NavigationEntry, StageTag};
pub use history::{HistoryStack, MemoryHistory, ScrollSurface};
pub use machine::{NavAction, NavigationError, NavigationMachine, Selection, Stage, Transition};
