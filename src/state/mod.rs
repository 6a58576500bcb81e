//! Plain view state the Dioxus components render from.

mod library;
mod queue_view;
mod toast;

pub use library::{LibraryState, RequestKind};
pub use queue_view::{format_time, QueueView};
pub use toast::{Toast, ToastKind, ToastStore};
