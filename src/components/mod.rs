mod app;
mod icons;
mod library;
mod queue_panel;
mod toast;

pub use app::{AppShell, Services};
pub use icons::Icon;
pub use library::LibraryPane;
pub use queue_panel::QueuePanel;
pub use toast::{push_toast, ToastHost};
