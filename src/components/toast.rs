use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use queuebox::state::{ToastKind, ToastStore};

use crate::components::Icon;

/// Shows a toast and dismisses it after its kind's display time.
pub fn push_toast(mut toasts: Signal<ToastStore>, kind: ToastKind, message: impl Into<String>) {
    let id = toasts.write().push(kind, message);
    let delay = kind.display_for().as_millis() as u32;
    spawn(async move {
        TimeoutFuture::new(delay).await;
        toasts.write().remove(&id);
    });
}

fn kind_class(kind: ToastKind) -> &'static str {
    match kind {
        ToastKind::Success => "toast toast--success",
        ToastKind::Error => "toast toast--error",
        ToastKind::Warning => "toast toast--warning",
        ToastKind::Info => "toast toast--info",
    }
}

#[component]
pub fn ToastHost() -> Element {
    let mut toasts = use_context::<Signal<ToastStore>>();
    let items = toasts.read().toasts().to_vec();

    rsx! {
        div { class: "toast-host",
            for toast in items {
                {
                    let id = toast.id.clone();
                    rsx! {
                        div { key: "{toast.id}", class: kind_class(toast.kind),
                            Icon {
                                name: toast.kind.icon().to_string(),
                                class: "w-4 h-4".to_string(),
                            }
                            span { class: "toast-message", "{toast.message}" }
                            button {
                                class: "toast-close",
                                onclick: move |_| {
                                    toasts.write().remove(&id);
                                },
                                Icon { name: "x".to_string(), class: "w-3 h-3".to_string() }
                            }
                        }
                    }
                }
            }
        }
    }
}
