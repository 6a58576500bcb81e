use dioxus::prelude::*;
use queuebox::state::{QueueView, ToastKind, ToastStore};
use queuebox::sync::SkipError;

use crate::components::{push_toast, Icon, Services};

fn skip_message(err: &SkipError) -> String {
    match err {
        SkipError::EmptyQueue => "Nothing is playing".to_string(),
        SkipError::Api(err) => err.user_message(),
    }
}

#[component]
pub fn QueuePanel() -> Element {
    let services = use_context::<Services>();
    let mut view = use_context::<Signal<QueueView>>();
    let toasts = use_context::<Signal<ToastStore>>();

    let snapshot = view.read().clone();
    let progress = snapshot.playback_progress();
    let can_skip = snapshot.is_live() && !snapshot.is_empty() && !snapshot.is_skipping;

    let on_skip = move |_| {
        let services = services.clone();
        view.write().is_skipping = true;
        spawn(async move {
            let session = services.session.clone().unwrap_or_default();
            match services.sync.request_skip(&services.api, &session).await {
                Ok(()) => push_toast(toasts, ToastKind::Success, "Skipped"),
                Err(err) => push_toast(toasts, ToastKind::Error, skip_message(&err)),
            }
            view.write().is_skipping = false;
        });
    };

    rsx! {
        aside { class: if snapshot.is_open { "queue-panel queue-panel--open" } else { "queue-panel" },
            button {
                class: "queue-toggle",
                onclick: move |_| view.write().toggle(),
                Icon { name: "queue".to_string(), class: "w-5 h-5".to_string() }
                span { "Queue" }
                span {
                    class: if snapshot.is_live() { "live-dot live-dot--on" } else { "live-dot" },
                    title: if snapshot.is_live() { "Live" } else { "Not connected" },
                }
            }

            if snapshot.is_open {
                div { class: "queue-body",
                    if let Some(current) = snapshot.current_track() {
                        div { class: "now-playing",
                            p { class: "now-playing-label", "Now Playing" }
                            p { class: "now-playing-title", "{current.title}" }
                            p { class: "now-playing-artist", "{current.artist} · {current.album}" }
                            div { class: "progress",
                                div { class: "progress-fill", style: "width: {progress}%" }
                            }
                            div { class: "progress-times",
                                span { "{snapshot.formatted_current_time()}" }
                                span { "{snapshot.formatted_total_time()}" }
                            }
                        }
                    }

                    if snapshot.is_empty() {
                        p { class: "queue-empty", "The queue is empty" }
                    } else {
                        p { class: "queue-count", "{snapshot.pending_count()} up next" }
                        ol { class: "queue-list",
                            for item in snapshot.pending() {
                                li { key: "{item.index}", class: "queue-row",
                                    span { class: "queue-index", "{item.index + 1}" }
                                    div { class: "queue-meta",
                                        p { class: "queue-title", "{item.title}" }
                                        p { class: "queue-artist", "{item.artist}" }
                                    }
                                }
                            }
                        }
                    }

                    button {
                        class: "skip-button",
                        disabled: !can_skip,
                        onclick: on_skip,
                        if snapshot.is_skipping {
                            Icon { name: "loader".to_string(), class: "w-4 h-4".to_string() }
                        } else {
                            Icon { name: "skip".to_string(), class: "w-4 h-4".to_string() }
                        }
                        "Skip"
                    }
                }
            }
        }
    }
}
