use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dioxus::core::{Runtime, RuntimeGuard};
use dioxus::prelude::*;
use queuebox::api::MusicApi;
use queuebox::config::session_from_query;
use queuebox::navigation::{BrowserHistory, NavAction, NavigationMachine, PaneScroll, Selection};
use queuebox::state::{LibraryState, QueueView, ToastStore};
use queuebox::sync::{BrowserTimers, QueueSyncClient, SubscriptionId, WebSocketTransport};
use queuebox::AppConfig;
use tracing::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::window;

use crate::components::library::load_albums;
use crate::components::{LibraryPane, QueuePanel, ToastHost};

pub type Navigator = Rc<RefCell<NavigationMachine<BrowserHistory, PaneScroll>>>;

/// Long-lived collaborators shared through context. Built once per page.
#[derive(Clone)]
pub struct Services {
    pub api: MusicApi,
    pub sync: QueueSyncClient,
    pub nav: Navigator,
    pub session: Option<String>,
}

impl Services {
    fn from_location(config: AppConfig) -> Self {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let session = session_from_query(&search);
        if session.is_none() {
            warn!("page opened without a guildid, live queue disabled");
        }

        let sync = QueueSyncClient::new(
            config.sync,
            config.ws_url.clone(),
            WebSocketTransport::default(),
            BrowserTimers::default(),
        );
        let nav = NavigationMachine::new(
            BrowserHistory::new(),
            PaneScroll::new(PaneScroll::RIGHT_PANE),
        );

        Self {
            api: MusicApi::new(config.api_base_url),
            sync,
            nav: Rc::new(RefCell::new(nav)),
            session,
        }
    }
}

/// Listener ids held by the shell for the lifetime of the page.
#[derive(Clone, Copy)]
struct LiveSubscriptions {
    queue: SubscriptionId,
    playback: SubscriptionId,
    connection: SubscriptionId,
}

impl LiveSubscriptions {
    fn release(self, sync: &QueueSyncClient) {
        sync.unsubscribe_queue(self.queue);
        sync.unsubscribe_playback(self.playback);
        sync.unsubscribe_connection(self.connection);
    }
}

fn apply_nav_action(
    action: NavAction,
    selection: Selection,
    api: &MusicApi,
    mut library: Signal<LibraryState>,
) {
    match action {
        NavAction::None => {}
        NavAction::ResetAll { .. } => {
            let mut state = library.write();
            state.selection = selection;
            state.is_loading = false;
            state.sync_listings();
        }
        NavAction::SelectArtist {
            artist, changed, ..
        } => {
            library.write().selection = selection;
            if changed {
                load_albums(api.clone(), library, artist);
            } else {
                library.write().sync_listings();
            }
        }
    }
}

#[component]
pub fn AppShell() -> Element {
    let services = use_hook(|| Services::from_location(AppConfig::default()));
    let library = use_signal(LibraryState::default);
    let queue_view = use_signal(QueueView::default);
    let toasts = use_signal(ToastStore::default);

    use_context_provider(|| services.clone());
    use_context_provider(|| library);
    use_context_provider(|| queue_view);
    use_context_provider(|| toasts);

    let live = use_hook(|| Rc::new(Cell::new(None::<LiveSubscriptions>)));

    // Queue client lifecycle: subscribe and connect on mount.
    let services_for_sync = services.clone();
    let live_for_sync = live.clone();
    use_effect(move || {
        let sync = services_for_sync.sync.clone();
        if let Some(previous) = live_for_sync.take() {
            previous.release(&sync);
        }
        let runtime = Runtime::current();

        let runtime_queue = runtime.clone();
        let queue = sync.subscribe_queue(move |items| {
            let _guard = RuntimeGuard::new(runtime_queue.clone());
            let mut view = queue_view;
            view.write().apply_snapshot(items);
        });
        let runtime_playback = runtime.clone();
        let playback = sync.subscribe_playback(move |status| {
            let _guard = RuntimeGuard::new(runtime_playback.clone());
            let mut view = queue_view;
            view.write().apply_playback(status);
        });
        let runtime_connection = runtime.clone();
        let connection = sync.subscribe_connection(move |state| {
            let _guard = RuntimeGuard::new(runtime_connection.clone());
            let mut view = queue_view;
            view.write().connection = *state;
        });

        live_for_sync.set(Some(LiveSubscriptions {
            queue,
            playback,
            connection,
        }));

        if let Some(session) = services_for_sync.session.as_deref() {
            info!(session, "connecting live queue");
            sync.connect(session);
        }
    });

    let services_for_drop = services.clone();
    use_drop(move || {
        let sync = &services_for_drop.sync;
        if let Some(subscriptions) = live.take() {
            subscriptions.release(sync);
        }
        sync.disconnect();
    });

    // Back/forward feeds the navigation machine.
    let services_for_pop = services.clone();
    use_effect(move || {
        let Some(win) = window() else {
            return;
        };

        let runtime = Runtime::current();
        let nav = services_for_pop.nav.clone();
        let api = services_for_pop.api.clone();

        let pop_cb = Closure::wrap(Box::new(move |e: web_sys::PopStateEvent| {
            let _guard = RuntimeGuard::new(runtime.clone());
            let entry = BrowserHistory::decode_state(&e.state());
            let mut selection = library.peek().selection.clone();
            let action = nav.borrow_mut().handle_pop(entry, &mut selection);
            apply_nav_action(action, selection, &api, library);
        }) as Box<dyn FnMut(_)>);

        if let Err(err) =
            win.add_event_listener_with_callback("popstate", pop_cb.as_ref().unchecked_ref())
        {
            warn!(error = ?err, "could not listen for popstate");
        }
        pop_cb.forget();
    });

    rsx! {
        div { class: "app-shell",
            header { class: "app-header",
                h1 { class: "app-title", "queuebox" }
                if services.session.is_none() {
                    p { class: "app-hint",
                        "Open this page from the link the bot posts to request songs and see the live queue."
                    }
                }
            }
            main { class: "app-body",
                LibraryPane {}
                QueuePanel {}
            }
            ToastHost {}
        }
    }
}
