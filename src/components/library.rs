use dioxus::prelude::*;
use queuebox::api::MusicApi;
use queuebox::navigation::Transition;
use queuebox::state::{LibraryState, RequestKind, ToastKind, ToastStore};
use tracing::debug;

use crate::components::{push_toast, Icon, Services};

pub(crate) fn load_albums(api: MusicApi, mut library: Signal<LibraryState>, artist: String) {
    library.write().begin_albums();
    spawn(async move {
        let result = api.fetch_albums(&artist).await.map_err(|err| err.user_message());
        if !library.write().finish_albums(&artist, result) {
            debug!(artist, "discarding album listing for a previous selection");
        }
    });
}

fn load_tracks(api: MusicApi, mut library: Signal<LibraryState>, artist: String, album: String) {
    library.write().begin_tracks();
    spawn(async move {
        let result = api
            .fetch_tracks(&artist, &album)
            .await
            .map_err(|err| err.user_message());
        if !library.write().finish_tracks(&artist, &album, result) {
            debug!(artist, album, "discarding track listing for a previous selection");
        }
    });
}

fn choose_artist(services: &Services, mut library: Signal<LibraryState>, artist: &str) {
    let mut selection = library.peek().selection.clone();
    let transition = services.nav.borrow_mut().select_artist(artist, &mut selection);
    if transition == Transition::Pushed {
        library.write().selection = selection;
        load_albums(services.api.clone(), library, artist.to_string());
    }
}

fn choose_album(
    services: &Services,
    mut library: Signal<LibraryState>,
    toasts: Signal<ToastStore>,
    album: &str,
) {
    let mut selection = library.peek().selection.clone();
    let result = services.nav.borrow_mut().select_album(album, &mut selection);
    match result {
        Ok(Transition::Pushed) => {
            let artist = selection.artist.clone().unwrap_or_default();
            library.write().selection = selection;
            load_tracks(services.api.clone(), library, artist, album.to_string());
        }
        Ok(Transition::Unchanged) => {}
        Err(_) => push_toast(toasts, ToastKind::Warning, "Pick an artist first"),
    }
}

fn request_track(
    services: Services,
    mut library: Signal<LibraryState>,
    toasts: Signal<ToastStore>,
    artist: String,
    album: String,
    track: String,
) {
    if !library.write().begin_request(RequestKind::Track) {
        return;
    }
    spawn(async move {
        let session = services.session.clone().unwrap_or_default();
        match services
            .api
            .submit_track_request(&artist, &album, &track, &session)
            .await
        {
            Ok(()) => push_toast(toasts, ToastKind::Success, format!("Requested \"{track}\"")),
            Err(err) => push_toast(toasts, ToastKind::Error, err.user_message()),
        }
        library.write().finish_request(RequestKind::Track);
    });
}

#[component]
pub fn LibraryPane() -> Element {
    let services = use_context::<Services>();
    let mut library = use_context::<Signal<LibraryState>>();
    let toasts = use_context::<Signal<ToastStore>>();
    let mut video_url = use_signal(String::new);

    let api = services.api.clone();
    use_hook(move || {
        spawn(async move {
            match api.fetch_artists().await {
                Ok(artists) => library.write().artists = artists,
                Err(err) => library.write().error = Some(err.user_message()),
            }
        });
    });

    let state = library.read().clone();
    let selected_artist = state.selection.artist.clone();
    let selected_album = state.selection.album.clone();
    let requesting_track = state.is_requesting(RequestKind::Track);
    let requesting_youtube = state.is_requesting(RequestKind::Youtube);

    let on_youtube = {
        let services = services.clone();
        move |_| {
            if !library.write().begin_request(RequestKind::Youtube) {
                return;
            }
            let url = video_url().trim().to_string();
            let services = services.clone();
            spawn(async move {
                let session = services.session.clone().unwrap_or_default();
                match services.api.submit_youtube_request(&url, &session).await {
                    Ok(()) => {
                        video_url.set(String::new());
                        push_toast(toasts, ToastKind::Success, "Video requested");
                    }
                    Err(err) => push_toast(toasts, ToastKind::Error, err.user_message()),
                }
                library.write().finish_request(RequestKind::Youtube);
            });
        }
    };

    rsx! {
        div { class: "library",
            nav { class: "left-pane",
                h2 { class: "pane-title", "Artists" }
                ul { class: "artist-list",
                    for artist in state.artists.clone() {
                        {
                            let services = services.clone();
                            let is_selected = selected_artist.as_deref() == Some(artist.as_str());
                            let name = artist.clone();
                            rsx! {
                                li { key: "{artist}",
                                    button {
                                        class: if is_selected { "artist-row artist-row--selected" } else { "artist-row" },
                                        onclick: move |_| choose_artist(&services, library, &name),
                                        "{artist}"
                                    }
                                }
                            }
                        }
                    }
                }
            }

            section { class: "right-pane",
                div { class: "youtube-request",
                    input {
                        class: "youtube-input",
                        r#type: "url",
                        placeholder: "YouTube URL",
                        value: "{video_url}",
                        oninput: move |evt| video_url.set(evt.value()),
                    }
                    button {
                        class: "youtube-submit",
                        disabled: requesting_youtube,
                        onclick: on_youtube,
                        Icon { name: "plus".to_string(), class: "w-4 h-4".to_string() }
                        "Request"
                    }
                }

                if let Some(ref message) = state.error {
                    p { class: "library-error", "{message}" }
                }

                if state.is_loading {
                    div { class: "library-loading",
                        Icon {
                            name: "loader".to_string(),
                            class: "w-8 h-8".to_string(),
                        }
                    }
                }

                {
                    match (selected_artist.clone(), selected_album.clone()) {
                        (Some(artist), Some(album)) => rsx! {
                            div { class: "track-list",
                                header { class: "track-list-header",
                                    img {
                                        class: "cover cover--large",
                                        src: "{services.api.cover_url(&artist, &album)}",
                                        alt: "{album}",
                                    }
                                    div {
                                        h2 { class: "pane-title", "{album}" }
                                        p { class: "pane-subtitle", "{artist}" }
                                    }
                                }
                                ol {
                                    for track in state.tracks.clone() {
                                        {
                                            let services = services.clone();
                                            let artist = artist.clone();
                                            let album = album.clone();
                                            let title = track.clone();
                                            rsx! {
                                                li { key: "{track}", class: "track-row",
                                                    span { class: "track-title", "{track}" }
                                                    button {
                                                        class: "track-request",
                                                        disabled: requesting_track,
                                                        onclick: move |_| {
                                                            request_track(
                                                                services.clone(),
                                                                library,
                                                                toasts,
                                                                artist.clone(),
                                                                album.clone(),
                                                                title.clone(),
                                                            )
                                                        },
                                                        Icon { name: "plus".to_string(), class: "w-4 h-4".to_string() }
                                                    }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        (Some(artist), None) => rsx! {
                            div { class: "album-grid",
                                for album in state.albums.clone() {
                                    {
                                        let services = services.clone();
                                        let cover = services.api.cover_url(&artist, &album);
                                        let name = album.clone();
                                        rsx! {
                                            button {
                                                key: "{album}",
                                                class: "album-card",
                                                onclick: move |_| choose_album(&services, library, toasts, &name),
                                                img { class: "cover", src: "{cover}", alt: "{album}", loading: "lazy" }
                                                span { class: "album-title", "{album}" }
                                            }
                                        }
                                    }
                                }
                            }
                        },
                        _ => rsx! {
                            div { class: "library-empty",
                                Icon { name: "music".to_string(), class: "w-16 h-16".to_string() }
                                p { "Choose an artist to browse albums" }
                            }
                        },
                    }
                }
            }
        }
    }
}
