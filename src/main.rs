#[cfg(target_arch = "wasm32")]
use dioxus::prelude::*;

#[cfg(target_arch = "wasm32")]
mod components;

#[cfg(target_arch = "wasm32")]
const APP_CSS: Asset = asset!("/assets/styling/app.css");

#[cfg(target_arch = "wasm32")]
fn main() {
    // Fails only if a subscriber is already installed.
    let _ = dioxus::logger::init(tracing::Level::INFO);
    dioxus::launch(App);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    println!("queuebox runs in the browser; serve it with `dx serve --platform web`.");
}

#[cfg(target_arch = "wasm32")]
#[component]
fn App() -> Element {
    rsx! {
        document::Title { "queuebox" }
        document::Meta { name: "viewport", content: "width=device-width, initial-scale=1" }
        document::Meta { name: "theme-color", content: "#a38449" }
        document::Stylesheet { href: APP_CSS }

        components::AppShell {}
    }
}
