//! Core of the queuebox web client.
//!
//! Everything here is framework-agnostic: the Dioxus shell in `main.rs` wires
//! these pieces to the browser. Browser adapters are only compiled for wasm.

pub mod api;
pub mod config;
pub mod navigation;
pub mod state;
pub mod sync;

pub use config::{AppConfig, SyncConfig};
pub use navigation::{NavAction, NavigationEntry, NavigationMachine, Selection, Stage};
pub use sync::{ConnectionState, PlaybackStatus, QueueItem, QueueSyncClient};
