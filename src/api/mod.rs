//! HTTP collaborator for catalog listings and play/skip requests.

mod client;
mod error;

pub use client::MusicApi;
pub use error::ApiError;
