// Catalog browsing and request submission against the bot's HTTP API.

use once_cell::sync::Lazy;
use reqwest::{RequestBuilder, Response};
use tracing::{debug, error};

use super::error::ApiError;

static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(reqwest::Client::new);

const SESSION_HEADER: &str = "guildid";

#[derive(Debug, Clone, PartialEq)]
pub struct MusicApi {
    base_url: String,
}

impl MusicApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn build_url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    pub fn cover_url(&self, artist: &str, album: &str) -> String {
        self.build_url(&["cover", artist, album])
    }

    pub async fn fetch_artists(&self) -> Result<Vec<String>, ApiError> {
        self.fetch_list("artists", &["artist"]).await
    }

    pub async fn fetch_albums(&self, artist: &str) -> Result<Vec<String>, ApiError> {
        self.fetch_list("albums", &["artist", artist]).await
    }

    pub async fn fetch_tracks(&self, artist: &str, album: &str) -> Result<Vec<String>, ApiError> {
        self.fetch_list("tracks", &["artist", artist, album]).await
    }

    pub async fn submit_track_request(
        &self,
        artist: &str,
        album: &str,
        track: &str,
        session: &str,
    ) -> Result<(), ApiError> {
        let url = self.build_url(&["requestplay", artist, album, track]);
        self.submit("track request", url, session).await
    }

    pub async fn submit_youtube_request(&self, video_url: &str, session: &str) -> Result<(), ApiError> {
        let video_url = video_url.trim();
        if video_url.is_empty() {
            return Err(ApiError::MissingField("url"));
        }
        let url = self.build_url(&["youtubeplay", video_url]);
        self.submit("youtube request", url, session).await
    }

    pub async fn submit_skip(&self, session: &str) -> Result<(), ApiError> {
        let url = self.build_url(&["skip"]);
        self.submit("skip", url, session).await
    }

    async fn fetch_list(&self, context: &'static str, segments: &[&str]) -> Result<Vec<String>, ApiError> {
        let url = self.build_url(segments);
        debug!(%url, context, "fetching catalog listing");
        let response = send(context, HTTP_CLIENT.get(&url)).await?;
        let body: serde_json::Value = response.json().await.map_err(|err| {
            error!(context, error = %err, "catalog response was not json");
            ApiError::Http(err)
        })?;
        Ok(string_list(&body))
    }

    async fn submit(&self, context: &'static str, url: String, session: &str) -> Result<(), ApiError> {
        if session.trim().is_empty() {
            return Err(ApiError::MissingField("guildid"));
        }
        debug!(%url, context, "submitting request");
        send(context, HTTP_CLIENT.get(&url).header(SESSION_HEADER, session)).await?;
        Ok(())
    }
}

async fn send(context: &'static str, request: RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await.map_err(|err| {
        error!(context, error = %err, "request failed");
        ApiError::Http(err)
    })?;
    let status = response.status();
    if !status.is_success() {
        error!(context, %status, "request rejected");
        return Err(ApiError::Status {
            context,
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Listings are plain JSON string arrays; anything else reads as empty.
fn string_list(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    serde_json::Value::String(text) => Some(text.clone()),
                    serde_json::Value::Number(number) => Some(number.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
