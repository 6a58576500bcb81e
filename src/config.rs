use std::time::Duration;

const DEFAULT_API_URL: &str = "https://msbot-api.home.hinasense.jp";
const DEFAULT_WS_URL: &str = "wss://msbot-api.home.hinasense.jp";
const SESSION_PARAM: &str = "guildid";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub ws_url: String,
    pub sync: SyncConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: option_env!("QUEUEBOX_API_URL")
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            ws_url: option_env!("QUEUEBOX_WS_URL")
                .unwrap_or(DEFAULT_WS_URL)
                .trim_end_matches('/')
                .to_string(),
            sync: SyncConfig::default(),
        }
    }
}

/// Timing policy for the live queue connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    pub heartbeat_interval: Duration,
    /// Flat delay before each reconnect attempt. There is no backoff.
    pub reconnect_delay: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(5),
        }
    }
}

impl SyncConfig {
    pub fn endpoint(ws_url: &str, session: &str) -> String {
        format!(
            "{}?{}={}",
            ws_url.trim_end_matches('/'),
            SESSION_PARAM,
            urlencoding::encode(session)
        )
    }
}

/// Pulls the guild/session id out of a `location.search` string.
pub fn session_from_query(search: &str) -> Option<String> {
    let query = search.trim_start_matches('?');
    for pair in query.split('&') {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key != SESSION_PARAM {
            continue;
        }
        let value = value.replace('+', " ");
        let decoded = urlencoding::decode(&value)
            .map(|v| v.into_owned())
            .unwrap_or(value);
        let trimmed = decoded.trim();
        if trimmed.is_empty() {
            return None;
        }
        return Some(trimmed.to_string());
    }
    None
}
