//! Wire format of the live queue socket. Messages are JSON text frames.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    pub index: u32,
    pub artist: String,
    pub album: String,
    pub title: String,
    #[serde(default)]
    pub album_artist: String,
    #[serde(default)]
    pub is_current: bool,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackStatus {
    #[serde(default, alias = "guildid")]
    pub guild_id: String,
    #[serde(default)]
    pub is_playing: bool,
    /// Seconds.
    #[serde(default)]
    pub current_time: f64,
    /// Seconds; 0 when the duration is unknown.
    #[serde(default)]
    pub total_time: f64,
}

impl PlaybackStatus {
    /// Percentage in `0.0..=100.0`. Unknown duration reads as 0.
    pub fn progress(&self) -> f64 {
        if !self.total_time.is_finite() || self.total_time <= 0.0 {
            return 0.0;
        }
        let current = if self.current_time.is_finite() {
            self.current_time.max(0.0)
        } else {
            0.0
        };
        (current / self.total_time * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageKind {
    Queue,
    Ping,
    Pong,
    PlaybackUpdate,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Full replacement of the queue, never a delta.
    #[serde(default)]
    pub data: Option<Vec<QueueItem>>,
    #[serde(default)]
    pub playback_status: Option<PlaybackStatus>,
}

impl InboundMessage {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The queue snapshot this message carries, if any.
    pub fn queue_snapshot(&self) -> Option<&[QueueItem]> {
        match self.kind {
            MessageKind::Queue => self.data.as_deref(),
            _ => None,
        }
    }

    /// Playback status is honored on `queue` and `playbackUpdate` frames only.
    pub fn playback(&self) -> Option<&PlaybackStatus> {
        match self.kind {
            MessageKind::Queue | MessageKind::PlaybackUpdate => self.playback_status.as_ref(),
            MessageKind::Ping | MessageKind::Pong => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    Ping,
}

impl OutboundMessage {
    pub fn to_text(self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self)
    }
}
