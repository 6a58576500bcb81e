use crate::sync::{ConnectionState, PlaybackStatus, QueueItem};

/// `m:ss`, matching what the bot shows in chat.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// What the queue panel renders, rebuilt from each snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueView {
    pub items: Vec<QueueItem>,
    pub playback: Option<PlaybackStatus>,
    pub connection: ConnectionState,
    pub is_open: bool,
    pub is_skipping: bool,
}

impl QueueView {
    pub fn apply_snapshot(&mut self, items: &[QueueItem]) {
        self.items = items.to_vec();
    }

    pub fn apply_playback(&mut self, status: &PlaybackStatus) {
        self.playback = Some(status.clone());
    }

    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
    }

    pub fn is_live(&self) -> bool {
        self.connection.is_live()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// First item flagged current. The server should flag at most one.
    pub fn current_track(&self) -> Option<&QueueItem> {
        self.items.iter().find(|item| item.is_current)
    }

    pub fn pending(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.iter().filter(|item| !item.is_current)
    }

    pub fn pending_count(&self) -> usize {
        self.pending().count()
    }

    pub fn playback_progress(&self) -> f64 {
        self.playback.as_ref().map_or(0.0, PlaybackStatus::progress)
    }

    pub fn formatted_current_time(&self) -> String {
        self.playback
            .as_ref()
            .map_or_else(|| format_time(0.0), |p| format_time(p.current_time))
    }

    pub fn formatted_total_time(&self) -> String {
        self.playback
            .as_ref()
            .map_or_else(|| format_time(0.0), |p| format_time(p.total_time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn item(title: &str, current: bool) -> QueueItem {
        QueueItem {
            index: 0,
            artist: "A".into(),
            album: "X".into(),
            title: title.into(),
            album_artist: "A".into(),
            is_current: current,
            duration: None,
        }
    }

    #[rstest]
    #[case(0.0, "0:00")]
    #[case(59.9, "0:59")]
    #[case(61.0, "1:01")]
    #[case(3_725.0, "62:05")]
    #[case(-4.0, "0:00")]
    #[case(f64::INFINITY, "0:00")]
    fn formats_minutes_and_seconds(#[case] seconds: f64, #[case] expected: &str) {
        assert_eq!(format_time(seconds), expected);
    }

    #[test]
    fn derives_current_and_pending() {
        let mut view = QueueView::default();
        view.apply_snapshot(&[item("now", true), item("next", false), item("later", false)]);

        assert_eq!(view.current_track().map(|i| i.title.as_str()), Some("now"));
        assert_eq!(view.pending_count(), 2);
        assert!(!view.is_empty());
    }

    #[test]
    fn tolerates_several_current_items() {
        let mut view = QueueView::default();
        view.apply_snapshot(&[item("a", true), item("b", true), item("c", false)]);

        assert_eq!(view.items.len(), 3);
        assert_eq!(view.current_track().map(|i| i.title.as_str()), Some("a"));
        assert_eq!(view.pending_count(), 1);
    }

    #[test]
    fn progress_without_status_or_duration_is_zero() {
        let mut view = QueueView::default();
        assert_eq!(view.playback_progress(), 0.0);
        assert_eq!(view.formatted_total_time(), "0:00");

        view.apply_playback(&PlaybackStatus {
            guild_id: "g".into(),
            is_playing: true,
            current_time: 42.0,
            total_time: 0.0,
        });
        assert_eq!(view.playback_progress(), 0.0);
        assert_eq!(view.formatted_current_time(), "0:42");
    }
}
