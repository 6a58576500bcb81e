use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StageTag {
    ArtistSelected,
    AlbumSelected,
}

/// What the browser keeps in `history.state` for each entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<StageTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,
    /// Older builds of the client stored this as `rightScroll`, straight
    /// from `scrollTop`, so it may be fractional.
    #[serde(default, alias = "rightScroll", deserialize_with = "pixel_offset")]
    pub scroll_offset: i32,
}

fn pixel_offset<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let raw = Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0);
    if !raw.is_finite() {
        return Ok(0);
    }
    Ok(raw.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
}

impl NavigationEntry {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn artist(artist: &str) -> Self {
        Self {
            stage: Some(StageTag::ArtistSelected),
            artist: Some(artist.to_string()),
            ..Self::default()
        }
    }

    pub fn album(artist: &str, album: &str) -> Self {
        Self {
            stage: Some(StageTag::AlbumSelected),
            artist: Some(artist.to_string()),
            album: Some(album.to_string()),
            scroll_offset: 0,
        }
    }

    pub fn with_scroll(mut self, offset: i32) -> Self {
        self.scroll_offset = offset;
        self
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Entries this client did not write decode as `None`.
    pub fn decode(raw: &str) -> Option<Self> {
        match serde_json::from_str(raw) {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "ignoring unrecognised history entry");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_stage_in_camel_case() {
        let raw = NavigationEntry::album("A", "X").with_scroll(40).encode();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "stage": "albumSelected",
                "artist": "A",
                "album": "X",
                "scrollOffset": 40
            })
        );
    }

    #[test]
    fn root_entry_is_minimal() {
        assert_eq!(NavigationEntry::root().encode(), r#"{"scrollOffset":0}"#);
    }

    #[test]
    fn accepts_legacy_scroll_key() {
        let entry =
            NavigationEntry::decode(r#"{"stage":"artistSelected","artist":"A","rightScroll":310}"#)
                .unwrap();
        assert_eq!(entry, NavigationEntry::artist("A").with_scroll(310));
    }

    #[test]
    fn fractional_legacy_offset_is_rounded() {
        let entry = NavigationEntry::decode(
            r#"{"stage":"artistSelected","artist":"A","rightScroll":310.5}"#,
        );
        assert_eq!(entry, Some(NavigationEntry::artist("A").with_scroll(311)));

        let entry = NavigationEntry::decode(r#"{"scrollOffset":12.2}"#);
        assert_eq!(entry, Some(NavigationEntry::root().with_scroll(12)));
    }

    #[test]
    fn null_or_huge_offsets_do_not_drop_the_entry() {
        let entry = NavigationEntry::decode(
            r#"{"stage":"artistSelected","artist":"A","rightScroll":null}"#,
        );
        assert_eq!(entry, Some(NavigationEntry::artist("A")));

        let entry = NavigationEntry::decode(r#"{"scrollOffset":1e12}"#);
        assert_eq!(entry.map(|e| e.scroll_offset), Some(i32::MAX));
    }

    #[test]
    fn unknown_stage_is_rejected() {
        assert!(NavigationEntry::decode(r#"{"stage":"trackSelected"}"#).is_none());
        assert!(NavigationEntry::decode("null").is_none());
    }
}
