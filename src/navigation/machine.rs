use thiserror::Error;
use tracing::{debug, warn};

use super::entry::{NavigationEntry, StageTag};
use super::history::{HistoryStack, ScrollSurface};

/// Artist/album selection owned by the library state holder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub artist: Option<String>,
    pub album: Option<String>,
}

impl Selection {
    fn select_artist(&mut self, artist: &str) {
        self.artist = Some(artist.to_string());
        self.album = None;
    }

    fn clear(&mut self) {
        self.artist = None;
        self.album = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Root,
    ArtistSelected(String),
    AlbumSelected(String, String),
}

impl Stage {
    fn entry(&self) -> NavigationEntry {
        match self {
            Stage::Root => NavigationEntry::root(),
            Stage::ArtistSelected(artist) => NavigationEntry::artist(artist),
            Stage::AlbumSelected(artist, album) => NavigationEntry::album(artist, album),
        }
    }
}

/// What the UI has to do after a back/forward step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    /// Album-level entries: forward navigation already loaded the tracks.
    None,
    ResetAll {
        scroll_offset: i32,
    },
    SelectArtist {
        artist: String,
        /// The artist differs from the previous selection; albums must be
        /// fetched again.
        changed: bool,
        scroll_offset: i32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pushed,
    Unchanged,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("cannot select album {album:?} without an artist")]
    NoArtistSelected { album: String },
}

/// Keeps selection, history entries and scroll position in step. Forward
/// selections stamp the scroll offset onto the entry being left and push a
/// new one; `popstate` entries are decoded back into selection changes.
pub struct NavigationMachine<H, S> {
    history: H,
    scroll: S,
    stage: Stage,
}

impl<H: HistoryStack, S: ScrollSurface> NavigationMachine<H, S> {
    pub fn new(history: H, scroll: S) -> Self {
        Self {
            history,
            scroll,
            stage: Stage::Root,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn scroll(&self) -> &S {
        &self.scroll
    }

    pub fn select_artist(
        &mut self,
        artist: &str,
        selection: &mut Selection,
    ) -> Transition {
        if selection.artist.as_deref() == Some(artist) && selection.album.is_none() {
            return Transition::Unchanged;
        }

        self.stamp_current_entry();
        self.history.push(&NavigationEntry::artist(artist));
        selection.select_artist(artist);
        self.stage = Stage::ArtistSelected(artist.to_string());
        debug!(artist, "artist selected");
        Transition::Pushed
    }

    /// Rejected without touching history or selection when no artist is
    /// selected.
    pub fn select_album(
        &mut self,
        album: &str,
        selection: &mut Selection,
    ) -> Result<Transition, NavigationError> {
        let Some(artist) = selection.artist.clone() else {
            warn!(album, "album selected with no artist, ignoring");
            return Err(NavigationError::NoArtistSelected {
                album: album.to_string(),
            });
        };
        if selection.album.as_deref() == Some(album) {
            return Ok(Transition::Unchanged);
        }

        self.stamp_current_entry();
        self.history.push(&NavigationEntry::album(&artist, album));
        selection.album = Some(album.to_string());
        self.stage = Stage::AlbumSelected(artist, album.to_string());
        debug!(album, "album selected");
        Ok(Transition::Pushed)
    }

    /// Handles a back/forward step. `entry` is the state of the entry that
    /// is now current.
    pub fn handle_pop(
        &mut self,
        entry: Option<NavigationEntry>,
        selection: &mut Selection,
    ) -> NavAction {
        let Some(entry) = entry else {
            return self.reset_all(selection, 0);
        };

        match (entry.stage, entry.artist) {
            (None, _) => self.reset_all(selection, entry.scroll_offset),
            (Some(StageTag::ArtistSelected), Some(artist)) => {
                let changed = selection.artist.as_deref() != Some(artist.as_str());
                selection.select_artist(&artist);
                self.stage = Stage::ArtistSelected(artist.clone());
                self.scroll.restore_later(entry.scroll_offset);
                NavAction::SelectArtist {
                    artist,
                    changed,
                    scroll_offset: entry.scroll_offset,
                }
            }
            (Some(StageTag::ArtistSelected), None) => {
                warn!("artist entry without an artist, resetting");
                self.reset_all(selection, entry.scroll_offset)
            }
            (Some(StageTag::AlbumSelected), artist) => {
                // Selection and tracks are left as they are.
                if let (Some(artist), Some(album)) = (artist, entry.album) {
                    self.stage = Stage::AlbumSelected(artist, album);
                }
                NavAction::None
            }
        }
    }

    fn reset_all(&mut self, selection: &mut Selection, scroll_offset: i32) -> NavAction {
        selection.clear();
        self.stage = Stage::Root;
        self.scroll.restore_later(scroll_offset);
        NavAction::ResetAll { scroll_offset }
    }

    fn stamp_current_entry(&mut self) {
        let offset = self.scroll.offset();
        let entry = self
            .history
            .current()
            .unwrap_or_else(|| self.stage.entry())
            .with_scroll(offset);
        self.history.replace(&entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::history::MemoryHistory;
    use assert_matches::assert_matches;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Scroll pane stand-in. Restores are queued until `paint`.
    #[derive(Clone, Default)]
    struct Pane {
        offset: Rc<Cell<i32>>,
        queued: Rc<RefCell<Vec<i32>>>,
    }

    impl Pane {
        fn scroll_to(&self, offset: i32) {
            self.offset.set(offset);
        }

        fn paint(&self) {
            if let Some(last) = self.queued.borrow_mut().drain(..).last() {
                self.offset.set(last);
            }
        }
    }

    impl ScrollSurface for Pane {
        fn offset(&self) -> i32 {
            self.offset.get()
        }

        fn restore_later(&self, offset: i32) {
            self.queued.borrow_mut().push(offset);
        }
    }

    type Machine = NavigationMachine<MemoryHistory, Pane>;

    fn machine() -> (Machine, Pane, Selection) {
        let pane = Pane::default();
        (
            NavigationMachine::new(MemoryHistory::default(), pane.clone()),
            pane,
            Selection::default(),
        )
    }

    fn back(machine: &mut Machine, selection: &mut Selection) -> NavAction {
        let entry = machine.history_mut().back().expect("an entry to go back to");
        machine.handle_pop(entry, selection)
    }

    fn forward(machine: &mut Machine, selection: &mut Selection) -> NavAction {
        let entry = machine.history_mut().forward().expect("an entry to go forward to");
        machine.handle_pop(entry, selection)
    }

    #[test]
    fn back_through_two_artists() {
        let (mut machine, _, mut selection) = machine();
        machine.select_artist("A", &mut selection);
        machine.select_artist("B", &mut selection);
        assert_eq!(machine.history().len(), 3);

        let action = back(&mut machine, &mut selection);
        assert_matches!(action, NavAction::SelectArtist { ref artist, changed: true, .. } if artist == "A");
        assert_eq!(machine.stage(), &Stage::ArtistSelected("A".into()));
        assert_eq!(selection.artist.as_deref(), Some("A"));
        assert_eq!(selection.album, None);

        let action = back(&mut machine, &mut selection);
        assert_matches!(action, NavAction::ResetAll { .. });
        assert_eq!(machine.stage(), &Stage::Root);
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn album_without_artist_is_rejected() {
        let (mut machine, _, mut selection) = machine();
        let result = machine.select_album("X", &mut selection);

        assert_eq!(
            result,
            Err(NavigationError::NoArtistSelected { album: "X".into() })
        );
        assert_eq!(machine.stage(), &Stage::Root);
        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.history().current(), None);
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn artist_scroll_survives_album_detour() {
        let (mut machine, pane, mut selection) = machine();
        machine.select_artist("A", &mut selection);
        pane.scroll_to(437);
        machine.select_album("X", &mut selection).unwrap();
        pane.scroll_to(2_000);

        let action = back(&mut machine, &mut selection);
        assert_matches!(
            action,
            NavAction::SelectArtist { changed: false, scroll_offset: 437, .. }
        );
        // Not applied until the pane has been laid out.
        assert_eq!(pane.offset(), 2_000);
        pane.paint();
        assert_eq!(pane.offset(), 437);
        assert_eq!(selection.album, None);
    }

    #[test]
    fn root_scroll_is_stamped_on_page_load_entry() {
        let (mut machine, pane, mut selection) = machine();
        pane.scroll_to(90);
        machine.select_artist("A", &mut selection);
        pane.scroll_to(0);

        assert_matches!(
            back(&mut machine, &mut selection),
            NavAction::ResetAll { scroll_offset: 90 }
        );
        pane.paint();
        assert_eq!(pane.offset(), 90);
    }

    #[test]
    fn foreign_page_load_entry_resets_to_top() {
        let (mut machine, pane, mut selection) = machine();
        selection.artist = Some("stale".into());
        pane.scroll_to(55);

        assert_eq!(
            machine.handle_pop(None, &mut selection),
            NavAction::ResetAll { scroll_offset: 0 }
        );
        pane.paint();
        assert_eq!(pane.offset(), 0);
        assert_eq!(selection, Selection::default());
    }

    #[test]
    fn album_entries_do_not_touch_selection() {
        let (mut machine, pane, mut selection) = machine();
        machine.select_artist("A", &mut selection);
        machine.select_album("X", &mut selection).unwrap();
        back(&mut machine, &mut selection);
        pane.paint();
        pane.scroll_to(10);

        let action = forward(&mut machine, &mut selection);
        assert_eq!(action, NavAction::None);
        assert_eq!(selection.album, None);
        assert_eq!(machine.stage(), &Stage::AlbumSelected("A".into(), "X".into()));
        pane.paint();
        assert_eq!(pane.offset(), 10);
    }

    #[test]
    fn reselecting_same_artist_is_unchanged() {
        let (mut machine, _, mut selection) = machine();
        machine.select_artist("A", &mut selection);
        assert_eq!(machine.select_artist("A", &mut selection), Transition::Unchanged);
        assert_eq!(machine.history().len(), 2);
    }

    #[test]
    fn switching_album_pushes_and_keeps_artist() {
        let (mut machine, _, mut selection) = machine();
        machine.select_artist("A", &mut selection);
        machine.select_album("X", &mut selection).unwrap();
        assert_eq!(machine.select_album("X", &mut selection), Ok(Transition::Unchanged));
        machine.select_album("Y", &mut selection).unwrap();

        assert_eq!(machine.history().len(), 4);
        assert_eq!(
            machine.history().current(),
            Some(NavigationEntry::album("A", "Y"))
        );
        assert_eq!(selection.artist.as_deref(), Some("A"));
        assert_eq!(selection.album.as_deref(), Some("Y"));
    }

    #[test]
    fn pushed_entry_starts_at_top() {
        let (mut machine, pane, mut selection) = machine();
        pane.scroll_to(300);
        machine.select_artist("A", &mut selection);
        assert_eq!(machine.history().current(), Some(NavigationEntry::artist("A")));
    }
}
