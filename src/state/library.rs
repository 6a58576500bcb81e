use crate::navigation::Selection;

/// Play requests that may be in flight at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Track,
    Youtube,
}

/// Catalog listings plus the current artist/album selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LibraryState {
    pub artists: Vec<String>,
    pub albums: Vec<String>,
    pub tracks: Vec<String>,
    pub selection: Selection,
    pub is_loading: bool,
    pub error: Option<String>,
    requesting_track: bool,
    requesting_youtube: bool,
}

impl LibraryState {
    fn request_flag(&mut self, kind: RequestKind) -> &mut bool {
        match kind {
            RequestKind::Track => &mut self.requesting_track,
            RequestKind::Youtube => &mut self.requesting_youtube,
        }
    }

    pub fn is_requesting(&self, kind: RequestKind) -> bool {
        match kind {
            RequestKind::Track => self.requesting_track,
            RequestKind::Youtube => self.requesting_youtube,
        }
    }

    /// Marks a request of `kind` as in flight. Returns `false` if one
    /// already is, in which case the caller must not submit.
    pub fn begin_request(&mut self, kind: RequestKind) -> bool {
        let flag = self.request_flag(kind);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }

    pub fn finish_request(&mut self, kind: RequestKind) {
        *self.request_flag(kind) = false;
    }

    /// Clears listings that no longer match the selection.
    pub fn sync_listings(&mut self) {
        if self.selection.artist.is_none() {
            self.albums.clear();
        }
        if self.selection.album.is_none() {
            self.tracks.clear();
        }
    }

    pub fn begin_albums(&mut self) {
        self.albums.clear();
        self.tracks.clear();
        self.is_loading = true;
        self.error = None;
    }

    pub fn begin_tracks(&mut self) {
        self.tracks.clear();
        self.is_loading = true;
        self.error = None;
    }

    /// Applies a listing only if it still belongs to the selected artist.
    pub fn finish_albums(&mut self, artist: &str, result: Result<Vec<String>, String>) -> bool {
        if self.selection.artist.as_deref() != Some(artist) {
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(albums) => self.albums = albums,
            Err(message) => self.error = Some(message),
        }
        true
    }

    pub fn finish_tracks(
        &mut self,
        artist: &str,
        album: &str,
        result: Result<Vec<String>, String>,
    ) -> bool {
        if self.selection.artist.as_deref() != Some(artist)
            || self.selection.album.as_deref() != Some(album)
        {
            return false;
        }
        self.is_loading = false;
        match result {
            Ok(tracks) => self.tracks = tracks,
            Err(message) => self.error = Some(message),
        }
        true
    }
}
