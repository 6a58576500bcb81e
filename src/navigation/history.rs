use super::entry::NavigationEntry;

/// The browser's session history as seen by the navigation machine. The
/// current entry may be `None` for entries the app did not create.
pub trait HistoryStack {
    fn current(&self) -> Option<NavigationEntry>;
    fn push(&mut self, entry: &NavigationEntry);
    fn replace(&mut self, entry: &NavigationEntry);
}

/// Where the right pane's scroll position lives.
pub trait ScrollSurface {
    fn offset(&self) -> i32;
    /// Applies `offset` on the next paint; the pane may not be laid out yet.
    fn restore_later(&self, offset: i32);
}

/// In-memory history with browser semantics: pushing drops forward entries,
/// and `back`/`forward` return the entry a `popstate` would carry.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<Option<NavigationEntry>>,
    cursor: usize,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self {
            entries: vec![None],
            cursor: 0,
        }
    }
}

impl MemoryHistory {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    /// `None` when already at the oldest entry.
    pub fn back(&mut self) -> Option<Option<NavigationEntry>> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    pub fn forward(&mut self) -> Option<Option<NavigationEntry>> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }
}

impl HistoryStack for MemoryHistory {
    fn current(&self) -> Option<NavigationEntry> {
        self.entries.get(self.cursor).cloned().flatten()
    }

    fn push(&mut self, entry: &NavigationEntry) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(Some(entry.clone()));
        self.cursor = self.entries.len() - 1;
    }

    fn replace(&mut self, entry: &NavigationEntry) {
        if let Some(slot) = self.entries.get_mut(self.cursor) {
            *slot = Some(entry.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_discards_forward_entries() {
        let mut history = MemoryHistory::default();
        history.push(&NavigationEntry::artist("A"));
        history.push(&NavigationEntry::artist("B"));
        history.back();
        history.push(&NavigationEntry::artist("C"));

        assert_eq!(history.len(), 3);
        assert!(history.forward().is_none());
        assert_eq!(history.back(), Some(Some(NavigationEntry::artist("A"))));
        assert_eq!(history.back(), Some(None));
        assert_eq!(history.back(), None);
    }

    #[test]
    fn replace_rewrites_current_only() {
        let mut history = MemoryHistory::default();
        history.push(&NavigationEntry::artist("A"));
        history.replace(&NavigationEntry::artist("A").with_scroll(12));

        assert_eq!(history.len(), 2);
        assert_eq!(history.current().unwrap().scroll_offset, 12);
    }
}
