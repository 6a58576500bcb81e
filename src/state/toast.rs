use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    pub fn display_for(self) -> Duration {
        match self {
            Self::Error => Duration::from_millis(5000),
            Self::Warning => Duration::from_millis(4000),
            Self::Success | Self::Info => Duration::from_millis(3000),
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "check",
            Self::Error => "x",
            Self::Warning => "alert",
            Self::Info => "music",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastStore {
    toasts: Vec<Toast>,
}

impl ToastStore {
    /// Adds a toast and returns its id; dismissal is scheduled by the caller.
    pub fn push(&mut self, kind: ToastKind, message: impl Into<String>) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.toasts.push(Toast {
            id: id.clone(),
            kind,
            message: message.into(),
        });
        id
    }

    pub fn success(&mut self, message: impl Into<String>) -> String {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) -> String {
        self.push(ToastKind::Error, message)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        before != self.toasts.len()
    }

    pub fn clear(&mut self) {
        self.toasts.clear();
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_remove_by_id() {
        let mut store = ToastStore::default();
        let first = store.success("queued");
        let second = store.error("failed");
        assert_ne!(first, second);

        assert!(store.remove(&first));
        assert!(!store.remove(&first));
        assert_eq!(store.toasts().len(), 1);
        assert_eq!(store.toasts()[0].kind, ToastKind::Error);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn errors_linger_longest() {
        assert!(ToastKind::Error.display_for() > ToastKind::Warning.display_for());
        assert!(ToastKind::Warning.display_for() > ToastKind::Success.display_for());
        assert_eq!(ToastKind::Info.display_for(), ToastKind::Success.display_for());
    }
}
