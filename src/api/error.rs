use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{context} failed with status {status}")]
    Status { context: &'static str, status: u16 },
    #[error("missing {0}")]
    MissingField(&'static str),
}

impl ApiError {
    /// Short text suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) => "Could not reach the music bot".to_string(),
            Self::Status { context, status } => format!("The bot rejected the {context} ({status})"),
            Self::MissingField("guildid") => "No server selected: open this page from the bot's link".to_string(),
            Self::MissingField(field) => format!("Missing {field}"),
        }
    }
}
