/// Result alias that carries the custom [`PanelError`] type.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Common error type for the core crate.
///
/// The device state operations themselves are total and never fail; this
/// type covers configuration loading and the audio backend seam, whose
/// failures the feedback layer absorbs locally.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// Free-form error used by callers that only need a readable message.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// An audio backend call failed for a single named channel.
    #[error("audio channel `{channel}`: {reason}")]
    Audio {
        channel: &'static str,
        reason: String,
    },
}

impl PanelError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    /// Creates an audio backend failure for the named channel.
    pub fn audio<T: Into<String>>(channel: &'static str, reason: T) -> Self {
        Self::Audio {
            channel,
            reason: reason.into(),
        }
    }
}

impl From<&str> for PanelError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for PanelError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
