use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VideoPlayerError {
    /// No playable URL could be derived from the given source
    #[error("Source not found: {0}")]
    SourceNotFound(String),
}

impl VideoPlayerError {
    /// Text shown by the static error view
    pub fn user_message(&self) -> &'static str {
        match self {
            VideoPlayerError::SourceNotFound(_) => {
                "Please check your network connection and try again."
            }
        }
    }
}
