use serde::{Deserialize, Serialize};

/// Where the video comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerSource {
    /// A bundled asset, identified by its name and file extension
    Local { filename: String, file_type: String },
    /// A remote URL
    External { url: String },
}

impl PlayerSource {
    pub fn local(filename: impl Into<String>, file_type: impl Into<String>) -> Self {
        Self::Local {
            filename: filename.into(),
            file_type: file_type.into(),
        }
    }

    pub fn external(url: impl Into<String>) -> Self {
        Self::External { url: url.into() }
    }

    /// Short label used in logs and error messages
    pub fn describe(&self) -> String {
        match self {
            Self::Local {
                filename,
                file_type,
            } => format!("{}.{}", filename, file_type),
            Self::External { url } => url.clone(),
        }
    }
}

/// Static metadata shown around the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerModel {
    pub source: PlayerSource,
    pub video_title: String,
    pub video_id: String,
    pub channel_name: String,
    pub channel_id: String,
    pub auto_play_next: bool,
    pub thumbnail_url: String,
    pub more_videos_urls: Vec<String>,
}

impl PlayerModel {
    /// Placeholder used once the source failed to resolve
    pub fn empty() -> Self {
        Self {
            source: PlayerSource::external(""),
            video_title: String::new(),
            video_id: String::new(),
            channel_name: String::new(),
            channel_id: String::new(),
            auto_play_next: false,
            thumbnail_url: String::new(),
            more_videos_urls: Vec::new(),
        }
    }

    /// Related thumbnails followed by our own, at most three
    pub fn more_videos_stack(&self) -> Vec<String> {
        self.more_videos_urls
            .iter()
            .chain(std::iter::once(&self.thumbnail_url))
            .take(3)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_with_related(related: &[&str]) -> PlayerModel {
        PlayerModel {
            thumbnail_url: "thumb".to_string(),
            more_videos_urls: related.iter().map(|s| s.to_string()).collect(),
            ..PlayerModel::empty()
        }
    }

    #[test]
    fn test_more_videos_stack_appends_thumbnail() {
        let model = model_with_related(&["a"]);
        assert_eq!(model.more_videos_stack(), vec!["a", "thumb"]);
    }

    #[test]
    fn test_more_videos_stack_truncates() {
        let model = model_with_related(&["a", "b", "c", "d"]);
        assert_eq!(model.more_videos_stack(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_source_describe() {
        assert_eq!(PlayerSource::local("intro", "mp4").describe(), "intro.mp4");
        assert_eq!(
            PlayerSource::external("https://example.com/v.m3u8").describe(),
            "https://example.com/v.m3u8"
        );
    }
}
