//! Classifier running mode and stream loop state.

use serde::{Deserialize, Serialize};

/// Operating mode declared to the classifier.
///
/// Classifiers start in single-image mode and must be switched to video mode
/// before frames are submitted continuously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunningMode {
    #[default]
    Image,
    Video,
}

impl RunningMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }
}

/// Whether the stream loop keeps scheduling iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    #[default]
    Stopped,
    Running,
}

impl LoopState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}
