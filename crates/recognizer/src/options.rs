//! Classifier construction options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use signlang_common::config::RecognizerConfig;
use signlang_gesture_model::RunningMode;

/// Options handed to a [`crate::ClassifierLoader`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognizerOptions {
    /// Model asset to load.
    pub model_asset_path: PathBuf,
    /// Maximum number of hands tracked concurrently.
    pub num_hands: u32,
    /// Mode the classifier starts in.
    pub running_mode: RunningMode,
}

impl RecognizerOptions {
    pub fn from_config(config: &RecognizerConfig) -> Self {
        Self {
            model_asset_path: config.model_asset_path.clone(),
            num_hands: config.num_hands,
            running_mode: RunningMode::Image,
        }
    }
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Self::from_config(&RecognizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_start_in_image_mode_with_two_hands() {
        let options = RecognizerOptions::default();
        assert_eq!(options.running_mode, RunningMode::Image);
        assert_eq!(options.num_hands, 2);
    }
}
