//! Payloads pushed to the live display.

use std::path::Path;

use serde::{Deserialize, Serialize};
use signlang_common::error::{SignlangError, SignlangResult};

use crate::recognition::TopCandidate;

/// Live feedback emitted on every completed iteration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiveOutput {
    /// Current top label, empty when no gesture was detected.
    pub label: String,
    /// Confidence of the current label as a percentage in `[0, 100]`.
    pub confidence_percent: u8,
}

impl LiveOutput {
    /// The "nothing detected" output: empty label, zero confidence.
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn from_candidate(candidate: Option<&TopCandidate>) -> Self {
        match candidate {
            Some(top) => Self {
                label: top.label.clone(),
                confidence_percent: top.confidence_percent(),
            },
            None => Self::idle(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.label.is_empty() && self.confidence_percent == 0
    }
}

/// A reference image of one sign, shown while a session is running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignImage {
    pub id: u32,
    /// The symbol the image demonstrates.
    pub label: String,
    /// Where the image can be loaded from.
    pub url: String,
}

/// Ordered set of reference sign images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignCatalogue {
    images: Vec<SignImage>,
}

impl SignCatalogue {
    pub fn new(images: Vec<SignImage>) -> Self {
        Self { images }
    }

    /// One image per letter `A` to `Z`.
    pub fn alphabet() -> Self {
        let images = ('A'..='Z')
            .enumerate()
            .map(|(idx, letter)| SignImage {
                id: idx as u32 + 1,
                label: letter.to_string(),
                url: format!("signs/{}.png", letter.to_ascii_lowercase()),
            })
            .collect();
        Self { images }
    }

    /// Load a catalogue from a JSON array of images.
    pub fn load(path: &Path) -> SignlangResult<Self> {
        if !path.exists() {
            return Err(SignlangError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let catalogue: Self = serde_json::from_str(&content)?;
        if catalogue.is_empty() {
            return Err(SignlangError::config(format!(
                "sign catalogue at {} is empty",
                path.display()
            )));
        }
        Ok(catalogue)
    }

    pub fn get(&self, index: usize) -> Option<&SignImage> {
        self.images.get(index)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl Default for SignCatalogue {
    fn default() -> Self {
        Self::alphabet()
    }
}
