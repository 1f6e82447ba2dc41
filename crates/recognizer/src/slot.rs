//! Load state of the shared classifier.

use serde::Serialize;
use signlang_common::error::{SignlangError, SignlangResult};

use crate::Classifier;

/// Where the classifier is in its asynchronous initialization.
pub enum ClassifierSlot {
    /// A load is in flight.
    Loading,
    /// The classifier is ready for use.
    Ready(Box<dyn Classifier>),
    /// The last load failed; a retry is needed before the stream can start.
    Failed(String),
}

/// Serializable view of a [`ClassifierSlot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Readiness {
    Loading,
    Ready,
    Failed { message: String },
}

impl ClassifierSlot {
    pub fn readiness(&self) -> Readiness {
        match self {
            Self::Loading => Readiness::Loading,
            Self::Ready(_) => Readiness::Ready,
            Self::Failed(message) => Readiness::Failed {
                message: message.clone(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Mark a new load as in flight.
    ///
    /// A ready classifier is never discarded: returns `false` and leaves the
    /// slot untouched in that case.
    pub fn begin_loading(&mut self) -> bool {
        if self.is_ready() {
            return false;
        }
        *self = Self::Loading;
        true
    }

    /// Record the outcome of a load.
    pub fn install(&mut self, outcome: SignlangResult<Box<dyn Classifier>>) {
        match outcome {
            Ok(classifier) => {
                tracing::info!(classifier = %classifier.name(), "Gesture classifier loaded");
                *self = Self::Ready(classifier);
            }
            Err(e) => {
                tracing::error!(error = %e, "Error loading gesture classifier");
                *self = Self::Failed(e.to_string());
            }
        }
    }

    /// Error to surface when a control is used before the classifier is ready.
    pub fn ensure_ready(&self) -> SignlangResult<()> {
        match self {
            Self::Ready(_) => Ok(()),
            Self::Loading => Err(SignlangError::not_ready(
                "please wait for the gesture recognizer to load",
            )),
            Self::Failed(message) => Err(SignlangError::initialization(message.clone())),
        }
    }

    pub fn classifier_mut(&mut self) -> Option<&mut dyn Classifier> {
        match self {
            Self::Ready(classifier) => Some(classifier.as_mut()),
            _ => None,
        }
    }
}

impl Default for ClassifierSlot {
    fn default() -> Self {
        Self::Loading
    }
}

impl std::fmt::Debug for ClassifierSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => f.write_str("Loading"),
            Self::Ready(classifier) => f.debug_tuple("Ready").field(&classifier.name()).finish(),
            Self::Failed(message) => f.debug_tuple("Failed").field(message).finish(),
        }
    }
}
