//! Signlang recognizer contracts.
//!
//! Everything the stream engine talks to but does not own is a trait here:
//!
//! - [`FrameSource`]: yields the most recent camera frame on demand
//! - [`Classifier`]: the black-box gesture model
//! - [`ClassifierLoader`]: builds a classifier asynchronously, ahead of use
//! - [`OverlayRenderer`]: draws hand skeletons over the video
//! - [`DisplaySink`]: shows live output, the formed word, and reference images
//!
//! The [`stub`] module provides scripted implementations for tests and
//! offline replay.

pub mod options;
pub mod slot;
pub mod stub;

use signlang_common::error::SignlangResult;
use signlang_gesture_model::{
    Frame, HandLandmarks, LiveOutput, RecognitionResult, RunningMode, SignImage,
};

pub use options::RecognizerOptions;
pub use slot::{ClassifierSlot, Readiness};

/// Source of live video frames.
pub trait FrameSource: Send {
    /// The most recent frame, or `None` if the device has not produced one yet.
    ///
    /// Sources never queue frames; a frame that was not pulled is lost.
    fn current_frame(&mut self) -> SignlangResult<Option<Frame>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Gesture classifier.
pub trait Classifier: Send {
    /// Declare the operating mode. Must be called with [`RunningMode::Video`]
    /// before frames are submitted continuously.
    fn set_mode(&mut self, mode: RunningMode) -> SignlangResult<()>;

    /// Classify one frame. `timestamp_ms` must increase strictly between calls
    /// in video mode.
    fn classify(&mut self, frame: &Frame, timestamp_ms: u64) -> SignlangResult<RecognitionResult>;

    /// Classifier name for logging.
    fn name(&self) -> &str;
}

/// Asynchronous classifier construction.
#[async_trait::async_trait]
pub trait ClassifierLoader: Send + Sync {
    /// Load the model and build a classifier configured with `options`.
    async fn load(&self, options: &RecognizerOptions) -> SignlangResult<Box<dyn Classifier>>;

    /// Loader name for logging.
    fn name(&self) -> &str;
}

/// Hand-skeleton overlay drawn over the video.
pub trait OverlayRenderer: Send {
    /// Clear the overlay and resize it to the frame.
    fn clear(&mut self, _width: u32, _height: u32) {}

    /// Draw the landmarks of every detected hand.
    fn draw_landmarks(&mut self, hands: &[HandLandmarks]);
}

/// Caller-facing display surfaces.
pub trait DisplaySink: Send {
    /// Current label and confidence. Called on every completed iteration.
    fn show_live(&mut self, output: &LiveOutput);

    /// The accumulated word, after every change.
    fn show_word(&mut self, word: &str);

    /// The decorative reference image, `None` to clear it.
    fn show_image(&mut self, image: Option<&SignImage>);
}
