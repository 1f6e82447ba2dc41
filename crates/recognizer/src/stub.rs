//! Stub collaborators for testing and offline replay.
//!
//! None of these touch a camera or a model. The scripted classifier plays back
//! recorded [`RecognitionResult`]s, and the recording sinks keep everything
//! they were shown behind a shared handle so tests can inspect it after the
//! boxed value has been moved into the engine.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use signlang_common::clock::SessionClock;
use signlang_common::error::{SignlangError, SignlangResult};
use signlang_gesture_model::{
    Frame, HandLandmarks, LiveOutput, RecognitionResult, RunningMode, SignImage,
};

use crate::{
    Classifier, ClassifierLoader, DisplaySink, FrameSource, OverlayRenderer, RecognizerOptions,
};

fn lock<T>(shared: &Mutex<T>) -> MutexGuard<'_, T> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// One scripted classifier response.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Emit(RecognitionResult),
    Fail(String),
}

impl ScriptStep {
    /// Shorthand for a single-hand result with one candidate.
    pub fn gesture(label: &str, score: f32) -> Self {
        Self::Emit(RecognitionResult::single(label, score))
    }

    pub fn nothing() -> Self {
        Self::Emit(RecognitionResult::empty())
    }
}

/// Calls observed by a [`ScriptedClassifier`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierCalls {
    /// Every `set_mode` argument, in order.
    pub mode_changes: Vec<RunningMode>,
    /// Every timestamp passed to `classify`, in order.
    pub timestamps: Vec<u64>,
}

/// Shared view of a scripted classifier's calls.
#[derive(Debug, Clone, Default)]
pub struct ClassifierProbe(Arc<Mutex<ClassifierCalls>>);

impl ClassifierProbe {
    pub fn calls(&self) -> ClassifierCalls {
        lock(&self.0).clone()
    }
}

/// Classifier that replays a fixed script.
///
/// Like a real video-mode classifier it rejects frames until it has been
/// switched to [`RunningMode::Video`]. Once the script is exhausted it
/// returns empty results, unless it was built with [`Self::looping`].
pub struct ScriptedClassifier {
    script: Vec<ScriptStep>,
    pending: VecDeque<ScriptStep>,
    repeat: bool,
    mode: RunningMode,
    mode_failures: u32,
    probe: ClassifierProbe,
}

impl ScriptedClassifier {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            pending: script.iter().cloned().collect(),
            script,
            repeat: false,
            mode: RunningMode::Image,
            mode_failures: 0,
            probe: ClassifierProbe::default(),
        }
    }

    /// Replay the script forever.
    pub fn looping(script: Vec<ScriptStep>) -> Self {
        Self {
            repeat: true,
            ..Self::new(script)
        }
    }

    pub fn with_probe(mut self, probe: ClassifierProbe) -> Self {
        self.probe = probe;
        self
    }

    /// Reject the next `calls` mode changes, leaving the mode untouched.
    pub fn rejecting_mode_changes(mut self, calls: u32) -> Self {
        self.mode_failures = calls;
        self
    }

    pub fn probe(&self) -> ClassifierProbe {
        self.probe.clone()
    }

    fn next_step(&mut self) -> Option<ScriptStep> {
        if self.pending.is_empty() && self.repeat {
            self.pending.extend(self.script.iter().cloned());
        }
        self.pending.pop_front()
    }
}

impl Classifier for ScriptedClassifier {
    fn set_mode(&mut self, mode: RunningMode) -> SignlangResult<()> {
        lock(&self.probe.0).mode_changes.push(mode);
        if self.mode_failures > 0 {
            self.mode_failures -= 1;
            return Err(SignlangError::classification(format!(
                "classifier rejected switch to {} mode",
                mode.as_str()
            )));
        }
        self.mode = mode;
        Ok(())
    }

    fn classify(&mut self, _frame: &Frame, timestamp_ms: u64) -> SignlangResult<RecognitionResult> {
        if self.mode != RunningMode::Video {
            return Err(SignlangError::classification(
                "classifier must be switched to video mode before streaming",
            ));
        }
        lock(&self.probe.0).timestamps.push(timestamp_ms);

        match self.next_step() {
            Some(ScriptStep::Emit(result)) => Ok(result),
            Some(ScriptStep::Fail(message)) => Err(SignlangError::classification(message)),
            None => Ok(RecognitionResult::empty()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Loader that builds a [`ScriptedClassifier`] after an optional delay, or
/// fails with a fixed message.
pub struct ScriptedLoader {
    script: Vec<ScriptStep>,
    repeat: bool,
    delay: Duration,
    failure: Option<String>,
    probe: ClassifierProbe,
}

impl ScriptedLoader {
    pub fn new(script: Vec<ScriptStep>) -> Self {
        Self {
            script,
            repeat: false,
            delay: Duration::ZERO,
            failure: None,
            probe: ClassifierProbe::default(),
        }
    }

    pub fn looping(script: Vec<ScriptStep>) -> Self {
        Self {
            repeat: true,
            ..Self::new(script)
        }
    }

    /// A loader whose every attempt fails.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::new(Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Probe shared with every classifier this loader builds.
    pub fn probe(&self) -> ClassifierProbe {
        self.probe.clone()
    }
}

#[async_trait::async_trait]
impl ClassifierLoader for ScriptedLoader {
    async fn load(&self, options: &RecognizerOptions) -> SignlangResult<Box<dyn Classifier>> {
        tracing::debug!(
            model = %options.model_asset_path.display(),
            num_hands = options.num_hands,
            "Loading scripted classifier"
        );
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(SignlangError::initialization(message.clone()));
        }

        let classifier = if self.repeat {
            ScriptedClassifier::looping(self.script.clone())
        } else {
            ScriptedClassifier::new(self.script.clone())
        };
        Ok(Box::new(classifier.with_probe(self.probe.clone())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Frame source producing blank frames stamped from a monotonic clock.
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    clock: SessionClock,
    warmup_polls: u32,
    error_polls: u32,
}

impl SyntheticFrameSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clock: SessionClock::start(),
            warmup_polls: 0,
            error_polls: 0,
        }
    }

    /// Report "no frame yet" for the first `polls` requests, like a camera
    /// that is still opening.
    pub fn warming_up(mut self, polls: u32) -> Self {
        self.warmup_polls = polls;
        self
    }

    /// Fail the `polls` requests after warm-up, like a device that dropped
    /// off the bus and came back.
    pub fn with_device_errors(mut self, polls: u32) -> Self {
        self.error_polls = polls;
        self
    }
}

impl FrameSource for SyntheticFrameSource {
    fn current_frame(&mut self) -> SignlangResult<Option<Frame>> {
        if self.warmup_polls > 0 {
            self.warmup_polls -= 1;
            return Ok(None);
        }
        if self.error_polls > 0 {
            self.error_polls -= 1;
            return Err(SignlangError::frame_source("camera read failed"));
        }
        Ok(Some(Frame::blank(
            self.width,
            self.height,
            self.clock.elapsed_ms(),
        )))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Overlay that draws nothing.
#[derive(Debug, Default)]
pub struct NullOverlay;

impl OverlayRenderer for NullOverlay {
    fn draw_landmarks(&mut self, _hands: &[HandLandmarks]) {}
}

/// Overlay calls observed by a [`RecordingOverlay`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayLog {
    pub clears: usize,
    /// Number of hands in each draw call.
    pub draws: Vec<usize>,
}

/// Overlay that records what it was asked to draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingOverlay(Arc<Mutex<OverlayLog>>);

impl RecordingOverlay {
    pub fn log(&self) -> OverlayLog {
        lock(&self.0).clone()
    }
}

impl OverlayRenderer for RecordingOverlay {
    fn clear(&mut self, _width: u32, _height: u32) {
        lock(&self.0).clears += 1;
    }

    fn draw_landmarks(&mut self, hands: &[HandLandmarks]) {
        lock(&self.0).draws.push(hands.len());
    }
}

/// Display output observed by a [`RecordingDisplay`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayLog {
    pub live: Vec<LiveOutput>,
    pub words: Vec<String>,
    pub images: Vec<Option<SignImage>>,
}

impl DisplayLog {
    pub fn last_live(&self) -> Option<&LiveOutput> {
        self.live.last()
    }

    pub fn last_word(&self) -> Option<&str> {
        self.words.last().map(String::as_str)
    }

    pub fn last_image(&self) -> Option<&SignImage> {
        self.images.last().and_then(Option::as_ref)
    }
}

/// Display sink that records everything it was shown.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay(Arc<Mutex<DisplayLog>>);

impl RecordingDisplay {
    pub fn log(&self) -> DisplayLog {
        lock(&self.0).clone()
    }
}

impl DisplaySink for RecordingDisplay {
    fn show_live(&mut self, output: &LiveOutput) {
        lock(&self.0).live.push(output.clone());
    }

    fn show_word(&mut self, word: &str) {
        lock(&self.0).words.push(word.to_string());
    }

    fn show_image(&mut self, image: Option<&SignImage>) {
        lock(&self.0).images.push(image.cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_classifier_requires_video_mode() {
        let mut classifier = ScriptedClassifier::new(vec![ScriptStep::gesture("A", 0.95)]);
        let frame = Frame::blank(2, 2, 0);
        assert!(classifier.classify(&frame, 1).is_err());

        classifier.set_mode(RunningMode::Video).unwrap();
        let result = classifier.classify(&frame, 2).unwrap();
        assert_eq!(result.top_candidate().unwrap().label, "A");

        // exhausted script yields empty results
        assert_eq!(
            classifier.classify(&frame, 3).unwrap(),
            RecognitionResult::empty()
        );

        let calls = classifier.probe().calls();
        assert_eq!(calls.mode_changes, vec![RunningMode::Video]);
        assert_eq!(calls.timestamps, vec![2, 3]);
    }

    #[test]
    fn looping_classifier_restarts_script() {
        let mut classifier = ScriptedClassifier::looping(vec![
            ScriptStep::gesture("A", 0.95),
            ScriptStep::Fail("blur".to_string()),
        ]);
        classifier.set_mode(RunningMode::Video).unwrap();
        let frame = Frame::blank(1, 1, 0);

        assert!(classifier.classify(&frame, 1).is_ok());
        assert!(classifier.classify(&frame, 2).is_err());
        assert_eq!(
            classifier
                .classify(&frame, 3)
                .unwrap()
                .top_candidate()
                .unwrap()
                .label,
            "A"
        );
    }

    #[test]
    fn rejected_mode_change_keeps_image_mode() {
        let mut classifier =
            ScriptedClassifier::new(vec![ScriptStep::gesture("A", 0.95)]).rejecting_mode_changes(1);
        let frame = Frame::blank(2, 2, 0);

        assert!(classifier.set_mode(RunningMode::Video).is_err());
        assert!(classifier.classify(&frame, 1).is_err());

        classifier.set_mode(RunningMode::Video).unwrap();
        assert!(classifier.classify(&frame, 2).is_ok());
        assert_eq!(
            classifier.probe().calls().mode_changes,
            vec![RunningMode::Video, RunningMode::Video]
        );
    }

    #[test]
    fn synthetic_source_reports_device_errors_after_warmup() {
        let mut source = SyntheticFrameSource::new(4, 4)
            .warming_up(1)
            .with_device_errors(2);
        assert!(source.current_frame().unwrap().is_none());
        assert!(matches!(
            source.current_frame(),
            Err(SignlangError::FrameSource { .. })
        ));
        assert!(source.current_frame().is_err());
        assert!(source.current_frame().unwrap().is_some());
    }

    #[test]
    fn synthetic_source_warms_up() {
        let mut source = SyntheticFrameSource::new(8, 6).warming_up(2);
        assert!(source.current_frame().unwrap().is_none());
        assert!(source.current_frame().unwrap().is_none());
        let frame = source.current_frame().unwrap().unwrap();
        assert_eq!(frame.size(), (8, 6));
    }

    #[tokio::test]
    async fn failing_loader_reports_initialization_error() {
        let loader = ScriptedLoader::failing("model asset missing");
        let err = loader
            .load(&RecognizerOptions::default())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, SignlangError::Initialization { .. }));
    }

    #[tokio::test]
    async fn loader_shares_probe_with_classifier() {
        let loader = ScriptedLoader::new(vec![ScriptStep::nothing()]);
        let probe = loader.probe();
        let mut classifier = loader.load(&RecognizerOptions::default()).await.unwrap();
        classifier.set_mode(RunningMode::Video).unwrap();
        assert_eq!(probe.calls().mode_changes, vec![RunningMode::Video]);
    }
}
