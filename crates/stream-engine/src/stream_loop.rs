//! The per-frame classification loop.
//!
//! The loop is a cooperative task on a single scheduler. Each iteration pulls
//! the current frame, classifies it, and dispatches the result; at its end the
//! iteration re-arms a pending ticket if the loop is still running. The
//! refresh callback ([`StreamLoop::on_refresh`]) consumes that ticket.
//! `stop()` clears it, so nothing runs after `stop()` returns.

use std::time::Duration;

use serde::Serialize;
use signlang_common::clock::TimestampSequencer;
use signlang_common::config::AppConfig;
use signlang_common::error::{SignlangError, SignlangResult};
use signlang_gesture_model::{
    LiveOutput, LoopState, RunningMode, SignCatalogue, SignImage, TopCandidate,
};
use signlang_recognizer::{
    Classifier, ClassifierSlot, DisplaySink, FrameSource, OverlayRenderer, Readiness,
};

use crate::accumulator::{ObserveOutcome, SequenceAccumulator, WordSnapshot};
use crate::rotation::ImageRotation;

/// Tunables for a [`StreamLoop`].
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Minimum confidence for a symbol to be accepted.
    pub accept_threshold: f32,
    /// Consecutive failed iterations tolerated before the loop stops.
    pub max_consecutive_failures: u32,
    /// Interval between reference image changes.
    pub image_rotation: Duration,
    /// Reference images shown while running.
    pub catalogue: SignCatalogue,
}

impl LoopSettings {
    /// Build settings from the application config, loading the catalogue
    /// file if one is configured.
    pub fn from_config(config: &AppConfig) -> SignlangResult<Self> {
        let catalogue = match &config.stream.catalogue_path {
            Some(path) => SignCatalogue::load(path)?,
            None => SignCatalogue::alphabet(),
        };
        Ok(Self {
            accept_threshold: config.recognizer.accept_threshold,
            max_consecutive_failures: config.stream.max_consecutive_failures.max(1),
            image_rotation: Duration::from_secs(config.stream.image_rotation_secs),
            catalogue,
        })
    }
}

impl Default for LoopSettings {
    fn default() -> Self {
        let config = AppConfig::default();
        Self {
            accept_threshold: config.recognizer.accept_threshold,
            max_consecutive_failures: config.stream.max_consecutive_failures,
            image_rotation: Duration::from_secs(config.stream.image_rotation_secs),
            catalogue: SignCatalogue::alphabet(),
        }
    }
}

/// Counters for the current (or last) session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    pub frames_classified: u64,
    pub frames_skipped: u64,
    pub classification_failures: u64,
    pub symbols_accepted: u64,
}

/// What a refresh did.
#[derive(Debug)]
pub enum IterationOutcome {
    /// No iteration was pending.
    Idle,
    /// The frame source had no frame; the next iteration was scheduled.
    Skipped,
    /// A frame was classified and dispatched.
    Classified {
        candidate: Option<TopCandidate>,
        observe: ObserveOutcome,
    },
    /// The iteration failed and was abandoned; the loop keeps going.
    Failed { consecutive: u32 },
    /// The failure budget ran out and the loop stopped.
    Halted(SignlangError),
}

/// Classification loop over a frame source and a shared classifier.
pub struct StreamLoop {
    classifier: ClassifierSlot,
    frames: Box<dyn FrameSource>,
    overlay: Box<dyn OverlayRenderer>,
    display: Box<dyn DisplaySink>,
    accumulator: SequenceAccumulator,
    rotation: ImageRotation,
    timestamps: TimestampSequencer,
    state: LoopState,
    mode: RunningMode,
    pending: Option<u64>,
    tickets_issued: u64,
    consecutive_failures: u32,
    max_consecutive_failures: u32,
    last_live: LiveOutput,
    stats: SessionStats,
}

impl StreamLoop {
    /// Create a stopped loop. The classifier slot starts out loading.
    pub fn new(
        settings: LoopSettings,
        frames: Box<dyn FrameSource>,
        overlay: Box<dyn OverlayRenderer>,
        display: Box<dyn DisplaySink>,
    ) -> Self {
        Self {
            classifier: ClassifierSlot::Loading,
            frames,
            overlay,
            display,
            accumulator: SequenceAccumulator::new(settings.accept_threshold),
            rotation: ImageRotation::new(settings.catalogue, settings.image_rotation),
            timestamps: TimestampSequencer::new(),
            state: LoopState::Stopped,
            mode: RunningMode::Image,
            pending: None,
            tickets_issued: 0,
            consecutive_failures: 0,
            max_consecutive_failures: settings.max_consecutive_failures.max(1),
            last_live: LiveOutput::idle(),
            stats: SessionStats::default(),
        }
    }

    /// Record the outcome of an asynchronous classifier load.
    pub fn install_classifier(&mut self, outcome: SignlangResult<Box<dyn Classifier>>) {
        self.classifier.install(outcome);
    }

    /// Mark a classifier reload as in flight. Returns `false` if a classifier
    /// is already installed.
    pub fn begin_loading(&mut self) -> bool {
        self.classifier.begin_loading()
    }

    pub fn readiness(&self) -> Readiness {
        self.classifier.readiness()
    }

    /// Error a control surface should show if the classifier is not usable.
    pub fn ensure_ready(&self) -> SignlangResult<()> {
        self.classifier.ensure_ready()
    }

    /// Begin a session and schedule the first iteration.
    pub fn start(&mut self, now_ms: u64) -> SignlangResult<()> {
        if !self.classifier.is_ready() {
            return Err(SignlangError::precondition(
                "gesture classifier has not finished initializing",
            ));
        }
        if self.state.is_running() {
            return Err(SignlangError::precondition("stream loop already running"));
        }

        self.state = LoopState::Running;
        self.mode = RunningMode::Image;
        self.consecutive_failures = 0;
        self.stats = SessionStats::default();
        self.rotation.arm(now_ms);
        self.schedule();

        tracing::info!("Stream loop started");
        Ok(())
    }

    /// Stop the loop, cancel the pending iteration, and clear transient
    /// display state. Returns `false` if the loop was already stopped.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        self.state = LoopState::Stopped;
        self.pending = None;
        self.rotation.cancel();
        self.last_live = LiveOutput::idle();
        self.display.show_live(&self.last_live);
        self.display.show_image(None);

        tracing::info!(
            frames = self.stats.frames_classified,
            symbols = self.stats.symbols_accepted,
            "Stream loop stopped"
        );
        true
    }

    /// Display-refresh callback: run the pending iteration, then poll the
    /// decorative timer.
    pub fn on_refresh(&mut self, now_ms: u64) -> IterationOutcome {
        let outcome = match self.pending.take() {
            Some(ticket) => self.run_iteration(ticket, now_ms),
            None => IterationOutcome::Idle,
        };

        if let Some(image) = self.rotation.poll(now_ms) {
            tracing::debug!(image = image.id, label = %image.label, "Rotating reference image");
            self.display.show_image(Some(image));
        }

        outcome
    }

    /// Clear the accumulated word and show the empty word.
    pub fn reset_word(&mut self) {
        self.accumulator.reset();
        self.display.show_word("");
        tracing::info!("Word reset");
    }

    pub fn word(&self) -> WordSnapshot {
        self.accumulator.current()
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn running_mode(&self) -> RunningMode {
        self.mode
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn last_live(&self) -> &LiveOutput {
        &self.last_live
    }

    pub fn current_image(&self) -> Option<&SignImage> {
        self.rotation.current()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    fn schedule(&mut self) {
        self.tickets_issued += 1;
        self.pending = Some(self.tickets_issued);
    }

    fn run_iteration(&mut self, ticket: u64, now_ms: u64) -> IterationOutcome {
        if !self.state.is_running() {
            return IterationOutcome::Idle;
        }

        let frame = match self.frames.current_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::trace!(ticket, source = %self.frames.name(), "No frame available yet");
                self.stats.frames_skipped += 1;
                self.schedule();
                return IterationOutcome::Skipped;
            }
            Err(e) => return self.record_failure(e),
        };

        let Some(classifier) = self.classifier.classifier_mut() else {
            return self.halt(SignlangError::precondition(
                "gesture classifier is no longer available",
            ));
        };

        if self.mode == RunningMode::Image {
            if let Err(e) = classifier.set_mode(RunningMode::Video) {
                return self.record_failure(e);
            }
        }

        let timestamp_ms = self.timestamps.next(now_ms);
        let result = match classifier.classify(&frame, timestamp_ms) {
            Ok(result) => result,
            Err(e) => return self.record_failure(e),
        };

        if self.mode == RunningMode::Image {
            self.mode = RunningMode::Video;
            tracing::info!("Classifier switched to video mode");
        }
        self.consecutive_failures = 0;
        self.stats.frames_classified += 1;

        self.overlay.clear(frame.width, frame.height);
        if result.has_hands() {
            tracing::debug!(
                hands = result.landmarks.len(),
                points = result.landmarks[0].len(),
                "Hand landmarks detected"
            );
            self.overlay.draw_landmarks(&result.landmarks);
        }

        let candidate = result.top_candidate();
        if let Some(top) = &candidate {
            tracing::debug!(
                label = %top.label,
                confidence = top.confidence,
                "Predicted gesture"
            );
        }

        let observe = self.accumulator.observe(candidate.as_ref());
        self.last_live = LiveOutput::from_candidate(candidate.as_ref());
        self.display.show_live(&self.last_live);

        if observe.mutated() {
            self.stats.symbols_accepted += 1;
            let word = self.accumulator.current().joined();
            tracing::info!(word = %word, "Symbol accepted");
            self.display.show_word(&word);
        }

        if self.state.is_running() {
            self.schedule();
        }

        IterationOutcome::Classified { candidate, observe }
    }

    fn record_failure(&mut self, error: SignlangError) -> IterationOutcome {
        self.consecutive_failures += 1;
        self.stats.classification_failures += 1;

        if self.consecutive_failures >= self.max_consecutive_failures {
            return self.halt(SignlangError::ClassificationBudgetExhausted {
                failures: self.consecutive_failures,
                last_error: error.to_string(),
            });
        }

        tracing::warn!(
            error = %error,
            consecutive = self.consecutive_failures,
            "Classification failed, skipping frame"
        );
        self.schedule();
        IterationOutcome::Failed {
            consecutive: self.consecutive_failures,
        }
    }

    fn halt(&mut self, error: SignlangError) -> IterationOutcome {
        tracing::error!(error = %error, "Stopping stream loop");
        self.stop();
        IterationOutcome::Halted(error)
    }
}
