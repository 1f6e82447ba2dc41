//! Start/stop control over the stream loop.

use serde::Serialize;
use signlang_common::clock::SessionClock;
use signlang_common::error::{SignlangError, SignlangResult};
use signlang_gesture_model::{LoopState, RunningMode};
use signlang_recognizer::{Classifier, Readiness};

use crate::accumulator::WordSnapshot;
use crate::stream_loop::{IterationOutcome, SessionStats, StreamLoop};

/// Result of a successful toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleOutcome {
    Started,
    Stopped(SessionSummary),
}

/// What happened during one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Wall-clock session start (RFC 3339).
    pub started_at: String,
    pub duration_secs: f64,
    #[serde(flatten)]
    pub stats: SessionStats,
    /// The word as it stood when the session ended.
    pub word: String,
}

/// Owns the running/stopped toggle and the session start time.
///
/// Stopping never clears the accumulated word; only [`Self::reset_word`]
/// does.
pub struct LifecycleController {
    stream: StreamLoop,
    epoch: SessionClock,
    session: Option<SessionClock>,
}

impl LifecycleController {
    pub fn new(stream: StreamLoop) -> Self {
        Self {
            stream,
            epoch: SessionClock::start(),
            session: None,
        }
    }

    /// Start the loop if stopped, stop it if running.
    ///
    /// Fails with [`SignlangError::NotReady`] while the classifier is still
    /// loading and with [`SignlangError::Initialization`] after a failed load.
    pub fn toggle(&mut self) -> SignlangResult<ToggleOutcome> {
        self.stream.ensure_ready()?;

        if self.stream.state().is_running() {
            self.stream.stop();
            return Ok(ToggleOutcome::Stopped(self.finish_session()));
        }

        self.stream.start(self.epoch.elapsed_ms())?;
        let session = SessionClock::start();
        tracing::info!(started_at = %session.epoch_wall(), "Session started");
        self.session = Some(session);
        Ok(ToggleOutcome::Started)
    }

    /// Stop the loop if it is running. Returns the session summary when a
    /// session was actually ended.
    pub fn stop(&mut self) -> Option<SessionSummary> {
        if self.stream.stop() {
            Some(self.finish_session())
        } else {
            None
        }
    }

    /// Clear the accumulated word only.
    pub fn reset_word(&mut self) -> WordSnapshot {
        self.stream.reset_word();
        self.stream.word()
    }

    /// Display-refresh callback.
    pub fn on_refresh(&mut self) -> IterationOutcome {
        let outcome = self.stream.on_refresh(self.epoch.elapsed_ms());
        if let IterationOutcome::Halted(error) = &outcome {
            let summary = self.finish_session();
            tracing::error!(
                error = %error,
                frames = summary.stats.frames_classified,
                "Session ended by classification failures"
            );
        }
        outcome
    }

    /// Record the outcome of an asynchronous classifier load.
    pub fn install_classifier(&mut self, outcome: SignlangResult<Box<dyn Classifier>>) {
        self.stream.install_classifier(outcome);
    }

    /// Prepare a retry after a failed load.
    pub fn begin_retry(&mut self) -> SignlangResult<()> {
        match self.stream.readiness() {
            Readiness::Ready => Err(SignlangError::precondition(
                "gesture classifier is already loaded",
            )),
            Readiness::Loading => Err(SignlangError::not_ready(
                "gesture classifier load already in progress",
            )),
            Readiness::Failed { message } => {
                tracing::info!(previous_error = %message, "Retrying classifier load");
                self.stream.begin_loading();
                Ok(())
            }
        }
    }

    pub fn readiness(&self) -> Readiness {
        self.stream.readiness()
    }

    pub fn state(&self) -> LoopState {
        self.stream.state()
    }

    pub fn running_mode(&self) -> RunningMode {
        self.stream.running_mode()
    }

    pub fn word(&self) -> WordSnapshot {
        self.stream.word()
    }

    pub fn stream(&self) -> &StreamLoop {
        &self.stream
    }

    /// Session start time, if a session is running.
    pub fn session_started_at(&self) -> Option<&str> {
        self.session.as_ref().map(SessionClock::epoch_wall)
    }

    fn finish_session(&mut self) -> SessionSummary {
        let session = self.session.take();
        let summary = SessionSummary {
            started_at: session
                .as_ref()
                .map(|clock| clock.epoch_wall().to_string())
                .unwrap_or_default(),
            duration_secs: session.as_ref().map(SessionClock::elapsed_secs).unwrap_or(0.0),
            stats: self.stream.stats(),
            word: self.stream.word().joined(),
        };
        tracing::info!(
            duration_secs = summary.duration_secs,
            frames = summary.stats.frames_classified,
            symbols = summary.stats.symbols_accepted,
            "Session stopped"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream_loop::LoopSettings;
    use signlang_recognizer::stub::{
        NullOverlay, RecordingDisplay, ScriptStep, ScriptedClassifier, SyntheticFrameSource,
    };

    fn controller(display: &RecordingDisplay) -> LifecycleController {
        LifecycleController::new(StreamLoop::new(
            LoopSettings::default(),
            Box::new(SyntheticFrameSource::new(32, 24)),
            Box::new(NullOverlay),
            Box::new(display.clone()),
        ))
    }

    fn ready_controller(display: &RecordingDisplay, script: Vec<ScriptStep>) -> LifecycleController {
        let mut lifecycle = controller(display);
        lifecycle.install_classifier(Ok(Box::new(ScriptedClassifier::new(script))));
        lifecycle
    }

    #[test]
    fn toggle_before_load_is_not_ready() {
        let mut lifecycle = controller(&RecordingDisplay::default());
        let err = lifecycle.toggle().unwrap_err();
        assert!(matches!(err, SignlangError::NotReady { .. }));
        assert_eq!(lifecycle.state(), LoopState::Stopped);
    }

    #[test]
    fn toggle_after_failed_load_is_initialization_error() {
        let mut lifecycle = controller(&RecordingDisplay::default());
        lifecycle.install_classifier(Err(SignlangError::initialization("bad model")));
        assert!(matches!(
            lifecycle.toggle(),
            Err(SignlangError::Initialization { .. })
        ));
        assert_eq!(lifecycle.state(), LoopState::Stopped);

        lifecycle.begin_retry().unwrap();
        assert_eq!(lifecycle.readiness(), Readiness::Loading);
        assert!(matches!(
            lifecycle.begin_retry(),
            Err(SignlangError::NotReady { .. })
        ));

        lifecycle.install_classifier(Ok(Box::new(ScriptedClassifier::new(vec![]))));
        assert_eq!(lifecycle.toggle().unwrap(), ToggleOutcome::Started);
    }

    #[test]
    fn toggle_alternates_and_summarizes() {
        let display = RecordingDisplay::default();
        let mut lifecycle = ready_controller(&display, vec![ScriptStep::gesture("H", 0.97)]);

        assert_eq!(lifecycle.toggle().unwrap(), ToggleOutcome::Started);
        assert!(lifecycle.session_started_at().is_some());
        lifecycle.on_refresh();

        match lifecycle.toggle().unwrap() {
            ToggleOutcome::Stopped(summary) => {
                assert_eq!(summary.word, "H");
                assert_eq!(summary.stats.frames_classified, 1);
                assert_eq!(summary.stats.symbols_accepted, 1);
                assert!(!summary.started_at.is_empty());
            }
            other => panic!("expected stop, got {other:?}"),
        }
        assert!(lifecycle.session_started_at().is_none());
        assert_eq!(lifecycle.state(), LoopState::Stopped);
    }

    #[test]
    fn word_survives_stop_start_cycles() {
        let display = RecordingDisplay::default();
        let mut lifecycle = ready_controller(
            &display,
            vec![ScriptStep::gesture("N", 0.99), ScriptStep::gesture("O", 0.99)],
        );

        lifecycle.toggle().unwrap();
        lifecycle.on_refresh();
        lifecycle.toggle().unwrap();
        assert_eq!(lifecycle.word().joined(), "N");

        lifecycle.toggle().unwrap();
        lifecycle.on_refresh();
        assert_eq!(lifecycle.word().joined(), "NO");
    }

    #[test]
    fn stop_then_reset_yields_empty_word() {
        let display = RecordingDisplay::default();
        let mut lifecycle = ready_controller(
            &display,
            vec![ScriptStep::gesture("C", 0.99), ScriptStep::gesture("D", 0.99)],
        );
        lifecycle.toggle().unwrap();
        lifecycle.on_refresh();
        lifecycle.on_refresh();
        assert!(lifecycle.stop().is_some());
        assert!(lifecycle.stop().is_none());

        let word = lifecycle.reset_word();
        assert!(word.is_empty());
        assert_eq!(lifecycle.word().joined(), "");
        assert_eq!(display.log().last_word(), Some(""));
    }

    #[test]
    fn halted_loop_closes_session() {
        let display = RecordingDisplay::default();
        let mut lifecycle = LifecycleController::new(StreamLoop::new(
            LoopSettings {
                max_consecutive_failures: 1,
                ..LoopSettings::default()
            },
            Box::new(SyntheticFrameSource::new(8, 8)),
            Box::new(NullOverlay),
            Box::new(display.clone()),
        ));
        lifecycle.install_classifier(Ok(Box::new(ScriptedClassifier::new(vec![
            ScriptStep::Fail("device lost".to_string()),
        ]))));

        lifecycle.toggle().unwrap();
        assert!(matches!(
            lifecycle.on_refresh(),
            IterationOutcome::Halted(_)
        ));
        assert_eq!(lifecycle.state(), LoopState::Stopped);
        assert!(lifecycle.session_started_at().is_none());

        // the control surface still works after a fatal session error
        assert_eq!(lifecycle.toggle().unwrap(), ToggleOutcome::Started);
    }
}
