//! Async driver for the lifecycle controller.
//!
//! One tokio task owns the [`LifecycleController`] and multiplexes three
//! event sources:
//!
//! ```text
//!   refresh interval ──┐
//!   control commands ──┼──► LifecycleController ──► StreamLoop
//!   classifier load  ──┘
//! ```
//!
//! Commands are handled between iterations, so a stop requested through the
//! handle takes effect before the next refresh. Refresh ticks that arrive
//! late are skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use signlang_common::clock::refresh_interval;
use signlang_common::config::AppConfig;
use signlang_common::error::{SignlangError, SignlangResult};
use signlang_gesture_model::{LiveOutput, LoopState, RunningMode};
use signlang_recognizer::{
    Classifier, ClassifierLoader, DisplaySink, FrameSource, OverlayRenderer, Readiness,
    RecognizerOptions,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::accumulator::WordSnapshot;
use crate::lifecycle::{LifecycleController, SessionSummary, ToggleOutcome};
use crate::stream_loop::{IterationOutcome, LoopSettings, SessionStats, StreamLoop};

/// Everything the engine needs to run.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub loop_settings: LoopSettings,
    pub recognizer: RecognizerOptions,
    pub refresh: Duration,
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig) -> SignlangResult<Self> {
        config.validate()?;
        Ok(Self {
            loop_settings: LoopSettings::from_config(config)?,
            recognizer: RecognizerOptions::from_config(&config.recognizer),
            refresh: refresh_interval(config.stream.refresh_hz),
        })
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            loop_settings: LoopSettings::default(),
            recognizer: RecognizerOptions::default(),
            refresh: refresh_interval(AppConfig::default().stream.refresh_hz),
        }
    }
}

/// External collaborators handed to the engine.
pub struct EngineParts {
    pub loader: Arc<dyn ClassifierLoader>,
    pub frames: Box<dyn FrameSource>,
    pub overlay: Box<dyn OverlayRenderer>,
    pub display: Box<dyn DisplaySink>,
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub loop_state: LoopState,
    pub running_mode: RunningMode,
    pub readiness: Readiness,
    pub word: WordSnapshot,
    pub live: LiveOutput,
    pub stats: SessionStats,
    /// Why the loop last stopped on its own, cleared by the next start.
    pub last_error: Option<String>,
}

enum Command {
    Toggle(oneshot::Sender<SignlangResult<ToggleOutcome>>),
    ResetWord(oneshot::Sender<WordSnapshot>),
    RetryInit(oneshot::Sender<SignlangResult<()>>),
    Snapshot(oneshot::Sender<EngineSnapshot>),
    Shutdown(oneshot::Sender<Option<SessionSummary>>),
}

type LoadOutcome = SignlangResult<Box<dyn Classifier>>;

/// Control surface for a running engine.
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    task: JoinHandle<()>,
}

/// Spawn the engine task and begin loading the classifier.
///
/// Must be called from within a tokio runtime.
pub fn spawn(parts: EngineParts, settings: EngineSettings) -> EngineHandle {
    let (commands, rx) = mpsc::channel(32);
    let task = tokio::spawn(drive(parts, settings, rx));
    EngineHandle { commands, task }
}

impl EngineHandle {
    /// Start or stop the stream.
    pub async fn toggle(&self) -> SignlangResult<ToggleOutcome> {
        self.request(Command::Toggle).await?
    }

    /// Clear the accumulated word.
    pub async fn reset_word(&self) -> SignlangResult<WordSnapshot> {
        self.request(Command::ResetWord).await
    }

    /// Re-run the classifier loader after a failed load.
    pub async fn retry_init(&self) -> SignlangResult<()> {
        self.request(Command::RetryInit).await?
    }

    pub async fn snapshot(&self) -> SignlangResult<EngineSnapshot> {
        self.request(Command::Snapshot).await
    }

    /// Stop any running session and end the engine task.
    pub async fn shutdown(self) -> SignlangResult<Option<SessionSummary>> {
        let summary = self.request(Command::Shutdown).await?;
        self.task
            .await
            .map_err(|e| SignlangError::Other(anyhow::anyhow!("stream engine task failed: {e}")))?;
        Ok(summary)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> SignlangResult<T> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| engine_gone())?;
        response.await.map_err(|_| engine_gone())
    }
}

fn engine_gone() -> SignlangError {
    SignlangError::precondition("stream engine task has stopped")
}

fn start_loading(
    loader: &Arc<dyn ClassifierLoader>,
    options: &RecognizerOptions,
    tx: &mpsc::Sender<LoadOutcome>,
) {
    let loader = Arc::clone(loader);
    let options = options.clone();
    let tx = tx.clone();
    tracing::info!(
        loader = %loader.name(),
        model = %options.model_asset_path.display(),
        num_hands = options.num_hands,
        "Loading gesture classifier"
    );
    tokio::spawn(async move {
        let outcome = loader.load(&options).await;
        let _ = tx.send(outcome).await;
    });
}

async fn drive(parts: EngineParts, settings: EngineSettings, mut commands: mpsc::Receiver<Command>) {
    let EngineParts {
        loader,
        frames,
        overlay,
        display,
    } = parts;
    let mut lifecycle = LifecycleController::new(StreamLoop::new(
        settings.loop_settings,
        frames,
        overlay,
        display,
    ));

    let (load_tx, mut load_rx) = mpsc::channel::<LoadOutcome>(1);
    start_loading(&loader, &settings.recognizer, &load_tx);

    let mut ticker = tokio::time::interval(settings.refresh);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_error: Option<String> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let IterationOutcome::Halted(e) = lifecycle.on_refresh() {
                    last_error = Some(e.to_string());
                }
            }
            Some(outcome) = load_rx.recv() => {
                lifecycle.install_classifier(outcome);
            }
            command = commands.recv() => {
                let Some(command) = command else {
                    tracing::debug!("All engine handles dropped");
                    lifecycle.stop();
                    break;
                };
                match command {
                    Command::Toggle(reply) => {
                        let outcome = lifecycle.toggle();
                        match &outcome {
                            Ok(ToggleOutcome::Started) => last_error = None,
                            Ok(ToggleOutcome::Stopped(_)) => {}
                            Err(e) => tracing::warn!(error = %e, "Toggle rejected"),
                        }
                        let _ = reply.send(outcome);
                    }
                    Command::ResetWord(reply) => {
                        let _ = reply.send(lifecycle.reset_word());
                    }
                    Command::RetryInit(reply) => {
                        let outcome = lifecycle.begin_retry();
                        if outcome.is_ok() {
                            start_loading(&loader, &settings.recognizer, &load_tx);
                        }
                        let _ = reply.send(outcome);
                    }
                    Command::Snapshot(reply) => {
                        let stream = lifecycle.stream();
                        let _ = reply.send(EngineSnapshot {
                            loop_state: stream.state(),
                            running_mode: stream.running_mode(),
                            readiness: stream.readiness(),
                            word: stream.word(),
                            live: stream.last_live().clone(),
                            stats: stream.stats(),
                            last_error: last_error.clone(),
                        });
                    }
                    Command::Shutdown(reply) => {
                        let _ = reply.send(lifecycle.stop());
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("Stream engine stopped");
}
