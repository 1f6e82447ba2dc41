//! Replay recorded recognition results through the stream loop.

use std::path::PathBuf;

use signlang_common::config::AppConfig;
use signlang_recognizer::stub::{NullOverlay, ScriptStep, ScriptedClassifier, SyntheticFrameSource};
use signlang_stream_engine::{
    IterationOutcome, LifecycleController, LoopSettings, StreamLoop, ToggleOutcome,
};

use crate::console::ConsoleDisplay;

pub fn run(mut config: AppConfig, path: PathBuf, threshold: Option<f32>) -> anyhow::Result<()> {
    if let Some(threshold) = threshold {
        config.recognizer.accept_threshold = threshold;
    }
    config.validate()?;

    let results = super::load_results(&path)?;
    let frames = results.len();
    println!("Replaying {} frames from {}", frames, path.display());
    println!(
        "  Threshold: {:.2}",
        config.recognizer.accept_threshold
    );
    println!();

    let script = results.into_iter().map(ScriptStep::Emit).collect();
    let stream = StreamLoop::new(
        LoopSettings::from_config(&config)?,
        Box::new(SyntheticFrameSource::new(640, 480)),
        Box::new(NullOverlay),
        Box::new(ConsoleDisplay::default()),
    );
    let mut lifecycle = LifecycleController::new(stream);
    lifecycle.install_classifier(Ok(Box::new(ScriptedClassifier::new(script))));
    lifecycle.toggle()?;

    for _ in 0..frames {
        match lifecycle.on_refresh() {
            IterationOutcome::Halted(e) => {
                anyhow::bail!("Replay halted: {e}");
            }
            IterationOutcome::Failed { consecutive } => {
                tracing::warn!(consecutive, "Replay frame failed");
            }
            _ => {}
        }
    }

    let summary = match lifecycle.toggle()? {
        ToggleOutcome::Stopped(summary) => summary,
        ToggleOutcome::Started => anyhow::bail!("Replay session was not running"),
    };

    println!();
    println!("Replay complete");
    println!("  Word:              {}", summary.word);
    println!("  Frames classified: {}", summary.stats.frames_classified);
    println!("  Symbols accepted:  {}", summary.stats.symbols_accepted);
    println!("  Failures:          {}", summary.stats.classification_failures);
    Ok(())
}
