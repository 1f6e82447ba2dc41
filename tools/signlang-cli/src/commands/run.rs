//! Interactive session driven from stdin.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use signlang_common::clock::refresh_interval;
use signlang_common::config::AppConfig;
use signlang_recognizer::stub::{NullOverlay, ScriptStep, ScriptedLoader, SyntheticFrameSource};
use signlang_stream_engine::{spawn, EngineParts, EngineSettings, ToggleOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::console::ConsoleDisplay;

pub async fn run(config: AppConfig, path: PathBuf, fps: Option<u32>) -> anyhow::Result<()> {
    let results = super::load_results(&path)?;
    let frames = results.len();
    let script: Vec<ScriptStep> = results.into_iter().map(ScriptStep::Emit).collect();

    let mut settings = EngineSettings::from_config(&config)?;
    if let Some(fps) = fps {
        settings.refresh = refresh_interval(fps);
    }

    let engine = spawn(
        EngineParts {
            loader: Arc::new(ScriptedLoader::looping(script).with_delay(Duration::from_millis(250))),
            frames: Box::new(SyntheticFrameSource::new(640, 480)),
            overlay: Box::new(NullOverlay),
            display: Box::new(ConsoleDisplay::default()),
        },
        settings,
    );

    println!("{}", session_banner(&path, frames));
    println!("  [enter]/t  start or stop");
    println!("  r          reset the word");
    println!("  s          status");
    println!("  i          retry classifier initialization");
    println!("  q          quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "" | "t" => match engine.toggle().await {
                Ok(ToggleOutcome::Started) => println!("Started"),
                Ok(ToggleOutcome::Stopped(summary)) => {
                    println!("Stopped after {:.1}s", summary.duration_secs);
                    println!("{}", serde_json::to_string_pretty(&summary)?);
                }
                Err(e) => println!("Cannot toggle: {e}"),
            },
            "r" => {
                engine.reset_word().await?;
                println!("Word cleared");
            }
            "s" => {
                let snapshot = engine.snapshot().await?;
                if let Some(error) = &snapshot.last_error {
                    println!("Loop stopped after an error: {error}");
                }
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            "i" => match engine.retry_init().await {
                Ok(()) => println!("Retrying classifier initialization"),
                Err(e) => println!("Cannot retry: {e}"),
            },
            "q" => break,
            other => println!("Unknown command: {other:?}"),
        }
    }

    if let Some(summary) = engine.shutdown().await? {
        println!("Final word: {}", summary.word);
    }
    Ok(())
}

fn session_banner(path: &Path, frames: usize) -> String {
    format!("Signlang session: {} ({frames} recorded frames)", path.display())
}
