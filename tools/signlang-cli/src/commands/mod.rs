pub mod config;
pub mod replay;
pub mod run;

use std::path::Path;

use signlang_gesture_model::{parse_results, RecognitionResult};

/// Read a JSONL file of recorded recognition results.
pub fn load_results(path: &Path) -> anyhow::Result<Vec<RecognitionResult>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let results = parse_results(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {e}", path.display()))?;
    if results.is_empty() {
        anyhow::bail!("{} contains no recognition results", path.display());
    }
    Ok(results)
}
