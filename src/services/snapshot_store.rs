//! Saved timer persistence as a small JSON file

use std::{io::ErrorKind, path::Path};
use tokio::fs;
use tracing::{debug, info};

use crate::state::SavedTimer;

/// Load a saved timer, returning `None` when no file exists yet
pub async fn load_saved_timer(path: &Path) -> Result<Option<SavedTimer>, String> {
    debug!("Loading saved timer from {}", path.display());

    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No saved timer at {}, starting fresh", path.display());
            return Ok(None);
        }
        Err(e) => return Err(format!("Failed to read {}: {}", path.display(), e)),
    };

    let saved = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    info!("Loaded saved timer from {}", path.display());
    Ok(Some(saved))
}

/// Write the saved timer, replacing any previous file
pub async fn save_timer(path: &Path, saved: &SavedTimer) -> Result<(), String> {
    let json = serde_json::to_string_pretty(saved)
        .map_err(|e| format!("Failed to serialize timer: {}", e))?;

    fs::write(path, json)
        .await
        .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;

    info!("Saved timer to {}", path.display());
    Ok(())
}
