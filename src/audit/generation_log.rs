use std::path::{Path, PathBuf};

use tracing::warn;

/// `<logs_dir>/<target id>/<SimpleEntryClass>.log`
pub fn generation_log_path(logs_dir: &Path, target_id: &str, entry_class: &str) -> PathBuf {
    let simple_name = entry_class.rsplit('.').next().unwrap_or(entry_class);
    logs_dir.join(target_id).join(format!("{}.log", simple_name))
}

/// Create the generation log file for one attempt. A file that cannot be
/// created is logged and the attempt runs without it.
pub async fn prepare_generation_log(logs_dir: &Path, target_id: &str, entry_class: &str) -> Option<PathBuf> {
    let path = generation_log_path(logs_dir, target_id, entry_class);
    if let Some(parent) = path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            warn!(path = %parent.display(), error = %e, "Could not create generation log directory");
            return None;
        }
    }
    match tokio::fs::File::create(&path).await {
        Ok(_) => Some(path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not create generation log file");
            None
        }
    }
}
