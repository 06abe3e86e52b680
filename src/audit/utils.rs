use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::errors::ReachError;

/// Atomic file write: write to `<path>.tmp`, then rename over `path`.
pub async fn atomic_write(path: &Path, content: &str) -> Result<(), ReachError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, content).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

pub fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_atomic_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/app.json");
        atomic_write(&path, "{\"a\":1}").await.unwrap();
        atomic_write(&path, "{\"a\":2}").await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"a\":2}");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_temp_path_appends_suffix() {
        assert_eq!(temp_path(Path::new("/out/app.json")), PathBuf::from("/out/app.json.tmp"));
    }
}
