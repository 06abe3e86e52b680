use std::path::Path;

use glob::Pattern;
use tracing::{debug, warn};

/// Body marker of a test class the engine emits when it found no test.
pub const EMPTY_TEST_MARKER: &str = "public void notGeneratedAnyTest()";
const SCAFFOLDING_SUFFIX: &str = "_scaffolding";

/// Delete generated test classes that contain no real test, together with
/// their scaffolding companions. Returns the number of test classes removed.
pub async fn delete_empty_test_files(tests_dir: &Path) -> usize {
    let pattern = format!("{}/**/*.java", Pattern::escape(&tests_dir.display().to_string()));
    let files = match glob::glob(&pattern) {
        Ok(paths) => paths.filter_map(Result::ok).collect::<Vec<_>>(),
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Invalid test file pattern");
            return 0;
        }
    };

    let mut removed = 0;
    for file in files {
        let Some(stem) = file.file_stem().and_then(|s| s.to_str()) else { continue };
        if stem.ends_with(SCAFFOLDING_SUFFIX) {
            continue;
        }

        let is_empty = match tokio::fs::read_to_string(&file).await {
            Ok(content) => content.contains(EMPTY_TEST_MARKER),
            Err(_) => true,
        };
        if !is_empty {
            continue;
        }

        let scaffolding = file.with_file_name(format!("{}{}.java", stem, SCAFFOLDING_SUFFIX));
        for path in [&file, &scaffolding] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => debug!(path = %path.display(), "Deleted empty test file"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete empty test file"),
            }
        }
        removed += 1;
    }
    removed
}

/// Remove a directory tree if it exists.
pub async fn clear_dir(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => debug!(path = %dir.display(), "Removed directory"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %dir.display(), error = %e, "Failed to remove directory"),
    }
}
