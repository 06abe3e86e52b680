use std::collections::HashSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::ReachError;

/// Classpath and client classes of a built project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectClasspath {
    /// Output directories first, then dependency jars, `:`-separated.
    pub classpath: String,
    pub output_dirs: Vec<PathBuf>,
    /// Fully-qualified names of the project's own top-level classes.
    pub classes: Vec<String>,
}

/// Discovers a project's classpath from the classpath files its build wrote
/// (e.g. `mvn dependency:build-classpath -Dmdep.outputFile=cp.txt`).
pub struct ProjectBuilder {
    maven_command: String,
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            maven_command: "mvn".to_string(),
        }
    }

    pub fn with_maven_command(mut self, command: impl Into<String>) -> Self {
        self.maven_command = command.into();
        self
    }

    pub async fn resolve(&self, project_path: &Path, classpath_file_name: &str) -> Result<ProjectClasspath, ReachError> {
        info!(file_name = classpath_file_name, project = %project_path.display(), "Looking for classpath files");
        let classpath_files = find_classpath_files(project_path, classpath_file_name);
        if classpath_files.is_empty() {
            return Err(ReachError::ClasspathResolution(format!(
                "No classpath file named {} under {}",
                classpath_file_name,
                project_path.display()
            )));
        }
        debug!(count = classpath_files.len(), files = ?classpath_files, "Found classpath files");

        let mut output_dirs = Vec::new();
        for file in &classpath_files {
            let Some(module_dir) = file.parent() else { continue };
            if let Some(dir) = self.output_directory(module_dir).await {
                if !output_dirs.contains(&dir) {
                    output_dirs.push(dir);
                }
            }
        }
        output_dirs.sort();
        debug!(count = output_dirs.len(), dirs = ?output_dirs, "Found project output directories");

        let jars = read_classpath_files(&classpath_files).await;
        let classpath = output_dirs
            .iter()
            .map(|d| d.display().to_string())
            .chain(jars)
            .collect::<Vec<_>>()
            .join(":");

        let classes = find_classes(&output_dirs);
        if classes.is_empty() {
            return Err(ReachError::ClasspathResolution(format!(
                "No client classes found under {}. No generation can be started",
                project_path.display()
            )));
        }
        info!(classes = classes.len(), output_dirs = output_dirs.len(), "Resolved project classpath");

        Ok(ProjectClasspath {
            classpath,
            output_dirs,
            classes,
        })
    }

    /// Build output directory of one module: `target/classes` when it exists,
    /// otherwise whatever Maven reports for `project.build.outputDirectory`.
    async fn output_directory(&self, module_dir: &Path) -> Option<PathBuf> {
        let conventional = module_dir.join("target").join("classes");
        if conventional.is_dir() {
            return Some(conventional);
        }
        if !module_dir.join("pom.xml").is_file() {
            return None;
        }

        let output_file = std::env::temp_dir().join(format!("sinkreach-{}.txt", uuid::Uuid::new_v4()));
        let status = Command::new(&self.maven_command)
            .args(["help:evaluate", "-Dexpression=project.build.outputDirectory", "-q", "-B"])
            .arg(format!("-Doutput={}", output_file.display()))
            .current_dir(module_dir)
            .status()
            .await;

        let dir = match status {
            Ok(s) if s.success() => tokio::fs::read_to_string(&output_file)
                .await
                .ok()
                .map(|content| PathBuf::from(content.trim()))
                .filter(|p| p.is_dir()),
            Ok(s) => {
                warn!(module = %module_dir.display(), status = %s, "Maven could not evaluate the output directory");
                None
            }
            Err(e) => {
                warn!(module = %module_dir.display(), error = %e, "Could not run Maven");
                None
            }
        };
        let _ = tokio::fs::remove_file(&output_file).await;
        dir
    }
}

/// Every regular file named `file_name` below `root`.
pub fn find_classpath_files(root: &Path, file_name: &str) -> Vec<PathBuf> {
    let pattern = format!("{}/**/{}", Pattern::escape(&root.display().to_string()), Pattern::escape(file_name));
    match glob::glob(&pattern) {
        Ok(paths) => {
            let mut files: Vec<PathBuf> = paths.filter_map(Result::ok).filter(|p| p.is_file()).collect();
            files.sort();
            files
        }
        Err(e) => {
            warn!(pattern = %pattern, error = %e, "Invalid classpath file pattern");
            Vec::new()
        }
    }
}

/// Existing `.jar` entries of the classpath files, deduplicated in
/// first-seen order. Unreadable files are skipped.
pub async fn read_classpath_files(files: &[PathBuf]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut jars = Vec::new();
    for file in files {
        let content = match tokio::fs::read_to_string(file).await {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %file.display(), error = %e, "Could not read classpath file");
                continue;
            }
        };
        for element in content.lines().flat_map(|line| line.split(':')) {
            let element = element.trim();
            let path = Path::new(element);
            let is_jar = path.extension().is_some_and(|ext| ext == "jar");
            if is_jar && path.exists() && seen.insert(element.to_string()) {
                jars.push(element.to_string());
            }
        }
    }
    jars
}

/// Fully-qualified names of the top-level classes compiled into `dirs`.
pub fn find_classes(dirs: &[PathBuf]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut classes = Vec::new();
    for dir in dirs {
        let pattern = format!("{}/**/*.class", Pattern::escape(&dir.display().to_string()));
        let Ok(paths) = glob::glob(&pattern) else { continue };
        for path in paths.filter_map(Result::ok) {
            let Some(name) = class_name(dir, &path) else { continue };
            if seen.insert(name.clone()) {
                classes.push(name);
            }
        }
    }
    classes
}

fn class_name(root: &Path, class_file: &Path) -> Option<String> {
    let relative = class_file.strip_prefix(root).ok()?.with_extension("");
    let name = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?
        .join(".");
    if name.contains('$') || name.ends_with("module-info") || name.ends_with("package-info") {
        return None;
    }
    Some(name)
}
