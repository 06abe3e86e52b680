use std::path::{Path, PathBuf};

use regex::Regex;
use std::sync::LazyLock;
use tracing::{info, warn};

use super::defaults::*;
use super::parser::parse_config;
use super::types::{ProjectConfiguration, ProjectEntry, RunSettings, SearchParameters};
use super::vulnerabilities::read_vulnerabilities;
use crate::errors::ReachError;

static ENGINE_ENUM_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").expect("valid regex"));

/// Settings and projects resolved from the command line and, when given, a
/// configuration file.
#[derive(Debug, Clone)]
pub struct LoadedConfiguration {
    pub settings: RunSettings,
    pub projects: Vec<ProjectConfiguration>,
}

/// Resolve the projects to analyze.
///
/// With a configuration file, every `projects:` entry falls back to the
/// command-line values; an invalid entry is logged and skipped. Without one,
/// the command line describes a single project and any invalid value is fatal.
pub async fn load_configuration(mut settings: RunSettings) -> Result<LoadedConfiguration, ReachError> {
    if let Some(config_path) = settings.config_file.clone() {
        info!(path = %config_path.display(), "Running with configuration file");
        let file = parse_config(&config_path).await?;
        settings.merge_file(&file);

        let base_dir = config_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut projects = Vec::new();
        for entry in &file.projects {
            match build_project(entry, &settings, &base_dir).await {
                Ok(project) => projects.push(project),
                Err(e) => {
                    warn!(
                        project = ?entry.path,
                        error = %e,
                        "Project has an invalid parameter in the configuration file. Skipping this project"
                    );
                }
            }
        }
        if projects.is_empty() {
            return Err(ReachError::Config("No valid project in the configuration file".into()));
        }
        info!(count = projects.len(), "Found projects to analyze");
        Ok(LoadedConfiguration { settings, projects })
    } else {
        info!("Running with command-line options");
        let entry = ProjectEntry::default();
        let project = build_project(&entry, &settings, Path::new("")).await?;
        Ok(LoadedConfiguration {
            settings,
            projects: vec![project],
        })
    }
}

/// Merge one entry over the run-wide settings and validate the result.
pub async fn build_project(
    entry: &ProjectEntry,
    settings: &RunSettings,
    base_dir: &Path,
) -> Result<ProjectConfiguration, ReachError> {
    let project_path = entry
        .path
        .as_ref()
        .map(|p| resolve_relative(base_dir, p))
        .or_else(|| settings.project.clone())
        .ok_or_else(|| ReachError::Config("A project path is required".into()))?;
    if !project_path.is_dir() {
        return Err(ReachError::Config(format!(
            "Project directory does not exist: {}",
            project_path.display()
        )));
    }

    let vulnerabilities_path = entry
        .vulnerabilities
        .as_ref()
        .map(|p| resolve_relative(base_dir, p))
        .or_else(|| settings.vulnerabilities.clone())
        .ok_or_else(|| ReachError::Config("A vulnerabilities file is required".into()))?;
    let vulnerabilities = read_vulnerabilities(&vulnerabilities_path).await?;

    let search = SearchParameters::default().with_overrides(&entry.search);
    validate_search_parameters(&search)?;

    Ok(ProjectConfiguration {
        project_path,
        vulnerabilities,
        classpath_file_name: entry
            .classpath_file_name
            .clone()
            .unwrap_or_else(|| settings.classpath_file_name.clone()),
        budget_secs: validate_search_budget(entry.search_budget.unwrap_or(settings.budget_secs))?,
        population_size: validate_population_size(entry.population_size.unwrap_or(settings.population_size))?,
        ranking: entry.ranking.unwrap_or(settings.ranking),
        stop_on_first_success: entry.stop_on_first_success.unwrap_or(settings.stop_on_first_success),
        search,
    })
}

fn resolve_relative(base_dir: &Path, value: &str) -> PathBuf {
    let path = PathBuf::from(value);
    if path.is_absolute() { path } else { base_dir.join(path) }
}

pub fn validate_search_budget(budget: u64) -> Result<u64, ReachError> {
    if budget < SEARCH_BUDGET_MIN {
        return Err(ReachError::Config(format!(
            "The search budget cannot be less than {}", SEARCH_BUDGET_MIN
        )));
    }
    Ok(budget)
}

pub fn validate_population_size(size: u32) -> Result<u32, ReachError> {
    if size < POPULATION_SIZE_MIN {
        return Err(ReachError::Config(format!(
            "The population size cannot be less than {}", POPULATION_SIZE_MIN
        )));
    }
    Ok(size)
}

pub fn validate_search_parameters(search: &SearchParameters) -> Result<(), ReachError> {
    if search.chromosome_length < CHROMOSOME_LENGTH_MIN {
        return Err(ReachError::Config(format!(
            "The chromosome length cannot be less than {}", CHROMOSOME_LENGTH_MIN
        )));
    }
    if !(MAX_STRING_LENGTH_MIN..=MAX_STRING_LENGTH_MAX).contains(&search.max_string_length) {
        return Err(ReachError::Config(format!(
            "The max string length must be between {} and {}",
            MAX_STRING_LENGTH_MIN, MAX_STRING_LENGTH_MAX
        )));
    }

    let probabilities = [
        ("probability_add_calls_before_entry_method", search.probability_add_calls_before_entry_method),
        ("probability_primitive_reuse", search.probability_primitive_reuse),
        ("probability_primitive_pool", search.probability_primitive_pool),
        ("probability_object_reuse", search.probability_object_reuse),
        ("probability_dynamic_pool", search.probability_dynamic_pool),
        ("probability_change_parameter", search.probability_change_parameter),
    ];
    for (name, value) in probabilities {
        if !(0.0..=1.0).contains(&value) {
            return Err(ReachError::Config(format!("{} must be within [0, 1], got {}", name, value)));
        }
    }

    let names = [
        ("metaheuristic", &search.metaheuristic),
        ("initial_population_algorithm", &search.initial_population_algorithm),
        ("crossover", &search.crossover),
    ];
    for (name, value) in names {
        if !ENGINE_ENUM_NAME.is_match(value) {
            return Err(ReachError::Config(format!("{} is not a supported {} name", value, name)));
        }
    }

    Ok(())
}
