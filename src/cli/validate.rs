use crate::cli::commands::ValidateArgs;
use crate::config::{load_configuration, RunSettings};
use crate::errors::ReachError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), ReachError> {
    let settings = RunSettings {
        config_file: Some(args.config.clone()),
        ..RunSettings::default()
    };
    let loaded = load_configuration(settings).await?;
    println!("Configuration is valid: {}", args.config.display());
    for project in &loaded.projects {
        println!(
            "  {} ({} vulnerabilities, budget {}s, ranking {})",
            project.project_path.display(),
            project.vulnerabilities.len(),
            project.budget_secs,
            project.ranking,
        );
    }
    Ok(())
}
