mod support;

use std::path::Path;
use std::sync::Arc;

use sinkreach::config::{LoadedConfiguration, ProjectConfiguration, RunSettings, SearchParameters};
use sinkreach::models::{CampaignResult, StaticPath, VulnerabilityTarget};
use sinkreach::pipeline::{Launcher, RunDirectories};
use sinkreach::project::ProjectBuilder;
use sinkreach::ranking::RankingPolicy;
use support::*;
use tempfile::TempDir;

fn touch(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, "").unwrap();
}

fn built_project(root: &Path) {
    touch(&root.join("target/classes/com/app/Main.class"));
    touch(&root.join("libs/dep.jar"));
    std::fs::write(root.join("cp.txt"), root.join("libs/dep.jar").display().to_string()).unwrap();
}

fn project(path: &Path) -> ProjectConfiguration {
    ProjectConfiguration {
        project_path: path.to_path_buf(),
        vulnerabilities: vec![VulnerabilityTarget::new("CVE-1", "org.lib.A", "run")],
        classpath_file_name: "cp.txt".to_string(),
        budget_secs: 30,
        population_size: 10,
        ranking: RankingPolicy::RootProximity,
        stop_on_first_success: false,
        search: SearchParameters::default(),
    }
}

fn directories(root: &Path) -> RunDirectories {
    RunDirectories {
        tests_dir: root.join("tests"),
        results_dir: root.join("results"),
        logs_dir: root.join("logs"),
    }
}

#[tokio::test]
async fn test_classpath_failure_is_isolated() {
    let work = TempDir::new().unwrap();
    let good = work.path().join("good");
    let broken = work.path().join("broken");
    built_project(&good);
    std::fs::create_dir_all(&broken).unwrap();

    let engine = Arc::new(FakeEngine::default().with_paths(
        "org.lib.A",
        vec![StaticPath::from_classes(["com.app.Main", "org.lib.A"])],
    ));
    let loaded = LoadedConfiguration {
        settings: RunSettings::default(),
        projects: vec![project(&broken), project(&good)],
    };

    let out = TempDir::new().unwrap();
    let launcher = Launcher::new(loaded, engine.clone()).with_directories(directories(out.path()));
    let report = launcher.run().await.unwrap();

    assert!(report.has_failures());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].project, "broken");
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].project, "good");
    assert_eq!(engine.attempted_entries(), vec!["com.app.Main"]);
}

#[tokio::test]
async fn test_project_results_and_logs_written() {
    let work = TempDir::new().unwrap();
    let app = work.path().join("app");
    built_project(&app);

    let engine = Arc::new(FakeEngine::default().with_paths(
        "org.lib.A",
        vec![StaticPath::from_classes(["com.app.Main", "org.lib.A"])],
    ));
    let loaded = LoadedConfiguration {
        settings: RunSettings::default(),
        projects: vec![project(&app)],
    };

    let out = TempDir::new().unwrap();
    let dirs = directories(out.path());
    let report = Launcher::new(loaded, engine.clone())
        .with_directories(dirs.clone())
        .run()
        .await
        .unwrap();
    assert!(!report.has_failures());

    let result_file = dirs.results_dir.join("app.json");
    assert_eq!(report.completed[0].result_file, result_file);
    let written: CampaignResult = serde_json::from_str(&std::fs::read_to_string(&result_file).unwrap()).unwrap();
    assert_eq!(written.total_attempts(), 1);
    assert_eq!(written.configuration.budget_secs, 30);
    assert_eq!(written.configuration.ranking, RankingPolicy::RootProximity);

    assert!(dirs.logs_dir.join("app/CVE-1/Main.log").exists());

    let opts = engine.attempt_options.lock().unwrap().clone();
    assert_eq!(opts[0].tests_dir, dirs.tests_dir.join("app"));
    assert!(opts[0].classpath.starts_with(&app.join("target/classes").display().to_string()));
    assert!(opts[0].classpath.ends_with("dep.jar"));
}

#[tokio::test]
async fn test_project_io_failure_does_not_stop_the_run() {
    let work = TempDir::new().unwrap();
    let a = work.path().join("a");
    let b = work.path().join("b");
    built_project(&a);
    built_project(&b);

    let engine = Arc::new(FakeEngine::default().with_paths(
        "org.lib.A",
        vec![StaticPath::from_classes(["com.app.Main", "org.lib.A"])],
    ));
    let loaded = LoadedConfiguration {
        settings: RunSettings::default(),
        projects: vec![project(&a), project(&b)],
    };

    let out = TempDir::new().unwrap();
    let dirs = directories(out.path());
    // A plain file where project a's tests directory should go.
    touch(&dirs.tests_dir.join("a"));

    let report = Launcher::new(loaded, engine.clone())
        .with_directories(dirs.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].project, "a");
    assert!(!report.failed[0].is_classpath_failure());
    assert_eq!(report.completed.len(), 1);
    assert_eq!(report.completed[0].project, "b");
    assert_eq!(engine.attempted_entries(), vec!["com.app.Main"]);
    assert!(dirs.results_dir.join("b.json").exists());
}

#[tokio::test]
async fn test_unavailable_maven_leaves_project_unresolved() {
    let work = TempDir::new().unwrap();
    let app = work.path().join("app");
    touch(&app.join("libs/dep.jar"));
    std::fs::write(app.join("cp.txt"), app.join("libs/dep.jar").display().to_string()).unwrap();
    std::fs::write(app.join("pom.xml"), "<project/>").unwrap();

    let engine = Arc::new(FakeEngine::default());
    let loaded = LoadedConfiguration {
        settings: RunSettings::default(),
        projects: vec![project(&app)],
    };

    let out = TempDir::new().unwrap();
    let report = Launcher::new(loaded, engine.clone())
        .with_builder(ProjectBuilder::new().with_maven_command("sinkreach-no-such-maven"))
        .with_directories(directories(out.path()))
        .run()
        .await
        .unwrap();

    assert!(report.completed.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert!(report.failed[0].is_classpath_failure());
    assert!(engine.calls().is_empty());
}
