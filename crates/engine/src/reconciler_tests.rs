use super::*;
use crate::command_table::CommandSpec;
use async_trait::async_trait;
use racs_core::{ProjectConfig, SystemClock, Stage, State, Trigger};
use tempfile::tempdir;

struct NeverRunRunner;

#[async_trait]
impl ProcessRunner for NeverRunRunner {
    async fn run(&self, _spec: &CommandSpec, _log_file: std::fs::File) -> std::io::Result<bool> {
        panic!("reconciler must not run any action on its own");
    }
}

fn roots(dir: &std::path::Path) -> Roots {
    Roots {
        projects: dir.join("projects"),
        tasks: dir.join("tasks"),
        uploads: dir.join("uploads"),
        db_path: dir.join("main.db"),
    }
}

#[tokio::test]
async fn reconcile_creates_directories_and_opens_store() {
    let dir = tempdir().unwrap();
    let roots = roots(dir.path());
    let engine = reconcile(&roots, Arc::new(NeverRunRunner), Arc::new(SystemClock)).await.unwrap();

    assert!(roots.projects.is_dir());
    assert!(roots.tasks.is_dir());
    assert!(roots.uploads.is_dir());
    assert!(engine.list_projects().is_empty());
}

#[tokio::test]
async fn reconcile_rehydrates_projects_without_resuming_running_state() {
    let dir = tempdir().unwrap();
    let roots = roots(dir.path());

    {
        let store = Store::open(&roots.db_path).unwrap();
        let id = store
            .insert_project(&ProjectConfig { name: "demo".to_string(), ..Default::default() })
            .unwrap();
        store.update_project_state(id, State::running(Stage::Build)).unwrap();
        store.insert_task(id, "BUILDING", 100).unwrap();
    }

    let engine = reconcile(&roots, Arc::new(NeverRunRunner), Arc::new(SystemClock)).await.unwrap();

    let projects = engine.list_projects();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].state, "BUILD_RUNNING");

    // Give any (incorrectly) auto-fired action a moment to misbehave; the
    // NeverRunRunner would have panicked inside the worker task by now.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
}

#[tokio::test]
async fn reconcile_rebuilds_trigger_edges_and_backrefs() {
    let dir = tempdir().unwrap();
    let roots = roots(dir.path());

    let (a, b) = {
        let store = Store::open(&roots.db_path).unwrap();
        let a = store.insert_project(&ProjectConfig::default()).unwrap();
        let b = store.insert_project(&ProjectConfig::default()).unwrap();
        store
            .replace_triggers(a, &[Trigger { source: a, target: b, stage: Stage::Prepare }])
            .unwrap();
        (a, b)
    };

    let engine = reconcile(&roots, Arc::new(NeverRunRunner), Arc::new(SystemClock)).await.unwrap();

    let b_snapshot = engine.project_snapshot(b).unwrap();
    assert_eq!(b_snapshot.id, b);
    let _ = a;
}
