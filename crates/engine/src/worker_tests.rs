use super::*;
use crate::command_table::CommandSpec;
use crate::event_bus::EventBus;
use crate::executor::ProcessRunner;
use async_trait::async_trait;
use racs_core::{ProjectConfig, SystemClock, Trigger};
use racs_storage::Store;
use std::time::Duration;
use tempfile::tempdir;
use tokio::time::timeout;

struct AllOkRunner;

#[async_trait]
impl ProcessRunner for AllOkRunner {
    async fn run(&self, _spec: &CommandSpec, mut log_file: std::fs::File) -> std::io::Result<bool> {
        use std::io::Write;
        writeln!(log_file, "ok")?;
        Ok(true)
    }
}

struct FailOnSubstringRunner(&'static str);

#[async_trait]
impl ProcessRunner for FailOnSubstringRunner {
    async fn run(&self, spec: &CommandSpec, mut log_file: std::fs::File) -> std::io::Result<bool> {
        use std::io::Write;
        writeln!(log_file, "ran")?;
        Ok(!spec.command_line().contains(self.0))
    }
}

fn make_shared(dir: &std::path::Path, runner: std::sync::Arc<dyn ProcessRunner>) -> std::sync::Arc<EngineShared> {
    std::sync::Arc::new(EngineShared::new(
        std::sync::Arc::new(Store::open_in_memory().unwrap()),
        EventBus::new(),
        runner,
        std::sync::Arc::new(SystemClock),
        dir.join("projects"),
        dir.join("tasks"),
    ))
}

fn seed_project(shared: &EngineShared, dir: &std::path::Path) -> Arc<Mutex<racs_core::Project>> {
    let id = shared
        .store
        .insert_project(&ProjectConfig {
            name: "demo".to_string(),
            url: "https://example/git".to_string(),
            branch: "main".to_string(),
            destination: String::new(),
            tag: "demo:$VERSION".to_string(),
            ..Default::default()
        })
        .unwrap();
    let project = shared.store.get_project(id).unwrap().unwrap();
    let project_dir = dir.join("projects").join(id.get().to_string());
    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::write(project_dir.join("BuildSpec"), b"FROM scratch\n").unwrap();
    Arc::new(Mutex::new(project))
}

#[tokio::test]
async fn cascade_closure_reaches_push_success() {
    let dir = tempdir().unwrap();
    let shared = make_shared(dir.path(), std::sync::Arc::new(AllOkRunner));
    let project = seed_project(&shared, dir.path());
    let id = project.lock().id;

    let (_snapshot, mut events) = shared.bus.subscribe_with_snapshot(|| Event::ProjectList { projects: vec![] });
    let (tx, handle) = spawn(project.clone(), shared.clone());
    shared.queues.write().insert(id, tx.clone());

    tx.send(ActionRequest { stage: Stage::Clean, trigger: String::new() }).await.unwrap();

    let mut saw_version = false;
    let mut state_order = Vec::new();
    let result = timeout(Duration::from_secs(5), async {
        loop {
            match events.recv().await.unwrap() {
                Event::ProjectState { state, .. } => {
                    state_order.push(state.clone());
                    if state == "PUSH_SUCCESS" {
                        break;
                    }
                }
                Event::ProjectVersion { version, .. } => {
                    assert_eq!(version, 1);
                    saw_version = true;
                }
                _ => {}
            }
        }
    })
    .await;
    assert!(result.is_ok(), "cascade did not reach PUSH_SUCCESS in time");
    assert!(saw_version, "expected a project/version event before PUSHING");
    assert!(state_order.contains(&"CLEAN_SUCCESS".to_string()));
    assert!(state_order.contains(&"CLONE_SUCCESS".to_string()));
    assert!(state_order.contains(&"PREPARE_SUCCESS".to_string()));
    assert!(state_order.contains(&"PULL_SUCCESS".to_string()));
    assert!(state_order.contains(&"BUILD_SUCCESS".to_string()));
    assert!(state_order.contains(&"PACKAGE_SUCCESS".to_string()));

    let stored = shared.store.get_project(id).unwrap().unwrap();
    assert_eq!(stored.version, 1);
    assert_eq!(stored.state, State::success(Stage::Push));

    drop(tx);
    let _ = timeout(Duration::from_secs(1), handle).await;
}

#[tokio::test]
async fn command_failure_halts_cascade_and_reports_error() {
    let dir = tempdir().unwrap();
    let shared = make_shared(dir.path(), std::sync::Arc::new(FailOnSubstringRunner("clone")));
    let project = seed_project(&shared, dir.path());
    let id = project.lock().id;

    let (_snapshot, mut events) = shared.bus.subscribe_with_snapshot(|| Event::ProjectList { projects: vec![] });
    let (tx, _handle) = spawn(project.clone(), shared.clone());
    shared.queues.write().insert(id, tx.clone());
    tx.send(ActionRequest { stage: Stage::Clean, trigger: String::new() }).await.unwrap();

    let result = timeout(Duration::from_secs(5), async {
        loop {
            if let Event::ProjectState { state, .. } = events.recv().await.unwrap() {
                if state.ends_with("_ERROR") {
                    return state;
                }
            }
        }
    })
    .await
    .unwrap();

    assert_eq!(result, "CLONE_ERROR");
    let stored = shared.store.get_project(id).unwrap().unwrap();
    assert_eq!(stored.state, State::error(Stage::Clone));
}

#[test]
fn pull_post_hook_reprepares_on_changed_build_spec() {
    let dir = tempdir().unwrap();
    let shared = make_shared(dir.path(), std::sync::Arc::new(AllOkRunner));
    let project = seed_project(&shared, dir.path());
    let id = project.lock().id;
    let build_spec_path = dir.path().join("projects").join(id.get().to_string()).join("BuildSpec");

    let original_hash = hash_check::hash_file(&build_spec_path).unwrap();
    project.lock().build_hash = original_hash.clone();

    // Unchanged content -> BUILDING.
    let next = pull_post_hook(&project, &shared);
    assert_eq!(next.stage, Stage::Build);

    std::fs::write(&build_spec_path, b"FROM scratch\nRUN true\n").unwrap();
    let next = pull_post_hook(&project, &shared);
    assert_eq!(next.stage, Stage::Prepare);
    assert_ne!(project.lock().build_hash, original_hash);
}

#[tokio::test]
async fn push_success_fires_configured_triggers_with_rendered_tag() {
    let dir = tempdir().unwrap();
    let shared = make_shared(dir.path(), std::sync::Arc::new(AllOkRunner));
    let source = seed_project(&shared, dir.path());
    let target_id = shared
        .store
        .insert_project(&ProjectConfig { name: "downstream".to_string(), ..Default::default() })
        .unwrap();

    let source_id = source.lock().id;
    source.lock().version = 4;
    source.lock().triggers = vec![Trigger { source: source_id, target: target_id, stage: Stage::Package }];

    let (target_tx, mut target_rx) = tokio::sync::mpsc::channel(4);
    shared.queues.write().insert(target_id, target_tx);

    fire_triggers(&source, &shared).await;

    let req = target_rx.recv().await.unwrap();
    assert_eq!(req.stage, Stage::Package);
    assert_eq!(req.trigger, "demo:4");
}

#[tokio::test]
async fn delete_success_removes_row_and_terminates_worker() {
    let dir = tempdir().unwrap();
    let shared = make_shared(dir.path(), std::sync::Arc::new(AllOkRunner));
    let project = seed_project(&shared, dir.path());
    let id = project.lock().id;

    let (tx, handle) = spawn(project.clone(), shared.clone());
    shared.queues.write().insert(id, tx.clone());
    tx.send(ActionRequest { stage: Stage::Delete, trigger: String::new() }).await.unwrap();

    let joined = timeout(Duration::from_secs(5), handle).await;
    assert!(joined.is_ok(), "worker did not terminate after DELETE_SUCCESS");
    assert!(shared.store.get_project(id).unwrap().is_none());
    assert!(!shared.queues.read().contains_key(&id));
}
