use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

struct FakeRunner {
    succeed: bool,
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProcessRunner for FakeRunner {
    async fn run(&self, _spec: &CommandSpec, mut log_file: File) -> std::io::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        writeln!(log_file, "fake output")?;
        Ok(self.succeed)
    }
}

#[tokio::test]
async fn execute_writes_ansi_header_before_running() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("out.log");
    let calls = Arc::new(AtomicUsize::new(0));
    let runner = FakeRunner {
        succeed: true,
        calls: calls.clone(),
    };
    let spec = CommandSpec {
        program: "echo".to_string(),
        args: vec!["hi".to_string()],
        env: vec![],
    };
    let ok = execute(&runner, &spec, &log_path).await.unwrap();
    assert!(ok);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let contents = std::fs::read_to_string(&log_path).unwrap();
    assert!(contents.starts_with("\u{1b}[1m$ echo hi\u{1b}[0m"));
    assert!(contents.contains("fake output"));
}

#[tokio::test]
async fn execute_reports_failure() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("out.log");
    let runner = FakeRunner {
        succeed: false,
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let spec = CommandSpec {
        program: "false".to_string(),
        args: vec![],
        env: vec![],
    };
    let ok = execute(&runner, &spec, &log_path).await.unwrap();
    assert!(!ok);
}

#[tokio::test]
async fn execute_creates_parent_directories() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("tasks/42/out.log");
    let runner = FakeRunner {
        succeed: true,
        calls: Arc::new(AtomicUsize::new(0)),
    };
    let spec = CommandSpec {
        program: "echo".to_string(),
        args: vec![],
        env: vec![],
    };
    execute(&runner, &spec, &log_path).await.unwrap();
    assert!(log_path.exists());
}

#[tokio::test]
async fn real_runner_executes_true_and_false() {
    let dir = tempdir().unwrap();
    let log_path = dir.path().join("out.log");
    let ok = execute(
        &RealRunner,
        &CommandSpec {
            program: "true".to_string(),
            args: vec![],
            env: vec![],
        },
        &log_path,
    )
    .await
    .unwrap();
    assert!(ok);

    let ok = execute(
        &RealRunner,
        &CommandSpec {
            program: "false".to_string(),
            args: vec![],
            env: vec![],
        },
        &log_path,
    )
    .await
    .unwrap();
    assert!(!ok);
}
