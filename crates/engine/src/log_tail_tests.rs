use super::*;
use tempfile::tempdir;

#[test]
fn offset_zero_returns_whole_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.log");
    std::fs::write(&path, b"hello world").unwrap();

    let tail = read_tail(&path, 0, TaskState::Running).unwrap();
    assert_eq!(tail.body, b"hello world");
    assert_eq!(tail.state, TaskState::Running);
}

#[test]
fn offset_mid_file_returns_remaining_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.log");
    std::fs::write(&path, b"hello world").unwrap();

    let tail = read_tail(&path, 6, TaskState::Success).unwrap();
    assert_eq!(tail.body, b"world");
}

#[test]
fn offset_past_eof_returns_empty_body_with_current_state() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.log");
    std::fs::write(&path, b"short").unwrap();

    let tail = read_tail(&path, 999, TaskState::Error).unwrap();
    assert!(tail.body.is_empty());
    assert_eq!(tail.state, TaskState::Error);
}

#[test]
fn missing_log_file_returns_empty_body_instead_of_erroring() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("does-not-exist.log");

    let tail = read_tail(&path, 0, TaskState::Running).unwrap();
    assert!(tail.body.is_empty());
}
