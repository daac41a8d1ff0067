use super::*;

fn snapshot() -> ProjectSnapshot {
    ProjectSnapshot {
        id: ProjectId::new(1),
        name: "demo".to_string(),
        labels: String::new(),
        url: "https://example/git".to_string(),
        branch: "main".to_string(),
        destination: "reg1".to_string(),
        tag: "demo:$VERSION".to_string(),
        build_spec: "BuildSpec".to_string(),
        package_spec: "PackageSpec".to_string(),
        state: "CLEAN_RUNNING".to_string(),
        version: 0,
    }
}

#[test]
fn project_create_serializes_with_event_tag_and_flattened_fields() {
    let event = Event::ProjectCreate { project: snapshot() };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "project/create");
    assert_eq!(value["id"], 1);
    assert_eq!(value["buildSpec"], "BuildSpec");
    assert_eq!(value["packageSpec"], "PackageSpec");
    // ProjectSnapshot fields must be flattened, not nested under "project".
    assert!(value.get("project").is_none());
}

#[test]
fn project_state_serializes_expected_shape() {
    let event = Event::ProjectState {
        id: ProjectId::new(5),
        state: "PUSH_SUCCESS".to_string(),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "project/state");
    assert_eq!(value["id"], 5);
    assert_eq!(value["state"], "PUSH_SUCCESS");
}

#[test]
fn task_create_serializes_expected_shape() {
    let event = Event::TaskCreate {
        project: ProjectId::new(1),
        id: TaskId::new(9),
        kind: "CLONING".to_string(),
        time: 1234,
        state: "RUNNING".to_string(),
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "task/create");
    assert_eq!(value["project"], 1);
    assert_eq!(value["id"], 9);
    assert_eq!(value["type"], "CLONING");
    assert_eq!(value["time"], 1234);
    assert_eq!(value["state"], "RUNNING");
}

#[test]
fn project_list_wraps_snapshots() {
    let event = Event::ProjectList {
        projects: vec![snapshot()],
    };
    let value = serde_json::to_value(&event).unwrap();
    assert_eq!(value["event"], "project/list");
    assert_eq!(value["projects"].as_array().unwrap().len(), 1);
}

#[test]
fn round_trips_through_json() {
    let event = Event::ProjectVersion {
        id: ProjectId::new(2),
        version: 4,
    };
    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
