use super::*;

fn trigger(source: i64, target: i64, stage: Stage) -> Trigger {
    Trigger {
        source: ProjectId::new(source),
        target: ProjectId::new(target),
        stage,
    }
}

#[test]
fn prepare_edge_installs_prepare_dep_backref() {
    let t = trigger(1, 2, Stage::Prepare);
    assert_eq!(t.backref(), Some(Backref::PrepareDep));
}

#[test]
fn package_edge_installs_package_dep_backref() {
    let t = trigger(1, 2, Stage::Package);
    assert_eq!(t.backref(), Some(Backref::PackageDep));
}

#[test]
fn push_edge_has_no_backref() {
    let t = trigger(1, 2, Stage::Push);
    assert_eq!(t.backref(), None);
}

#[test]
fn diff_clears_old_and_installs_new() {
    let source = ProjectId::new(1);
    let old = vec![trigger(1, 2, Stage::Prepare)];
    let new = vec![trigger(1, 3, Stage::Package)];
    let (clears, installs) = diff_backrefs(source, &old, &new);
    assert_eq!(clears, vec![(ProjectId::new(2), Backref::PrepareDep)]);
    assert_eq!(
        installs,
        vec![(ProjectId::new(3), Backref::PackageDep, source)]
    );
}

#[test]
fn diff_with_no_backref_edges_produces_empty_vectors() {
    let source = ProjectId::new(1);
    let old = vec![trigger(1, 2, Stage::Push)];
    let new = vec![trigger(1, 2, Stage::Clean)];
    let (clears, installs) = diff_backrefs(source, &old, &new);
    assert!(clears.is_empty());
    assert!(installs.is_empty());
}
