use super::*;

#[test]
fn defaults_match_spec() {
    let config = Config::parse_from(["racsd"]);
    assert_eq!(config.port, 8080);
    assert!(config.ssl_cert.is_none());
    assert!(config.ssl_key.is_none());
    assert!(!config.no_login);
}

#[test]
fn flags_override_defaults() {
    let config = Config::parse_from([
        "racsd",
        "--port",
        "9090",
        "--no-login",
        "--ssl-cert",
        "/etc/racs/cert.pem",
        "--ssl-key",
        "/etc/racs/key.pem",
    ]);
    assert_eq!(config.port, 9090);
    assert!(config.no_login);
    assert_eq!(config.ssl_cert.unwrap(), PathBuf::from("/etc/racs/cert.pem"));
    assert_eq!(config.ssl_key.unwrap(), PathBuf::from("/etc/racs/key.pem"));
}

#[test]
fn roots_are_derived_from_state_dir() {
    let config = Config::parse_from(["racsd", "--state-dir", "/tmp/racs-test"]);
    let roots = config.roots();
    assert_eq!(roots.projects, PathBuf::from("/tmp/racs-test/projects"));
    assert_eq!(roots.tasks, PathBuf::from("/tmp/racs-test/tasks"));
    assert_eq!(roots.uploads, PathBuf::from("/tmp/racs-test/uploads"));
    assert_eq!(roots.db_path, PathBuf::from("/tmp/racs-test/main.db"));
}
