use landlord_tui::config::{ConfigError, TuiConfig};
use landlord_tui::nav::Route;
use landlord_tui::persistence::{self, PersistedState};
use std::io::Write;

const CONFIG: &str = r#"
api_base_url = "http://127.0.0.1:8000"
request_timeout_ms = 2500
page_size = 10
page_step = 5
persistence_path = "state/landlord-tui.json"
log_path = "state/landlord-tui.log"
log_filter = "landlord_core=debug,info"

[theme]
name = "ledger"
"#;

#[test]
fn missing_state_file_is_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loaded = persistence::load(&dir.path().join("absent.json")).expect("load");
    assert!(loaded.is_none());
}

#[test]
fn route_survives_save_and_load() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("state.json");
    let state = PersistedState {
        route: Route::Detail {
            landlord_id: 42,
            page_index: 3,
        },
    };
    persistence::save(&path, &state).expect("save");

    let raw = std::fs::read_to_string(&path).expect("read");
    assert!(raw.contains("/landlord/42?page=4"));
    assert_eq!(persistence::load(&path).expect("load"), Some(state));
}

#[test]
fn corrupt_state_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"route": "/tenants"}"#).expect("write");
    assert!(persistence::load(&path).is_err());
}

#[test]
fn config_loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    file.write_all(CONFIG.as_bytes()).expect("write");

    let config = TuiConfig::from_path(file.path()).expect("config");
    assert_eq!(config.page_size, 10);
    assert_eq!(config.request_timeout_ms, 2500);
    assert!(config.validate().is_ok());
}

#[test]
fn missing_config_file_is_io_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let result = TuiConfig::from_path(&dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}
