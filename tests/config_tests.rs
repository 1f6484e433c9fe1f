// Config loading, validation and check settings tests

use ifcheck::config::AppConfig;
use ifcheck::models::Status;
use std::path::PathBuf;

const VALID_CONFIG: &str = r#"
[source]
path = "/var/lib/ifcheck/core-sw1.json"
host = "core-sw1"

[collection]
parallelism = 4

[state]
dir = "/var/tmp/ifcheck"

[check]
interfaces = "-alias:unused"
alerting = "name=Gi0/1,Gi0/2"
bandwidth = "80,90"
errors = "1,5,2,10"
status_severity = "warning"
speed = 1000000000
ignore_admin_down = false

[report]
verbose = true
human_readable = false
metrics = false
"#;

const MINIMAL_CONFIG: &str = r#"
[source]
path = "snapshot.json"
host = "sw1"

[state]
dir = "state"
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.source.path, "/var/lib/ifcheck/core-sw1.json");
    assert_eq!(config.source.host, "core-sw1");
    assert_eq!(config.collection.parallelism, 4);
    assert_eq!(config.state.dir, "/var/tmp/ifcheck");
    assert_eq!(config.check.bandwidth, "80,90");
    assert_eq!(config.check.speed, Some(1_000_000_000));
    assert!(!config.check.ignore_admin_down);
    assert!(config.report.verbose);
    assert!(!config.report.human_readable);
}

#[test]
fn test_config_defaults_when_omitted() {
    let config = AppConfig::load_from_str(MINIMAL_CONFIG).expect("valid");
    assert_eq!(config.collection.parallelism, 1);
    assert!(config.check.interfaces.is_none());
    assert!(config.check.alerting.is_none());
    assert_eq!(config.check.status_severity, "critical");
    assert!(config.check.ignore_admin_down);
    assert!(!config.report.verbose);
    assert!(config.report.human_readable);
    assert!(config.report.metrics);
}

#[test]
fn test_check_settings_from_full_config() {
    let settings = AppConfig::load_from_str(VALID_CONFIG)
        .unwrap()
        .check_settings()
        .expect("settings");
    assert_eq!(settings.host, "core-sw1");
    assert_eq!(
        settings.state_file,
        PathBuf::from("/var/tmp/ifcheck/core-sw1.samples")
    );
    assert_eq!(settings.parallelism, 4);
    assert_eq!(settings.status_severity, Status::Warning);
    assert_eq!(settings.speed_override, Some(1_000_000_000));
    assert_eq!(settings.alerting.items().len(), 2);
    assert_eq!(
        settings.bandwidth.inbound.critical.as_ref().map(|t| t.as_str()),
        Some("90")
    );
    assert_eq!(
        settings.errors.outbound.warning.as_ref().map(|t| t.as_str()),
        Some("2")
    );
    assert!(settings.discards.is_empty());
    assert!(!settings.metrics);
}

#[test]
fn test_check_settings_defaults() {
    let settings = AppConfig::load_from_str(MINIMAL_CONFIG)
        .unwrap()
        .check_settings()
        .expect("settings");
    assert_eq!(settings.parallelism, 1);
    assert_eq!(settings.status_severity, Status::Critical);
    assert!(settings.bandwidth.is_empty());
    assert!(settings.interfaces.items().is_empty());
    assert!(settings.speed_override.is_none());
}

#[test]
fn test_parallelism_zero_means_sequential() {
    let config = MINIMAL_CONFIG.to_string() + "\n[collection]\nparallelism = 0\n";
    let settings = AppConfig::load_from_str(&config)
        .unwrap()
        .check_settings()
        .unwrap();
    assert_eq!(settings.parallelism, 1);
}

#[test]
fn test_config_validation_rejects_empty_source_path() {
    let bad = VALID_CONFIG.replace("path = \"/var/lib/ifcheck/core-sw1.json\"", "path = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("source.path"));
}

#[test]
fn test_config_validation_rejects_empty_host() {
    let bad = VALID_CONFIG.replace("host = \"core-sw1\"", "host = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("source.host"));
}

#[test]
fn test_config_validation_rejects_empty_state_dir() {
    let bad = VALID_CONFIG.replace("dir = \"/var/tmp/ifcheck\"", "dir = \"\"");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("state.dir"));
}

#[test]
fn test_config_validation_rejects_huge_parallelism() {
    let bad = VALID_CONFIG.replace("parallelism = 4", "parallelism = 1000");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("collection.parallelism"));
}

#[test]
fn test_config_validation_rejects_zero_speed() {
    let bad = VALID_CONFIG.replace("speed = 1000000000", "speed = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("check.speed"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(err.to_string().starts_with("configuration error: "));
}

#[test]
fn test_malformed_threshold_names_its_field() {
    let bad = VALID_CONFIG.replace("bandwidth = \"80,90\"", "bandwidth = \"90:80\"");
    let config = AppConfig::load_from_str(&bad).expect("thresholds are parsed later");
    let err = config.check_settings().unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("configuration error: check.bandwidth: "), "{}", msg);
    assert_eq!(msg.matches("configuration error").count(), 1);
}

#[test]
fn test_wrong_threshold_arity_is_rejected() {
    let bad = VALID_CONFIG.replace("errors = \"1,5,2,10\"", "errors = \"1,5,2\"");
    let err = AppConfig::load_from_str(&bad)
        .unwrap()
        .check_settings()
        .unwrap_err();
    assert!(err.to_string().contains("check.errors"));
}

#[test]
fn test_malformed_filter_names_its_field() {
    let bad = VALID_CONFIG.replace("interfaces = \"-alias:unused\"", "interfaces = \"-alias:\"");
    let err = AppConfig::load_from_str(&bad)
        .unwrap()
        .check_settings()
        .unwrap_err();
    assert!(err.to_string().contains("check.interfaces"));
}

#[test]
fn test_status_severity_must_not_be_ok() {
    for value in ["ok", "loud"] {
        let bad = VALID_CONFIG.replace(
            "status_severity = \"warning\"",
            &format!("status_severity = \"{}\"", value),
        );
        let err = AppConfig::load_from_str(&bad)
            .unwrap()
            .check_settings()
            .unwrap_err();
        assert!(err.to_string().contains("check.status_severity"));
    }
}

#[test]
fn test_config_load_from_file_via_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("ifcheck.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();
    unsafe { std::env::set_var("CONFIG_FILE", path.to_str().unwrap()) };
    let result = AppConfig::load();
    unsafe { std::env::remove_var("CONFIG_FILE") };
    let config = result.expect("load from CONFIG_FILE");
    assert_eq!(config.source.host, "core-sw1");
    assert_eq!(config.collection.parallelism, 4);
}
