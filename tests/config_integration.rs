//! Integration tests for configuration parsing and handling.
//!
//! These tests verify that `criba.toml` settings reach the compiler.

use criba::prelude::*;
use criba::query::config::CONFIG_FILE_NAME;
use serde_json::json;

/// Test minimal configuration
#[test]
fn test_config_minimal() {
    let config: CribaConfig = toml::from_str("").expect("Failed to parse config");
    assert_eq!(config.compiler.render, RenderMode::Literal);
    assert!(!config.debug.log_sql);
}

/// Test full configuration with all options
#[test]
fn test_config_full() {
    let config_str = r#"
        [compiler]
        render = "placeholder"
        dialect = "postgresql"
        param_offset = 4
        default_filter_type = "textos"

        [debug]
        log_sql = true

        [environments.test.compiler]
        render = "literal"
        dialect = "sqlite"

        [environments.test.debug]
        log_sql = false
    "#;

    let config = CribaConfig::from_str(config_str).expect("Failed to parse config");

    assert_eq!(config.compiler.render, RenderMode::Placeholder);
    assert_eq!(config.compiler.dialect, DatabaseType::PostgreSQL);
    assert_eq!(config.compiler.param_offset, 4);
    assert_eq!(config.compiler.default_filter_type, FilterType::Texts);
    assert!(config.debug.log_sql);
    assert!(config.environments.contains_key("test"));

    let test = config.with_environment("test");
    assert_eq!(test.compiler.render, RenderMode::Literal);
    assert_eq!(test.compiler.dialect, DatabaseType::SQLite);
    assert_eq!(test.compiler.param_offset, 4);
    assert!(!test.debug.log_sql);
}

/// Test that configured options drive compilation
#[test]
fn test_config_drives_compiler() {
    let config = CribaConfig::from_str(
        r#"
        [compiler]
        render = "placeholder"
        param_offset = 2
        default_filter_type = "textos"
        "#,
    )
    .unwrap();

    let compiler = FilterCompiler::new(config.compiler_options());
    let request = FilterRequest::from_value(json!({"filtro": {"c.nombre": "Lu"}})).unwrap();
    let compiled = compiler.compile(&request).unwrap();

    assert_eq!(compiled.bundle.sentencia, "c.nombre LIKE $3");
    assert_eq!(compiled.params.len(), 1);
    assert_eq!(compiled.params[0].to_string(), "%Lu%");
}

/// Test invalid values are reported as configuration errors
#[test]
fn test_config_invalid_values() {
    for bad in [
        "[compiler]\nrender = \"binary\"",
        "[compiler]\ndialect = \"oracle\"",
        "[compiler]\ndefault_filter_type = \"fechas\"",
        "[unknown]\nkey = 1",
    ] {
        let err = CribaConfig::from_str(bad).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfiguration, "input: {}", bad);
    }
}

/// Test loading from a file on disk
#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "[compiler]\ndialect = \"mysql\"\n").unwrap();

    let config = CribaConfig::from_file(&path).unwrap();
    assert_eq!(config.compiler.dialect, DatabaseType::MySQL);
}
