use std::fs;

use familygraph::config::*;
use familygraph::errors::FamilyGraphError;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = FamilyGraphConfig::default();
    assert_eq!(config.corpus_path, "corpus.txt");
    assert!(config.resolve_cross_references);
    assert_eq!(config.parser.kind, ParserKind::Json);
    assert_eq!(config.parser.timeout_secs, 60);
    assert!(config.prefetch.enabled);
    assert_eq!(config.prefetch.max_families, None);
    assert_eq!(config.log_filter, "familygraph=info");
}

#[test]
fn test_missing_config_loads_default() {
    let dir = TempDir::new().unwrap();
    let config = load_config(dir.path()).unwrap();
    assert_eq!(config, FamilyGraphConfig::default());
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let mut config = FamilyGraphConfig::default();
    config.corpus_path = "data/kronika.txt".to_string();
    config.prefetch.max_families = Some(3);
    config.custom_name_equivalences = vec![("Aatu".to_string(), "Adolf".to_string())];

    save_config(dir.path(), &config).unwrap();
    assert!(get_config_path(dir.path()).exists());
    assert!(!get_config_path(dir.path()).with_extension("tmp").exists());

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_familygraph_dir() {
    let dir = TempDir::new().unwrap();
    let fg_dir = get_familygraph_dir(dir.path());
    assert!(fg_dir.ends_with(".familygraph"));
    assert!(get_config_path(dir.path()).ends_with(".familygraph/config.json"));
}

#[test]
fn test_partial_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(get_familygraph_dir(dir.path())).unwrap();
    fs::write(
        get_config_path(dir.path()),
        r#"{ "corpus_path": "other.txt", "prefetch": { "delay_ms": 25 } }"#,
    )
    .unwrap();

    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.corpus_path, "other.txt");
    assert_eq!(config.prefetch.delay_ms, 25);
    assert!(config.prefetch.enabled);
    assert_eq!(config.parser, ParserConfig::default());
}

#[test]
fn test_invalid_json_is_config_error() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(get_familygraph_dir(dir.path())).unwrap();
    fs::write(get_config_path(dir.path()), "{ not json").unwrap();

    let err = load_config(dir.path()).unwrap_err();
    assert!(matches!(err, FamilyGraphError::Config { .. }));
}

#[test]
fn test_http_parser_requires_endpoint() {
    let mut config = FamilyGraphConfig::default();
    config.parser.kind = ParserKind::Http;
    assert!(validate_config(&config).is_err());

    config.parser.endpoint = Some("http://localhost:8080/parse".to_string());
    assert!(validate_config(&config).is_ok());

    config.parser.timeout_secs = 0;
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_corpus_file_resolution() {
    let dir = TempDir::new().unwrap();
    let config = FamilyGraphConfig::default();
    assert_eq!(config.corpus_file(dir.path()), dir.path().join("corpus.txt"));

    let absolute = dir.path().join("elsewhere.txt");
    let config = FamilyGraphConfig {
        corpus_path: absolute.display().to_string(),
        ..FamilyGraphConfig::default()
    };
    assert_eq!(config.corpus_file(dir.path()), absolute);
}

#[test]
fn test_parser_kind_serializes_lowercase() {
    let json = serde_json::to_string(&ParserKind::Http).unwrap();
    assert_eq!(json, "\"http\"");
}
