use std::collections::HashMap;

use super::*;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings::load_from(&dir.path().join("settings.toml")).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.api.mode, ApiMode::Local);
    assert_eq!(settings.timeout(), Duration::from_secs(30));
    assert_eq!(settings.weather.location, "auckland");
}

#[test]
fn reads_partial_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        "[api]\nmode = \"backend\"\nfield_style = \"camel\"\nbase = \"https://crm.example.nz\"\n\n[local]\ndatabase = \"/tmp/w.db\"\n",
    )
    .unwrap();
    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.api.mode, ApiMode::BackendTest);
    assert_eq!(settings.api.field_style, FieldStyle::Camel);
    assert_eq!(settings.database_path(), PathBuf::from("/tmp/w.db"));
    assert_eq!(settings.api.timeout_secs, DEFAULT_TIMEOUT_SECS);
}

#[test]
fn invalid_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[api]\nmode = \"cloud\"\n").unwrap();
    assert!(matches!(
        Settings::load_from(&path),
        Err(WorksiteError::Settings(_))
    ));
}

#[test]
fn base_urls_per_mode() {
    let mut settings = Settings::default();
    assert_eq!(settings.base_url_for(ApiMode::Local), None);
    assert_eq!(
        settings.base_url_for(ApiMode::BackendTest).as_deref(),
        Some(DEFAULT_BASE_TEST)
    );
    assert_eq!(settings.base_url_for(ApiMode::BackendProd), None);

    settings.api.base = Some("https://api.example.nz".to_string());
    assert_eq!(
        settings.base_url_for(ApiMode::BackendProd).as_deref(),
        Some("https://api.example.nz")
    );
    settings.api.base_prod = Some("https://prod.example.nz".to_string());
    assert_eq!(
        settings.base_url_for(ApiMode::BackendProd).as_deref(),
        Some("https://prod.example.nz")
    );
}

#[test]
fn env_overrides_file_values() {
    let mut settings = Settings::default();
    settings
        .apply_env(env(&[
            (ENV_API_MODE, "backend-prod"),
            (ENV_API_BASE_PROD, "https://prod.example.nz"),
            (ENV_API_BASE_TEST, ""),
            (ENV_DB, "/data/site.db"),
        ]))
        .unwrap();
    assert_eq!(settings.api.mode, ApiMode::BackendProd);
    assert_eq!(settings.api.base_prod.as_deref(), Some("https://prod.example.nz"));
    assert_eq!(settings.api.base_test, None);
    assert_eq!(settings.database_path(), PathBuf::from("/data/site.db"));
}

#[test]
fn env_with_unknown_mode_is_an_error() {
    let mut settings = Settings::default();
    assert!(settings.apply_env(env(&[(ENV_API_MODE, "mystery")])).is_err());
}

#[test]
fn save_mode_preserves_other_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "[weather]\nlocation = \"wellington\"\n\n[custom]\nkeep = true\n").unwrap();

    save_mode(&path, ApiMode::BackendProd).unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.api.mode, ApiMode::BackendProd);
    assert_eq!(settings.weather.location, "wellington");
    let raw = load_settings_string(&path).unwrap();
    assert!(raw.contains("keep = true"));
    assert!(!path.with_extension("toml.tmp").exists());
}

#[test]
fn save_value_creates_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh").join("settings.toml");
    save_value(&path, "api", "timeout_secs", toml::Value::Integer(5)).unwrap();
    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.timeout(), Duration::from_secs(5));
}

#[test]
fn save_refuses_to_overwrite_unparseable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let broken = "[api\nbase_prod = \"https://jobs.example\"\n[custom]\nkeep = true\n";
    std::fs::write(&path, broken).unwrap();

    let err = save_mode(&path, ApiMode::BackendTest).unwrap_err();
    assert!(matches!(err, WorksiteError::Settings(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    assert!(!path.with_extension("toml.tmp").exists());
}
