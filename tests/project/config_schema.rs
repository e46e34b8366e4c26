use smartblog::config::Config;
use tempfile::TempDir;

#[test]
fn first_run_writes_default_config() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_init_in(dir.path()).expect("defaults load");

    assert!(dir.path().join("config.toml").exists());
    assert_eq!(config.data_dir, dir.path().join("data"));
    assert_eq!(config.default_model, "gemini-2.5-flash");
    assert_eq!(config.gateway.port, 3000);
    assert_eq!(config.client.api_base, "http://localhost:3000/api");
}

#[test]
fn existing_config_is_read_back() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        r#"
default_temperature = 0.2

[github]
default_owner = "octo"

[store]
page_size = 10
"#,
    )
    .unwrap();

    let config = Config::load_or_init_in(dir.path()).expect("config loads");
    assert!((config.default_temperature - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.github.default_owner.as_deref(), Some("octo"));
    assert_eq!(config.github.api_base, "https://api.github.com");
    assert_eq!(config.store.page_size, 10);
    assert_eq!(config.store.storage_key, "smartblog_posts");
}

#[test]
fn out_of_range_temperature_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "default_temperature = 3.5\n").unwrap();

    let err = Config::load_or_init_in(dir.path()).unwrap_err();
    assert!(err.to_string().contains("default_temperature"));
}
