use epub_cleaner::load_config::{
    load_config, ENV_BUCKET, ENV_KEY_PREFIX, ENV_MAX_UPLOAD_MB, ENV_URL_EXPIRY_SECS,
};
use serial_test::serial;
use std::env;
use std::fs::write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn clear_env() {
    for var in [ENV_BUCKET, ENV_MAX_UPLOAD_MB, ENV_URL_EXPIRY_SECS, ENV_KEY_PREFIX] {
        env::remove_var(var);
    }
}

fn yaml_file(content: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), content).unwrap();
    file
}

#[test]
#[serial]
fn test_env_only_uses_defaults() {
    clear_env();
    env::set_var(ENV_BUCKET, "books");

    let config = load_config(None).expect("Config should load from env");

    assert_eq!(config.bucket, "books");
    assert_eq!(config.max_upload_mb, 200);
    assert_eq!(config.max_upload_bytes(), 200 * 1024 * 1024);
    assert_eq!(config.url_expiry, Duration::from_secs(3600));
    assert_eq!(config.key_prefix, "uploads");
    clear_env();
}

#[test]
#[serial]
fn test_missing_bucket_is_an_error() {
    clear_env();

    let err = load_config(None).expect_err("Bucket is required");

    assert!(err.to_string().contains("S3_BUCKET"));
}

#[test]
#[serial]
fn test_yaml_supplies_settings() {
    clear_env();
    let file = yaml_file(
        "bucket: from-file\nmax_upload_mb: 50\nurl_expiry_secs: 600\nkey_prefix: cleaned\n",
    );

    let config = load_config(Some(file.path())).expect("Config should load from YAML");

    assert_eq!(config.bucket, "from-file");
    assert_eq!(config.max_upload_mb, 50);
    assert_eq!(config.url_expiry, Duration::from_secs(600));
    assert_eq!(config.key_prefix, "cleaned");
}

#[test]
#[serial]
fn test_env_overrides_yaml() {
    clear_env();
    let file = yaml_file("bucket: from-file\nmax_upload_mb: 50\nkey_prefix: cleaned\n");
    env::set_var(ENV_BUCKET, "from-env");
    env::set_var(ENV_MAX_UPLOAD_MB, "10");

    let config = load_config(Some(file.path())).expect("Config should load");

    assert_eq!(config.bucket, "from-env");
    assert_eq!(config.max_upload_mb, 10);
    assert_eq!(config.key_prefix, "cleaned");
    assert_eq!(config.url_expiry, Duration::from_secs(3600));
    clear_env();
}

#[test]
#[serial]
fn test_blank_env_falls_through_to_yaml() {
    clear_env();
    let file = yaml_file("bucket: from-file\n");
    env::set_var(ENV_BUCKET, "  ");

    let config = load_config(Some(file.path())).expect("Blank env is treated as unset");

    assert_eq!(config.bucket, "from-file");
    clear_env();
}

#[test]
#[serial]
fn test_invalid_integer_is_an_error() {
    clear_env();
    env::set_var(ENV_BUCKET, "books");
    env::set_var(ENV_MAX_UPLOAD_MB, "lots");

    let err = load_config(None).expect_err("Non-numeric size must fail");

    assert!(err.to_string().contains("MAX_FILE_SIZE_MB must be a valid integer"));
    clear_env();
}

#[test]
#[serial]
fn test_zero_upload_limit_is_an_error() {
    clear_env();
    env::set_var(ENV_BUCKET, "books");
    env::set_var(ENV_MAX_UPLOAD_MB, "0");

    assert!(load_config(None).is_err());
    clear_env();
}

#[test]
#[serial]
fn test_invalid_yaml_is_an_error() {
    clear_env();
    let file = yaml_file("bucket: [unterminated\n");

    let err = load_config(Some(file.path())).expect_err("Broken YAML must fail");

    assert!(err.to_string().contains("parse config YAML"));
}

#[test]
#[serial]
fn test_unknown_yaml_key_is_an_error() {
    clear_env();
    let file = yaml_file("bucket: books\nregion: eu-west-1\n");

    assert!(load_config(Some(file.path())).is_err());
}

#[test]
#[serial]
fn test_missing_file_is_an_error() {
    clear_env();
    env::set_var(ENV_BUCKET, "books");

    let err = load_config(Some(std::path::Path::new("/nonexistent/epub-cleaner.yaml")))
        .expect_err("Missing file must fail");

    assert!(err.to_string().contains("Failed to read config file"));
    clear_env();
}
