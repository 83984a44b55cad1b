use add_missing_headers::middleware::MiddlewareType;
use add_missing_headers::settings::{LogFormat, LogOutput, Settings, SettingsError};
use std::collections::HashMap;
use serial_test::serial;

// 테스트 전후 환경변수 초기화를 위한 헬퍼 함수
fn cleanup_env() {
    std::env::remove_var("PROXY_CONFIG_FILE");
    std::env::remove_var("PROXY_BIND_ADDR");
    std::env::remove_var("PROXY_HTTP_PORT");
    std::env::remove_var("PROXY_LOG_LEVEL");
    std::env::remove_var("PROXY_LOG_FORMAT");
    std::env::remove_var("PROXY_LOG_OUTPUT");
}

// 테스트용 임시 TOML 파일 생성 헬퍼
fn create_test_toml(content: &str) -> (String, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let file_path = dir.path().join("test_config.toml");
    std::fs::write(&file_path, content).unwrap();
    (file_path.to_str().unwrap().to_string(), dir)
}

#[tokio::test]
#[serial]
async fn test_settings_defaults() {
    cleanup_env();

    let settings = Settings::from_env().await.unwrap();

    assert_eq!(settings.server.http_port, 8080);
    assert_eq!(settings.logging.level, tracing::Level::INFO);
    assert_eq!(settings.logging.format, LogFormat::Text);
    assert_eq!(settings.logging.output, LogOutput::Stdout);
    assert!(settings.middleware.is_empty());
}

#[tokio::test]
#[serial]
async fn test_settings_from_env() {
    cleanup_env();
    std::env::set_var("PROXY_HTTP_PORT", "9090");
    std::env::set_var("PROXY_LOG_LEVEL", "debug");
    std::env::set_var("PROXY_LOG_FORMAT", "json");
    std::env::set_var("PROXY_LOG_OUTPUT", "/tmp/proxy.log");

    let settings = Settings::from_env().await.unwrap();
    assert_eq!(settings.server.http_port, 9090);
    assert_eq!(settings.logging.level, tracing::Level::DEBUG);
    assert_eq!(settings.logging.format, LogFormat::Json);
    assert_eq!(settings.logging.output, LogOutput::File("/tmp/proxy.log".to_string()));

    cleanup_env();
}

#[tokio::test]
#[serial]
async fn test_settings_validation() {
    cleanup_env();

    // 1. 잘못된 포트 번호
    std::env::set_var("PROXY_HTTP_PORT", "99999");
    assert!(Settings::from_env().await.is_err());
    cleanup_env();

    // 2. 포트 0
    std::env::set_var("PROXY_HTTP_PORT", "0");
    assert!(Settings::from_env().await.is_err());
    cleanup_env();

    // 3. 잘못된 로그 레벨
    std::env::set_var("PROXY_LOG_LEVEL", "invalid_level");
    assert!(Settings::from_env().await.is_err());
    cleanup_env();
}

#[tokio::test]
#[serial]
async fn test_load_from_toml_file() {
    cleanup_env();

    let content = r#"
        [server]
        http_port = 8081

        [logging]
        format = "json"
        level = "warn"

        [middleware.defaults]
        middleware_type = "add-missing-headers"
        order = 1

        [middleware.defaults.settings]
        strictHeaderCheck = false

        [middleware.defaults.settings.requestHeaders]
        X-Forwarded-Proto = "https"

        [middleware.defaults.settings.bypassHeaders]
        X-Skip-Processing = "true"
    "#;
    let (path, _dir) = create_test_toml(content);
    std::env::set_var("PROXY_CONFIG_FILE", &path);

    let settings = Settings::load().await.unwrap();
    assert_eq!(settings.server.http_port, 8081);
    assert_eq!(settings.logging.level, tracing::Level::WARN);
    assert_eq!(settings.logging.format, LogFormat::Json);

    let middleware = &settings.middleware["defaults"];
    assert_eq!(middleware.middleware_type, MiddlewareType::AddMissingHeaders);
    assert!(middleware.enabled);
    assert_eq!(middleware.order, 1);

    cleanup_env();
}

#[tokio::test]
#[serial]
async fn test_invalid_middleware_in_toml_is_rejected() {
    cleanup_env();

    let content = r#"
        [middleware.broken]
        middleware_type = "add-missing-headers"

        [middleware.broken.settings.responseHeaders]
        "Bad Header" = "value"
    "#;
    let (path, _dir) = create_test_toml(content);

    let err = Settings::from_toml_file(&path).await.unwrap_err();
    assert!(matches!(err, SettingsError::InvalidMiddleware { ref name, .. } if name == "broken"));
}

#[tokio::test]
#[serial]
async fn test_missing_config_file() {
    cleanup_env();

    let err = Settings::from_toml_file("/nonexistent/config.toml").await.unwrap_err();
    assert!(matches!(err, SettingsError::FileError { .. }));
}

#[test]
fn test_merge_docker_labels() {
    let mut settings = Settings::default();

    let mut labels = HashMap::new();
    labels.insert(
        "rproxy.http.middlewares.defaults.type".to_string(),
        "add-missing-headers".to_string(),
    );
    labels.insert(
        "rproxy.http.middlewares.defaults.addMissingHeaders.responseHeaders.X-Frame-Options".to_string(),
        "DENY".to_string(),
    );

    settings.merge_docker_labels(&labels).unwrap();
    assert!(settings.middleware.contains_key("defaults"));

    // 같은 이름으로 다시 추가하면 중복 오류
    let err = settings.merge_docker_labels(&labels).unwrap_err();
    assert!(matches!(err, SettingsError::DuplicateMiddleware(ref name) if name == "defaults"));
}
