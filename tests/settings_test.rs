use action_filters::settings::logging::{LogFormat, LogOutput};
use action_filters::settings::{Settings, SettingsError};
use serde_json::json;

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const ENV_VARS: &[&str] = &[
        "ACTION_CONFIG_FILE",
        "ACTION_LOG_FORMAT",
        "ACTION_LOG_LEVEL",
        "ACTION_LOG_OUTPUT",
        "ACTION_CONTROLLER_SUFFIX",
        "ACTION_DEFAULT_CONTROLLER",
        "ACTION_DEFAULT_ACTION",
        "ACTION_GET_JSON_KEY",
        "ACTION_API_ORIGIN",
        "ACTION_API_PREFIX",
        "ACTION_API_METHOD",
        "ACTION_API_TIMEOUT_MS",
        "ACTION_API_GET_JSON_KEY",
        "ACTION_API_RETRY",
        "ACTION_API_RETRY_DELAY_MS",
        "ACTION_API_THROW_ALL_ERRORS",
    ];

    // 테스트 전후 환경변수 초기화를 위한 헬퍼 함수
    fn cleanup_env() {
        for name in ENV_VARS {
            std::env::remove_var(name);
        }
    }

    // 테스트용 임시 TOML 파일 생성 헬퍼
    fn create_test_toml(content: &str) -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");
        std::fs::write(&file_path, content).unwrap();
        (file_path.to_str().unwrap().to_string(), dir)
    }

    #[test]
    #[serial]
    fn test_settings_defaults() {
        cleanup_env();

        let settings = Settings::from_env().unwrap();

        assert_eq!(settings.logging.level, tracing::Level::INFO);
        assert_eq!(settings.logging.format, LogFormat::Text);
        assert_eq!(settings.logging.output, LogOutput::Stdout);
        assert_eq!(settings.dispatch.controller_suffix, "Controller");
        assert!(settings.dispatch.default_controller.is_none());
        assert_eq!(settings.client.http_method, "POST");
        assert_eq!(settings.client.success_codes, vec![json!(0)]);
        assert_eq!(settings.client.retry.count, 0);
        cleanup_env();
    }

    #[test]
    #[serial]
    fn test_settings_from_env() {
        cleanup_env();

        std::env::set_var("ACTION_LOG_LEVEL", "debug");
        std::env::set_var("ACTION_LOG_FORMAT", "json");
        std::env::set_var("ACTION_CONTROLLER_SUFFIX", "Ctrl");
        std::env::set_var("ACTION_DEFAULT_CONTROLLER", "home");
        std::env::set_var("ACTION_DEFAULT_ACTION", "index");
        std::env::set_var("ACTION_GET_JSON_KEY", "q");
        std::env::set_var("ACTION_API_ORIGIN", "http://api.internal:8080");
        std::env::set_var("ACTION_API_METHOD", "get");
        std::env::set_var("ACTION_API_RETRY", "2");
        std::env::set_var("ACTION_API_RETRY_DELAY_MS", "250");

        let settings = Settings::from_env().unwrap();

        assert_eq!(settings.logging.level, tracing::Level::DEBUG);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.dispatch.controller_suffix, "Ctrl");
        assert_eq!(settings.dispatch.default_controller.as_deref(), Some("home"));
        assert_eq!(settings.dispatch.default_action.as_deref(), Some("index"));
        assert_eq!(settings.dispatch.transform_get_json_key.as_deref(), Some("q"));
        assert_eq!(settings.client.origin, "http://api.internal:8080");
        assert_eq!(settings.client.retry.count, 2);
        assert_eq!(settings.client.retry.delay_ms, Some(250));
        assert!(settings.client.timeout_ms.is_none());

        cleanup_env();
    }

    #[test]
    #[serial]
    fn test_settings_validation() {
        cleanup_env();

        // 1. 잘못된 로그 레벨
        std::env::set_var("ACTION_LOG_LEVEL", "invalid_level");
        assert!(Settings::from_env().is_err());
        cleanup_env();

        // 2. 지원하지 않는 HTTP 메서드
        std::env::set_var("ACTION_API_METHOD", "FETCH");
        assert!(matches!(Settings::from_env(), Err(SettingsError::InvalidConfig(_))));
        cleanup_env();

        // 3. 숫자가 아닌 재시도 횟수
        std::env::set_var("ACTION_API_RETRY", "many");
        assert!(matches!(Settings::from_env(), Err(SettingsError::EnvVarInvalid { .. })));
        cleanup_env();

        // 4. 잘못된 origin
        std::env::set_var("ACTION_API_ORIGIN", "not a url");
        assert!(Settings::from_env().is_err());
        cleanup_env();
    }

    #[test]
    #[serial]
    fn test_settings_from_toml() {
        cleanup_env();

        let toml_content = r#"
            [logging]
            format = "json"
            level = "debug"
            output = "/tmp/actions.log"

            [dispatch]
            controller_suffix = ""
            default_action = "index"

            [client]
            origin = "http://localhost:3000"
            prefix = "/api"
            http_method = "GET"
            success_codes = [0, 200]
            transform_get_json_key = "json"

            [client.retry]
            count = 3
            delay_ms = 100
            throw_all_errors = true
        "#;

        let (file_path, _temp_dir) = create_test_toml(toml_content);
        let settings = Settings::from_toml_file(&file_path).unwrap();

        assert_eq!(settings.logging.output, LogOutput::File("/tmp/actions.log".to_string()));
        assert_eq!(settings.dispatch.controller_suffix, "");
        assert_eq!(settings.dispatch.default_action.as_deref(), Some("index"));
        assert_eq!(settings.client.prefix, "/api");
        assert_eq!(settings.client.success_codes, vec![json!(0), json!(200)]);
        assert_eq!(settings.client.retry.count, 3);
        assert!(settings.client.retry.throw_all_errors);
        cleanup_env();
    }

    #[test]
    #[serial]
    fn test_partial_toml_uses_defaults() {
        cleanup_env();

        let (file_path, _temp_dir) = create_test_toml("[client]\norigin = \"http://localhost\"\n");
        let settings = Settings::from_toml_file(&file_path).unwrap();

        assert_eq!(settings.dispatch.controller_suffix, "Controller");
        assert_eq!(settings.client.http_method, "POST");
        assert_eq!(settings.client.success_codes, vec![json!(0)]);
        cleanup_env();
    }

    #[test]
    #[serial]
    fn test_invalid_toml_values_rejected() {
        cleanup_env();

        let (file_path, _temp_dir) = create_test_toml("[client]\nsuccess_codes = []\n");
        assert!(matches!(
            Settings::from_toml_file(&file_path),
            Err(SettingsError::InvalidConfig(_))
        ));

        let (file_path, _temp_dir) = create_test_toml("[logging\nlevel = ");
        assert!(matches!(
            Settings::from_toml_file(&file_path),
            Err(SettingsError::ParseError { .. })
        ));

        assert!(matches!(
            Settings::from_toml_file("/nonexistent/actions.toml"),
            Err(SettingsError::FileError { .. })
        ));
        cleanup_env();
    }

    #[test]
    #[serial]
    fn test_load_prefers_config_file() {
        cleanup_env();

        let (file_path, _temp_dir) = create_test_toml("[dispatch]\ndefault_controller = \"home\"\n");
        std::env::set_var("ACTION_CONFIG_FILE", &file_path);
        std::env::set_var("ACTION_DEFAULT_CONTROLLER", "ignored");

        let settings = Settings::load().unwrap();
        assert_eq!(settings.dispatch.default_controller.as_deref(), Some("home"));

        cleanup_env();
        let settings = Settings::load().unwrap();
        assert!(settings.dispatch.default_controller.is_none());
    }
}
