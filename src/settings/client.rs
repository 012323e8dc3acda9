use serde::Deserialize;
use serde_json::Value;
use std::env;
use super::{parse_env_var, SettingsError};

const SUPPORTED_METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/// 외부 호출 재시도 설정
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct RetrySettings {
    /// 첫 시도 이후 추가 시도 횟수
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub delay_ms: Option<u64>,
    #[serde(default)]
    pub throw_all_errors: bool,
}

/// 외부 API 클라이언트 설정
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ClientSettings {
    /// 예: `http://api.internal:8080`
    #[serde(default)]
    pub origin: String,

    /// 모든 경로 앞에 붙는 접두사
    #[serde(default)]
    pub prefix: String,

    #[serde(default = "default_http_method")]
    pub http_method: String,

    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// 성공으로 보는 응답 코드. 숫자와 문자열 모두 가능
    #[serde(default = "default_success_codes")]
    pub success_codes: Vec<Value>,

    #[serde(default)]
    pub transform_get_json_key: Option<String>,

    #[serde(default)]
    pub retry: RetrySettings,
}

fn default_http_method() -> String {
    "POST".to_string()
}

fn default_success_codes() -> Vec<Value> {
    vec![Value::from(0)]
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            origin: String::new(),
            prefix: String::new(),
            http_method: default_http_method(),
            timeout_ms: None,
            success_codes: default_success_codes(),
            transform_get_json_key: None,
            retry: RetrySettings::default(),
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Self {
            origin: env::var("ACTION_API_ORIGIN").unwrap_or_default(),
            prefix: env::var("ACTION_API_PREFIX").unwrap_or_default(),
            http_method: env::var("ACTION_API_METHOD").unwrap_or_else(|_| default_http_method()),
            timeout_ms: parse_env_var::<u64, _>("ACTION_API_TIMEOUT_MS", || 0)
                .map(|ms| (ms > 0).then_some(ms))?,
            success_codes: default_success_codes(),
            transform_get_json_key: env::var("ACTION_API_GET_JSON_KEY").ok(),
            retry: RetrySettings {
                count: parse_env_var("ACTION_API_RETRY", || 0)?,
                delay_ms: parse_env_var::<u64, _>("ACTION_API_RETRY_DELAY_MS", || 0)
                    .map(|ms| (ms > 0).then_some(ms))?,
                throw_all_errors: parse_env_var("ACTION_API_THROW_ALL_ERRORS", || false)?,
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        let method = self.http_method.to_uppercase();
        if !SUPPORTED_METHODS.contains(&method.as_str()) {
            return Err(SettingsError::InvalidConfig(format!(
                "지원하지 않는 HTTP 메서드: {}",
                self.http_method
            )));
        }
        if self.success_codes.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "success_codes가 비어 있습니다".to_string(),
            ));
        }
        if let Some(code) = self
            .success_codes
            .iter()
            .find(|code| !(code.is_i64() || code.is_u64() || code.is_string()))
        {
            return Err(SettingsError::InvalidConfig(format!(
                "success_codes에는 정수나 문자열만 올 수 있습니다: {}",
                code
            )));
        }
        if !self.origin.is_empty() && url::Url::parse(&self.origin).is_err() {
            return Err(SettingsError::InvalidConfig(format!(
                "잘못된 origin: {}",
                self.origin
            )));
        }
        Ok(())
    }
}
