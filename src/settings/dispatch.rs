use serde::Deserialize;
use std::env;
use super::SettingsError;

/// 요청 디스패치 설정
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DispatchSettings {
    /// 컨트롤러 이름 접미사 (빈 문자열이면 검사하지 않음)
    #[serde(default = "default_controller_suffix")]
    pub controller_suffix: String,

    /// 컨트롤러 이름이 없을 때 쓰는 기본값
    #[serde(default)]
    pub default_controller: Option<String>,

    /// 액션 이름이 없을 때 쓰는 기본값
    #[serde(default)]
    pub default_action: Option<String>,

    /// GET 요청에서 JSON 문자열로 전달되는 쿼리 키
    #[serde(default)]
    pub transform_get_json_key: Option<String>,
}

fn default_controller_suffix() -> String {
    crate::controller::DEFAULT_CONTROLLER_SUFFIX.to_string()
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            controller_suffix: default_controller_suffix(),
            default_controller: None,
            default_action: None,
            transform_get_json_key: None,
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl DispatchSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        let settings = Self {
            controller_suffix: env::var("ACTION_CONTROLLER_SUFFIX")
                .unwrap_or_else(|_| default_controller_suffix()),
            default_controller: optional_env("ACTION_DEFAULT_CONTROLLER"),
            default_action: optional_env("ACTION_DEFAULT_ACTION"),
            transform_get_json_key: optional_env("ACTION_GET_JSON_KEY"),
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.controller_suffix.chars().any(char::is_whitespace) {
            return Err(SettingsError::InvalidConfig(format!(
                "컨트롤러 접미사에 공백이 들어갈 수 없습니다: {:?}",
                self.controller_suffix
            )));
        }
        if let Some(key) = &self.transform_get_json_key {
            if key.is_empty() {
                return Err(SettingsError::InvalidConfig(
                    "transform_get_json_key가 비어 있습니다".to_string(),
                ));
            }
        }
        Ok(())
    }
}
