use std::convert::Infallible;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use tracing::Level;

use super::{parse_env_var, SettingsError};

/// 로그 출력 형식
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.eq_ignore_ascii_case("text") {
            Ok(Self::Text)
        } else if raw.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(format!("text 또는 json이어야 합니다: {raw}"))
        }
    }
}

/// 로그 출력 대상. `stdout`이 아니면 파일 경로로 봅니다.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum LogOutput {
    #[default]
    Stdout,
    File(String),
}

impl From<String> for LogOutput {
    fn from(raw: String) -> Self {
        if raw.eq_ignore_ascii_case("stdout") {
            Self::Stdout
        } else {
            Self::File(raw)
        }
    }
}

impl FromStr for LogOutput {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(raw.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub format: LogFormat,
    #[serde(deserialize_with = "deserialize_level")]
    pub level: Level,
    pub output: LogOutput,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Text,
            level: Level::INFO,
            output: LogOutput::Stdout,
        }
    }
}

impl LogSettings {
    /// `ACTION_LOG_FORMAT`, `ACTION_LOG_LEVEL`, `ACTION_LOG_OUTPUT`
    pub fn from_env() -> Result<Self, SettingsError> {
        Ok(Self {
            format: parse_env_var("ACTION_LOG_FORMAT", LogFormat::default)?,
            level: parse_env_var("ACTION_LOG_LEVEL", || Level::INFO)?,
            output: parse_env_var("ACTION_LOG_OUTPUT", LogOutput::default)?,
        })
    }
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse()
        .map_err(|_| serde::de::Error::custom(format!("유효하지 않은 로그 레벨: {raw}")))
}
