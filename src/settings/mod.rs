use std::{env, fs, path::Path};
use serde::Deserialize;
use tracing::debug;

mod client;
mod dispatch;
mod error;
pub mod logging;

pub use client::{ClientSettings, RetrySettings};
pub use dispatch::DispatchSettings;
pub use error::SettingsError;
pub use logging::LogSettings;

pub type Result<T> = std::result::Result<T, SettingsError>;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    // 디스패치 설정
    #[serde(default)]
    pub dispatch: DispatchSettings,

    /// 외부 API 클라이언트 설정
    #[serde(default)]
    pub client: ClientSettings,
}

impl Settings {
    /// `ACTION_CONFIG_FILE`이 있으면 파일에서, 없으면 환경 변수에서 읽습니다.
    pub fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("ACTION_CONFIG_FILE") {
            Self::from_toml_file(&config_path)
        } else {
            Self::from_env()
        }
    }

    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        settings.validate()?;
        debug!(path = %path.as_ref().display(), "설정 파일 로드 완료");
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        let settings = Self {
            logging: LogSettings::from_env()?,
            dispatch: DispatchSettings::from_env()?,
            client: ClientSettings::from_env()?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    pub fn validate(&self) -> Result<()> {
        self.dispatch.validate()?;
        self.client.validate()?;
        Ok(())
    }
}

pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(name: &str, default: F) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}
