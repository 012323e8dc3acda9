use tracing::info;

use super::class::{Controller, ControllerClass};
use crate::filter::{ConfigError, ConfigStore};

/// 기본 컨트롤러 이름 접미사
pub const DEFAULT_CONTROLLER_SUFFIX: &str = "Controller";

#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// `None`이면 기본 접미사, 빈 문자열이면 검사하지 않음
    pub suffix: Option<String>,
}

impl ControllerOptions {
    pub fn suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: Some(suffix.into()),
        }
    }

    pub fn effective_suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or(DEFAULT_CONTROLLER_SUFFIX)
    }
}

/// 타입을 컨트롤러로 정식 등록합니다.
///
/// 필터 바인딩은 이 호출 전후 어느 쪽에서든 일어날 수 있으며, 여기서 이름 규칙과
/// 액션 이름 중복을 검사한 뒤 `is_inited`를 켭니다.
pub fn mark_controller<C: Controller>(
    store: &ConfigStore,
    options: &ControllerOptions,
) -> Result<ControllerClass<C>, ConfigError> {
    let suffix = options.effective_suffix();
    if !suffix.is_empty() && !C::NAME.ends_with(suffix) {
        return Err(ConfigError::SuffixIllegal {
            controller: C::NAME.to_string(),
            suffix: suffix.to_string(),
        });
    }

    let class = ControllerClass::<C>::new();
    if let Some(action) = class.first_duplicate() {
        return Err(ConfigError::DuplicateAction {
            controller: C::NAME.to_string(),
            action: action.to_string(),
        });
    }

    let key = class.key();
    let mut config = store.get_or_default(&key);
    config.is_inited = true;
    store.set(key, config);

    info!(
        controller = C::NAME,
        actions = class.action_names().count(),
        "컨트롤러 등록 완료"
    );

    Ok(class)
}
