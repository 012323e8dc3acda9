use std::fmt;

/// 등록 시점에 발생하는 설정 오류
///
/// 프로세스 시작 단계에서 바로 실패시키기 위한 용도이며 재시도하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// 같은 범위에 같은 필터가 두 번 바인딩됨
    DuplicateFilter {
        filter: String,
        target: String,
    },
    /// 대소문자를 무시하면 같은 이름이 되는 액션이 둘 이상 존재
    DuplicateAction {
        controller: String,
        action: String,
    },
    /// 대소문자를 무시하면 같은 이름이 되는 컨트롤러가 둘 이상 등록됨
    DuplicateController {
        controller: String,
    },
    /// 컨트롤러 이름이 접미사 규칙을 따르지 않음
    SuffixIllegal {
        controller: String,
        suffix: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateFilter { filter, target } =>
                write!(f, "필터 {}가 {}에 이미 바인딩되어 있습니다", filter, target),
            ConfigError::DuplicateAction { controller, action } =>
                write!(f, "컨트롤러 {}에 액션 {}가 이미 존재합니다 (액션 이름은 대소문자를 구분하지 않음)", controller, action),
            ConfigError::DuplicateController { controller } =>
                write!(f, "컨트롤러 {}가 이미 존재합니다 (컨트롤러 이름은 대소문자를 구분하지 않음)", controller),
            ConfigError::SuffixIllegal { controller, suffix } =>
                write!(f, "컨트롤러 {}의 이름은 {}로 끝나야 합니다", controller, suffix),
        }
    }
}

impl std::error::Error for ConfigError {}
