use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::config::ControllerConfig;
use crate::controller::ControllerKey;

/// 컨트롤러 타입과 설정을 연결하는 사이드 테이블
///
/// 컨트롤러 타입 자체에는 아무것도 요구하지 않고 `ControllerKey`로만 연결합니다.
/// 데코레이터 적용, 필터 바인딩 등 여러 호출 지점이 같은 레코드를
/// 읽고-수정하고-쓰므로 `get`은 항상 마지막으로 저장된 값을 돌려줍니다.
///
/// 등록은 프로세스 시작 시점에만 일어난다고 가정합니다. 처리 중인 디스패치와
/// 동시에 설정을 바꾸는 것은 지원하지 않습니다.
#[derive(Debug, Default)]
pub struct ConfigStore {
    configs: RwLock<HashMap<ControllerKey, Arc<ControllerConfig>>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재 저장된 설정 스냅샷을 반환합니다.
    pub fn get(&self, key: &ControllerKey) -> Option<Arc<ControllerConfig>> {
        self.configs.read().get(key).cloned()
    }

    /// 설정을 통째로 교체합니다.
    pub fn set(&self, key: ControllerKey, config: ControllerConfig) -> Arc<ControllerConfig> {
        let config = Arc::new(config);
        self.set_shared(key, config.clone());
        config
    }

    pub(crate) fn set_shared(&self, key: ControllerKey, config: Arc<ControllerConfig>) {
        debug!(
            controller = %key.name(),
            filters = config.filters.len(),
            actions = config.action_configs.len(),
            inited = config.is_inited,
            "컨트롤러 설정 저장"
        );
        self.configs.write().insert(key, config);
    }

    /// 저장된 설정의 복사본을 꺼냅니다. 없으면 기본 설정을 만듭니다.
    pub(crate) fn get_or_default(&self, key: &ControllerKey) -> ControllerConfig {
        self.get(key)
            .map(|config| config.as_ref().clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }
}
