use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use super::hooks::ErasedHooks;

/// 필터 식별자
///
/// `create_filter` 호출마다 하나씩 발급되며, 두 바인딩은 이 값이 같을 때만
/// "같은 필터"로 취급됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilterId(pub(crate) u64);

/// 필터 하나가 특정 범위에 바인딩된 정보
#[derive(Clone)]
pub struct FilterBinding {
    /// 진단용 이름
    pub name: Arc<str>,
    /// 가중치 (높을수록 같은 계층 안에서 먼저 실행)
    pub weight: i32,
    /// 훅에 그대로 전달되는 호출자 값
    pub param: Arc<dyn Any + Send + Sync>,
    pub(crate) hooks: Arc<dyn ErasedHooks>,
    pub(crate) id: FilterId,
}

impl FilterBinding {
    pub fn id(&self) -> FilterId {
        self.id
    }

    /// 파라미터를 원래 타입으로 꺼냅니다.
    pub fn param<P: Any>(&self) -> Option<&P> {
        self.param.downcast_ref::<P>()
    }
}

impl fmt::Debug for FilterBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBinding")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// 한 범위(컨트롤러 또는 액션)에 바인딩된 필터 목록
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    /// 바인딩 순서 그대로의 목록
    pub list: Vec<FilterBinding>,
    /// 가중치별 버킷 (버킷 내부는 바인딩 순서 유지)
    pub weights: BTreeMap<i32, Vec<FilterBinding>>,
}

impl FilterSet {
    pub fn contains(&self, id: FilterId) -> bool {
        self.list.iter().any(|binding| binding.id == id)
    }

    pub(crate) fn push(&mut self, binding: FilterBinding) {
        self.weights
            .entry(binding.weight)
            .or_default()
            .push(binding.clone());
        self.list.push(binding);
    }

    /// 가중치 내림차순, 같은 가중치는 바인딩 순서로 순회합니다.
    pub fn by_weight(&self) -> impl Iterator<Item = &FilterBinding> {
        self.weights.iter().rev().flat_map(|(_, bucket)| bucket.iter())
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// 액션 범위 설정
#[derive(Debug, Clone, Default)]
pub struct ActionConfig {
    pub filters: FilterSet,
}

/// 컨트롤러 하나에 대한 설정
#[derive(Debug, Clone, Default)]
pub struct ControllerConfig {
    /// 컨트롤러 범위 필터
    pub filters: FilterSet,
    /// 컨트롤러로 정식 등록되었는지 여부
    pub is_inited: bool,
    /// 소문자 액션 이름 -> 액션 설정
    pub action_configs: HashMap<String, Arc<ActionConfig>>,
}

impl ControllerConfig {
    /// 액션 설정을 찾습니다. 이름은 대소문자를 구분하지 않습니다.
    pub fn action(&self, action_name: &str) -> Option<&Arc<ActionConfig>> {
        self.action_configs.get(&action_name.to_lowercase())
    }
}
