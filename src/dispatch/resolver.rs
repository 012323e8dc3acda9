use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use super::RequestContext;
use crate::controller::{ActionHandle, Controller, ControllerClass, MemberKind, RESERVED_CONSTRUCTOR};
use crate::filter::{CommonOptions, ConfigStore, FilterBinding, FilterId, TargetInfo, TargetKind};

/// 실행 목록의 항목 하나
///
/// 훅 인자 중 `param`과 `binding`은 `binding`에, 범위 정보는 `options`에 들어 있고
/// 요청 컨텍스트는 실행 시점에 전달됩니다.
#[derive(Debug, Clone)]
pub struct ExecutionEntry {
    pub binding: FilterBinding,
    pub options: CommonOptions,
}

impl ExecutionEntry {
    pub fn kind(&self) -> TargetKind {
        self.options.target_info.kind
    }
}

pub struct ResolvedAction<C> {
    pub action: ActionHandle<C>,
    pub execution_list: Vec<ExecutionEntry>,
}

impl<C> fmt::Debug for ResolvedAction<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAction")
            .field("execution_list", &self.execution_list)
            .finish_non_exhaustive()
    }
}

/// 리졸버 결과
///
/// `NoMatch`는 에러가 아니라 "이 요청은 여기서 처리하지 않음"을 뜻합니다.
pub enum Resolution<C> {
    NoMatch,
    Matched(ResolvedAction<C>),
}

impl<C> fmt::Debug for Resolution<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::NoMatch => write!(f, "NoMatch"),
            Resolution::Matched(resolved) => f.debug_tuple("Matched").field(resolved).finish(),
        }
    }
}

impl<C> Resolution<C> {
    pub fn is_no_match(&self) -> bool {
        matches!(self, Resolution::NoMatch)
    }

    pub fn matched(self) -> Option<ResolvedAction<C>> {
        match self {
            Resolution::Matched(resolved) => Some(resolved),
            Resolution::NoMatch => None,
        }
    }
}

/// 액션을 찾고 실행할 필터 목록을 만듭니다.
///
/// 목록은 액션 범위, 컨트롤러 범위, 전역 순서로 이어 붙이며 계층끼리 가중치로
/// 섞지 않습니다. 각 계층 안에서는 가중치 내림차순, 같은 가중치는 바인딩 순서를
/// 따릅니다. 액션 범위에 이미 나온 필터는 컨트롤러와 전역 계층에서 다시 실행하지
/// 않습니다.
pub fn resolve<C: Controller>(
    class: &ControllerClass<C>,
    store: &ConfigStore,
    action_name: &str,
    ctx: &RequestContext,
    global_filters: &[FilterBinding],
) -> Resolution<C> {
    let lower_name = action_name.to_lowercase();
    if lower_name == RESERVED_CONSTRUCTOR {
        return Resolution::NoMatch;
    }

    let action = match class.find(&lower_name).map(|member| &member.kind) {
        Some(MemberKind::Action(handle)) => handle.clone(),
        Some(MemberKind::Property) | None => {
            debug!(
                request_id = %ctx.request_id,
                controller = class.name(),
                action = %action_name,
                "일치하는 액션 없음"
            );
            return Resolution::NoMatch;
        }
    };

    let key = class.key();
    let controller_config = store.get(&key).unwrap_or_default();

    let mut seen: HashSet<FilterId> = HashSet::new();
    let mut execution_list = Vec::new();

    if let Some(action_config) = controller_config.action_configs.get(&lower_name) {
        let target_info = TargetInfo::action(action_name, action_config.clone());
        for binding in action_config.filters.by_weight() {
            seen.insert(binding.id());
            execution_list.push(ExecutionEntry {
                binding: binding.clone(),
                options: CommonOptions {
                    controller: key,
                    target_info: target_info.clone(),
                },
            });
        }
    }

    let target_info = TargetInfo::controller(class.name(), controller_config.clone());
    for binding in controller_config.filters.by_weight() {
        if seen.insert(binding.id()) {
            execution_list.push(ExecutionEntry {
                binding: binding.clone(),
                options: CommonOptions {
                    controller: key,
                    target_info: target_info.clone(),
                },
            });
        }
    }

    // 안정 정렬이므로 같은 가중치는 전달된 순서를 유지합니다.
    let mut globals: Vec<&FilterBinding> = global_filters.iter().collect();
    globals.sort_by(|a, b| b.weight.cmp(&a.weight));
    let target_info = TargetInfo::global();
    for binding in globals {
        if !seen.contains(&binding.id()) {
            execution_list.push(ExecutionEntry {
                binding: binding.clone(),
                options: CommonOptions {
                    controller: key,
                    target_info: target_info.clone(),
                },
            });
        }
    }

    debug!(
        request_id = %ctx.request_id,
        controller = class.name(),
        action = %action_name,
        filters = ?execution_list.iter().map(|entry| entry.binding.name.as_ref()).collect::<Vec<_>>(),
        "실행 목록 생성"
    );

    Resolution::Matched(ResolvedAction {
        action,
        execution_list,
    })
}
