use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use super::config::{FilterBinding, FilterId};
use super::error::ConfigError;
use super::hooks::{CommonOptions, ErasedHooks, Hooks, TargetInfo, TypedHooks};
use super::store::ConfigStore;
use crate::controller::{Controller, ControllerKey};

static NEXT_FILTER_ID: AtomicU64 = AtomicU64::new(1);

/// 바인딩 직후 호출되는 콜백
pub type OnBind<P> = Arc<dyn Fn(&P, &FilterBinding, &CommonOptions) + Send + Sync>;

/// `create_filter` 옵션
pub struct FilterOptions<P> {
    /// 가중치를 지정하지 않았을 때 쓰는 값 (기본 0)
    pub default_weight: i32,
    pub on_bind: Option<OnBind<P>>,
}

impl<P> Default for FilterOptions<P> {
    fn default() -> Self {
        Self {
            default_weight: 0,
            on_bind: None,
        }
    }
}

impl<P> FilterOptions<P> {
    pub fn default_weight(mut self, weight: i32) -> Self {
        self.default_weight = weight;
        self
    }

    pub fn on_bind<F>(mut self, callback: F) -> Self
    where
        F: Fn(&P, &FilterBinding, &CommonOptions) + Send + Sync + 'static,
    {
        self.on_bind = Some(Arc::new(callback));
        self
    }
}

/// 이름과 훅, 기본 가중치로부터 재사용 가능한 필터 팩토리를 만듭니다.
pub fn create_filter<H: Hooks>(
    name: impl Into<Arc<str>>,
    hooks: H,
    options: FilterOptions<H::Param>,
) -> Filter<H> {
    let id = FilterId(NEXT_FILTER_ID.fetch_add(1, Ordering::Relaxed));
    let name = name.into();
    debug!(filter = %name, id = id.0, "필터 생성");

    Filter {
        id,
        name,
        hooks: Arc::new(TypedHooks::new(hooks)),
        default_weight: options.default_weight,
        on_bind: options.on_bind,
        _hooks: PhantomData,
    }
}

/// 필터 팩토리
///
/// 복제본은 모두 같은 필터 식별자를 공유합니다.
pub struct Filter<H: Hooks> {
    id: FilterId,
    name: Arc<str>,
    hooks: Arc<dyn ErasedHooks>,
    default_weight: i32,
    on_bind: Option<OnBind<H::Param>>,
    _hooks: PhantomData<fn() -> H>,
}

impl<H: Hooks> Clone for Filter<H> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            hooks: self.hooks.clone(),
            default_weight: self.default_weight,
            on_bind: self.on_bind.clone(),
            _hooks: PhantomData,
        }
    }
}

impl<H: Hooks> fmt::Debug for Filter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("default_weight", &self.default_weight)
            .finish()
    }
}

impl<H: Hooks> Filter<H> {
    pub fn id(&self) -> FilterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 파라미터와 기본 가중치로 바인딩 가능한 필터를 만듭니다.
    pub fn with(&self, param: H::Param) -> BindableFilter<H> {
        BindableFilter {
            filter: self.clone(),
            param: Arc::new(param),
            weight: self.default_weight,
        }
    }
}

impl<H: Hooks> Filter<H>
where
    H::Param: Default,
{
    /// 파라미터 없이 바인딩 가능한 필터를 만듭니다.
    pub fn bindable(&self) -> BindableFilter<H> {
        self.with(H::Param::default())
    }
}

/// 파라미터와 가중치가 정해진 필터
pub struct BindableFilter<H: Hooks> {
    filter: Filter<H>,
    param: Arc<H::Param>,
    weight: i32,
}

impl<H: Hooks> BindableFilter<H> {
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// 바인딩하지 않고 설정만 돌려줍니다. (전역 필터 목록 구성 등에 사용)
    pub fn config(&self) -> FilterBinding {
        FilterBinding {
            name: self.filter.name.clone(),
            weight: self.weight,
            param: self.param.clone(),
            hooks: self.filter.hooks.clone(),
            id: self.filter.id,
        }
    }

    /// 컨트롤러 범위에 바인딩합니다.
    pub fn bind_controller<C: Controller>(&self, store: &ConfigStore) -> Result<(), ConfigError> {
        self.bind::<C>(store, None)
    }

    /// 액션 범위에 바인딩합니다.
    pub fn bind_action<C: Controller>(
        &self,
        store: &ConfigStore,
        action_name: &str,
    ) -> Result<(), ConfigError> {
        self.bind::<C>(store, Some(action_name))
    }

    /// `action_name`이 없으면 컨트롤러 범위, 있으면 해당 액션 범위에 바인딩합니다.
    ///
    /// 같은 범위에 같은 필터가 이미 있으면 `ConfigError::DuplicateFilter`를 반환합니다.
    /// 변경된 설정 전체를 저장소에 다시 기록한 뒤 `on_bind`를 호출합니다.
    pub fn bind<C: Controller>(
        &self,
        store: &ConfigStore,
        action_name: Option<&str>,
    ) -> Result<(), ConfigError> {
        let key = ControllerKey::of::<C>();
        let binding = self.config();
        let mut config = store.get_or_default(&key);

        let target_info = match action_name {
            None => {
                if config.filters.contains(binding.id) {
                    return Err(ConfigError::DuplicateFilter {
                        filter: binding.name.to_string(),
                        target: C::NAME.to_string(),
                    });
                }
                config.filters.push(binding.clone());
                let config = Arc::new(config);
                store.set_shared(key, config.clone());
                TargetInfo::controller(C::NAME, config)
            }
            Some(action_name) => {
                let lower_name = action_name.to_lowercase();
                let mut action_config = config
                    .action_configs
                    .get(&lower_name)
                    .map(|existing| existing.as_ref().clone())
                    .unwrap_or_default();

                if action_config.filters.contains(binding.id) {
                    return Err(ConfigError::DuplicateFilter {
                        filter: binding.name.to_string(),
                        target: format!("{}.{}", C::NAME, action_name),
                    });
                }
                action_config.filters.push(binding.clone());

                let action_config = Arc::new(action_config);
                config.action_configs.insert(lower_name, action_config.clone());
                store.set_shared(key, Arc::new(config));
                TargetInfo::action(action_name, action_config)
            }
        };

        info!(
            filter = %binding.name,
            weight = binding.weight,
            controller = C::NAME,
            target = %target_info.name,
            kind = %target_info.kind,
            "필터 바인딩"
        );

        if let Some(on_bind) = &self.filter.on_bind {
            let options = CommonOptions {
                controller: key,
                target_info,
            };
            on_bind(&self.param, &binding, &options);
        }

        Ok(())
    }
}
