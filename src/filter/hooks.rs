use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use super::config::{ActionConfig, ControllerConfig, FilterBinding};
use crate::controller::ControllerKey;
use crate::dispatch::{ActionError, RequestContext};

/// 필터가 어느 범위에서 왔는지
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Action,
    Controller,
    Global,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::Action => write!(f, "Action"),
            TargetKind::Controller => write!(f, "Controller"),
            TargetKind::Global => write!(f, "Global"),
        }
    }
}

/// 범위별 설정 스냅샷
#[derive(Debug, Clone)]
pub enum ScopeConfig {
    Action(Arc<ActionConfig>),
    Controller(Arc<ControllerConfig>),
}

#[derive(Debug, Clone)]
pub struct TargetInfo {
    pub name: String,
    pub kind: TargetKind,
    /// 전역 필터는 `None`
    pub config: Option<ScopeConfig>,
}

impl TargetInfo {
    pub(crate) fn action(name: impl Into<String>, config: Arc<ActionConfig>) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Action,
            config: Some(ScopeConfig::Action(config)),
        }
    }

    pub(crate) fn controller(name: impl Into<String>, config: Arc<ControllerConfig>) -> Self {
        Self {
            name: name.into(),
            kind: TargetKind::Controller,
            config: Some(ScopeConfig::Controller(config)),
        }
    }

    pub(crate) fn global() -> Self {
        Self {
            name: "global".to_string(),
            kind: TargetKind::Global,
            config: None,
        }
    }
}

/// 훅과 `on_bind` 콜백에 함께 전달되는 공통 옵션
#[derive(Debug, Clone)]
pub struct CommonOptions {
    pub controller: ControllerKey,
    pub target_info: TargetInfo,
}

/// 훅 인자 `(param, ctx, binding, options)`
pub struct HookArgs<'a, P> {
    pub param: &'a P,
    pub ctx: &'a mut RequestContext,
    pub binding: &'a FilterBinding,
    pub options: &'a CommonOptions,
}

/// 필터 훅 트레이트
///
/// 정의하지 않은 훅은 기본 구현(아무것도 하지 않음)이 쓰이므로 해당 단계에서
/// 그냥 건너뛴 것과 같습니다.
#[async_trait]
pub trait Hooks: Send + Sync + 'static {
    /// 바인딩 시 함께 넘기는 파라미터 타입
    type Param: Send + Sync + 'static;

    /// 액션 실행 전에 호출됩니다. 에러를 반환하면 이후 단계는 실행되지 않습니다.
    async fn pre_action(&self, _args: HookArgs<'_, Self::Param>) -> Result<(), ActionError> {
        Ok(())
    }

    /// 액션이 성공한 뒤 호출됩니다.
    async fn post_action(&self, _args: HookArgs<'_, Self::Param>) -> Result<(), ActionError> {
        Ok(())
    }
}

/// 파라미터 타입을 지운 훅 인터페이스
#[async_trait]
pub(crate) trait ErasedHooks: Send + Sync {
    async fn pre_action(
        &self,
        ctx: &mut RequestContext,
        binding: &FilterBinding,
        options: &CommonOptions,
    ) -> Result<(), ActionError>;

    async fn post_action(
        &self,
        ctx: &mut RequestContext,
        binding: &FilterBinding,
        options: &CommonOptions,
    ) -> Result<(), ActionError>;
}

pub(crate) struct TypedHooks<H> {
    hooks: H,
    _param: PhantomData<fn() -> H>,
}

impl<H: Hooks> TypedHooks<H> {
    pub(crate) fn new(hooks: H) -> Self {
        Self {
            hooks,
            _param: PhantomData,
        }
    }

    fn param<'a>(binding: &'a FilterBinding) -> Result<&'a H::Param, ActionError> {
        let param: &(dyn Any + Send + Sync) = binding.param.as_ref();
        param
            .downcast_ref::<H::Param>()
            .ok_or_else(|| ActionError::ParamMismatch {
                filter: binding.name.to_string(),
            })
    }
}

#[async_trait]
impl<H: Hooks> ErasedHooks for TypedHooks<H> {
    async fn pre_action(
        &self,
        ctx: &mut RequestContext,
        binding: &FilterBinding,
        options: &CommonOptions,
    ) -> Result<(), ActionError> {
        let param = Self::param(binding)?;
        self.hooks
            .pre_action(HookArgs { param, ctx, binding, options })
            .await
    }

    async fn post_action(
        &self,
        ctx: &mut RequestContext,
        binding: &FilterBinding,
        options: &CommonOptions,
    ) -> Result<(), ActionError> {
        let param = Self::param(binding)?;
        self.hooks
            .post_action(HookArgs { param, ctx, binding, options })
            .await
    }
}
