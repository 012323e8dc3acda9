use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::dispatcher::{ActionDispatcher, PayloadTransform};
use super::resolver::{resolve, Resolution};
use super::{ActionError, ActionReturn, RequestContext, Responder};
use crate::controller::{Controller, ControllerClass};
use crate::filter::{ConfigError, ConfigStore, FilterBinding};
use crate::logging::{log_dispatch, DispatchLog};
use crate::settings::DispatchSettings;

/// 디스패치 결과
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// 이 라우터가 처리하지 않는 요청
    Fallthrough,
    Completed(ActionReturn),
}

/// 컨트롤러 타입을 지운 디스패치 인터페이스
#[async_trait]
trait ErasedController: Send + Sync {
    fn name(&self) -> &'static str;

    async fn dispatch(
        &self,
        store: &ConfigStore,
        dispatcher: &ActionDispatcher,
        action_name: &str,
        ctx: &mut RequestContext,
        global_filters: &[FilterBinding],
        log: &mut DispatchLog,
    ) -> Result<DispatchOutcome, ActionError>;
}

#[async_trait]
impl<C: Controller> ErasedController for ControllerClass<C> {
    fn name(&self) -> &'static str {
        ControllerClass::name(self)
    }

    async fn dispatch(
        &self,
        store: &ConfigStore,
        dispatcher: &ActionDispatcher,
        action_name: &str,
        ctx: &mut RequestContext,
        global_filters: &[FilterBinding],
        log: &mut DispatchLog,
    ) -> Result<DispatchOutcome, ActionError> {
        let inited = store
            .get(&self.key())
            .map(|config| config.is_inited)
            .unwrap_or(false);
        if !inited {
            warn!(controller = C::NAME, "등록되지 않은 컨트롤러, 요청을 넘김");
            return Ok(DispatchOutcome::Fallthrough);
        }

        let resolved = match resolve(self, store, action_name, ctx, global_filters) {
            Resolution::Matched(resolved) => resolved,
            Resolution::NoMatch => return Ok(DispatchOutcome::Fallthrough),
        };
        log.filters = resolved.execution_list.len();

        let controller = Arc::new(C::new(ctx));
        let result = dispatcher.run(&resolved, controller, ctx).await?;
        Ok(DispatchOutcome::Completed(result))
    }
}

/// 컨트롤러 이름으로 디스패치하는 테이블
///
/// 이름은 접미사를 뗀 뒤 소문자로 저장합니다. 경로 매칭은 호출하는 쪽의 몫입니다.
pub struct ControllerRouter {
    store: Arc<ConfigStore>,
    settings: DispatchSettings,
    dispatcher: ActionDispatcher,
    controllers: HashMap<String, Box<dyn ErasedController>>,
    global_filters: Vec<FilterBinding>,
}

impl ControllerRouter {
    pub fn new(store: Arc<ConfigStore>, settings: DispatchSettings) -> Self {
        let dispatcher = ActionDispatcher::new()
            .with_json_query_key(settings.transform_get_json_key.clone());
        Self {
            store,
            settings,
            dispatcher,
            controllers: HashMap::new(),
            global_filters: Vec::new(),
        }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// 라우팅 키: 접미사를 떼고 소문자로 바꾼 이름
    pub fn route_key(&self, controller_name: &str) -> String {
        let suffix = self.settings.controller_suffix.as_str();
        let name = if suffix.is_empty() {
            controller_name
        } else {
            controller_name.strip_suffix(suffix).unwrap_or(controller_name)
        };
        name.to_lowercase()
    }

    /// 컨트롤러를 등록합니다.
    pub fn register<C: Controller>(&mut self, class: ControllerClass<C>) -> Result<(), ConfigError> {
        let key = self.route_key(C::NAME);
        if self.controllers.contains_key(&key) {
            return Err(ConfigError::DuplicateController {
                controller: C::NAME.to_string(),
            });
        }
        debug!(controller = C::NAME, route = %key, "라우터에 컨트롤러 추가");
        self.controllers.insert(key, Box::new(class));
        Ok(())
    }

    /// 전역 필터를 추가합니다.
    pub fn global_filter(&mut self, binding: FilterBinding) -> &mut Self {
        self.global_filters.push(binding);
        self
    }

    /// 액션 호출 직전에 요청 데이터를 바꾸는 훅을 설정합니다.
    pub fn payload_transform(&mut self, transform: impl PayloadTransform + 'static) -> &mut Self {
        self.dispatcher = self
            .dispatcher
            .clone()
            .with_payload_transform(Arc::new(transform));
        self
    }

    pub fn global_filters(&self) -> &[FilterBinding] {
        &self.global_filters
    }

    /// 컨트롤러와 액션 이름으로 디스패치합니다.
    ///
    /// 이름이 없으면 기본값을 쓰고, 그래도 없거나 처리할 수 없는 요청이면
    /// `Fallthrough`를 반환합니다.
    pub async fn dispatch(
        &self,
        controller_name: Option<&str>,
        action_name: Option<&str>,
        ctx: &mut RequestContext,
    ) -> Result<DispatchOutcome, ActionError> {
        let mut log = DispatchLog::new(ctx.request_id.clone());
        self.dispatch_logged(controller_name, action_name, ctx, &mut log).await
    }

    async fn dispatch_logged(
        &self,
        controller_name: Option<&str>,
        action_name: Option<&str>,
        ctx: &mut RequestContext,
        log: &mut DispatchLog,
    ) -> Result<DispatchOutcome, ActionError> {
        let controller_name = controller_name.or(self.settings.default_controller.as_deref());
        let action_name = action_name.or(self.settings.default_action.as_deref());
        let (Some(controller_name), Some(action_name)) = (controller_name, action_name) else {
            return Ok(DispatchOutcome::Fallthrough);
        };
        log.controller = controller_name.to_string();
        log.action = action_name.to_string();

        let Some(controller) = self.controllers.get(&controller_name.to_lowercase()) else {
            return Ok(DispatchOutcome::Fallthrough);
        };
        debug!(controller = controller.name(), action = %action_name, "디스패치 시작");

        controller
            .dispatch(
                &self.store,
                &self.dispatcher,
                action_name,
                ctx,
                &self.global_filters,
                log,
            )
            .await
    }

    /// 디스패치 후 결과나 에러를 응답 협력자에게 넘깁니다.
    ///
    /// 처리하지 않는 요청이면 `None`을 반환합니다.
    pub async fn serve<R: Responder>(
        &self,
        responder: &R,
        controller_name: Option<&str>,
        action_name: Option<&str>,
        ctx: &mut RequestContext,
    ) -> Option<R::Output> {
        let started = Instant::now();
        let mut log = DispatchLog::new(ctx.request_id.clone());

        let result = self
            .dispatch_logged(controller_name, action_name, ctx, &mut log)
            .await;
        log.duration_ms = started.elapsed().as_millis() as u64;

        let output = match result {
            Ok(DispatchOutcome::Fallthrough) => {
                log.fallthrough = true;
                None
            }
            Ok(DispatchOutcome::Completed(result)) => Some(responder.respond(result, ctx).await),
            Err(error) => {
                log.with_error(&error);
                Some(responder.respond_error(error, ctx).await)
            }
        };

        log_dispatch(&log);
        output
    }
}
