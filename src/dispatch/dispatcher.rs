use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use super::resolver::{ExecutionEntry, ResolvedAction};
use super::{ActionError, ActionReturn, RequestContext};

/// 액션에 넘기기 직전의 요청 데이터를 바꿉니다.
///
/// 모든 `pre_action`이 끝난 뒤 한 번 호출됩니다. 에러를 돌려주면 액션과
/// `post_action`은 실행되지 않습니다.
#[async_trait]
pub trait PayloadTransform: Send + Sync {
    async fn transform(&self, payload: Value, ctx: &RequestContext) -> Result<Value, ActionError>;
}

/// 훅 -> 액션 -> 훅 순서로 실행합니다.
#[derive(Clone, Default)]
pub struct ActionDispatcher {
    json_query_key: Option<String>,
    payload_transform: Option<Arc<dyn PayloadTransform>>,
}

impl fmt::Debug for ActionDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionDispatcher")
            .field("json_query_key", &self.json_query_key)
            .field("payload_transform", &self.payload_transform.is_some())
            .finish()
    }
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// GET 요청에서 JSON으로 해석할 쿼리 키
    pub fn with_json_query_key(mut self, key: Option<String>) -> Self {
        self.json_query_key = key;
        self
    }

    pub fn with_payload_transform(mut self, transform: Arc<dyn PayloadTransform>) -> Self {
        self.payload_transform = Some(transform);
        self
    }

    /// 모든 `pre_action`을 목록 순서대로 하나씩 실행합니다.
    pub async fn run_pre_actions(
        entries: &[ExecutionEntry],
        ctx: &mut RequestContext,
    ) -> Result<(), ActionError> {
        for entry in entries {
            debug!(filter = %entry.binding.name, kind = %entry.kind(), "pre_action 실행");
            entry
                .binding
                .hooks
                .pre_action(ctx, &entry.binding, &entry.options)
                .await?;
        }
        Ok(())
    }

    /// 모든 `post_action`을 `pre_action`과 같은 순서로 실행합니다.
    pub async fn run_post_actions(
        entries: &[ExecutionEntry],
        ctx: &mut RequestContext,
    ) -> Result<(), ActionError> {
        for entry in entries {
            debug!(filter = %entry.binding.name, kind = %entry.kind(), "post_action 실행");
            entry
                .binding
                .hooks
                .post_action(ctx, &entry.binding, &entry.options)
                .await?;
        }
        Ok(())
    }

    /// 리졸버 결과를 컨트롤러 인스턴스에 대해 실행합니다.
    ///
    /// `pre_action` 중 하나라도 실패하면 액션과 모든 `post_action`을 건너뛰고
    /// 에러를 그대로 반환합니다. 요청 데이터는 `pre_action`이 모두 끝난 뒤 만듭니다.
    #[instrument(skip_all, fields(request_id = %ctx.request_id))]
    pub async fn run<C: Send + Sync + 'static>(
        &self,
        resolved: &ResolvedAction<C>,
        controller: Arc<C>,
        ctx: &mut RequestContext,
    ) -> Result<ActionReturn, ActionError> {
        Self::run_pre_actions(&resolved.execution_list, ctx).await?;

        let mut payload = ctx.request_data(self.json_query_key.as_deref());
        if let Some(transform) = &self.payload_transform {
            payload = transform.transform(payload, ctx).await?;
        }
        let result = resolved.action.call(controller, payload).await?;

        Self::run_post_actions(&resolved.execution_list, ctx).await?;
        Ok(result)
    }
}
