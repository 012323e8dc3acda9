use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use super::{ActionError, RequestContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Attachment,
    Inline,
}

/// 액션 반환값
///
/// 실제 응답 작성(렌더링, 파일 전송, JSON 포맷)은 `Responder` 구현이 담당합니다.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionReturn {
    Json(Value),
    Render {
        view: String,
        params: Option<Value>,
    },
    Redirect(String),
    StaticFile(String),
    Buffer {
        bytes: Bytes,
        file_name: String,
        disposition: Disposition,
    },
    Xml(String),
    /// 액션이 이미 응답을 처리함
    Noop,
}

impl From<Value> for ActionReturn {
    fn from(value: Value) -> Self {
        ActionReturn::Json(value)
    }
}

impl From<()> for ActionReturn {
    fn from(_: ()) -> Self {
        ActionReturn::Json(Value::Null)
    }
}

/// 응답 작성 협력자
#[async_trait]
pub trait Responder: Send + Sync {
    type Output: Send;

    /// 모든 훅과 액션이 성공했을 때 호출됩니다.
    async fn respond(&self, result: ActionReturn, ctx: &RequestContext) -> Self::Output;

    /// 훅이나 액션이 실패했을 때 호출됩니다.
    async fn respond_error(&self, error: ActionError, ctx: &RequestContext) -> Self::Output;
}
