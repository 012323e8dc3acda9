#![allow(dead_code)]

use std::sync::Arc;

use action_filters::controller::{Controller, Member};
use action_filters::dispatch::{ActionError, RequestContext};
use action_filters::filter::{create_filter, BindableFilter, Filter, FilterOptions, HookArgs, Hooks};
use async_trait::async_trait;
use serde_json::{json, Value};

const TRACE_KEY: &str = "trace";

/// 훅이 `ctx.state`에 남긴 실행 기록
pub fn trace(ctx: &RequestContext) -> Vec<String> {
    ctx.state
        .get(TRACE_KEY)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn push_trace(ctx: &mut RequestContext, entry: String) {
    let trace = ctx
        .state
        .entry(TRACE_KEY.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(items) = trace {
        items.push(Value::String(entry));
    }
}

/// 두 훅 모두 실행 기록을 남기는 필터
pub struct RecordHooks;

#[async_trait]
impl Hooks for RecordHooks {
    type Param = String;

    async fn pre_action(&self, args: HookArgs<'_, Self::Param>) -> Result<(), ActionError> {
        push_trace(args.ctx, format!("pre:{}", args.param));
        Ok(())
    }

    async fn post_action(&self, args: HookArgs<'_, Self::Param>) -> Result<(), ActionError> {
        push_trace(args.ctx, format!("post:{}", args.param));
        Ok(())
    }
}

/// `pre_action`만 정의한 필터
pub struct PreOnlyHooks;

#[async_trait]
impl Hooks for PreOnlyHooks {
    type Param = String;

    async fn pre_action(&self, args: HookArgs<'_, Self::Param>) -> Result<(), ActionError> {
        push_trace(args.ctx, format!("pre:{}", args.param));
        Ok(())
    }
}

/// 항상 `pre_action`에서 실패하는 필터
pub struct DenyHooks;

#[async_trait]
impl Hooks for DenyHooks {
    type Param = ();

    async fn pre_action(&self, args: HookArgs<'_, Self::Param>) -> Result<(), ActionError> {
        push_trace(args.ctx, format!("pre:{}", args.binding.name));
        Err(ActionError::json(401, "denied"))
    }

    async fn post_action(&self, args: HookArgs<'_, Self::Param>) -> Result<(), ActionError> {
        push_trace(args.ctx, format!("post:{}", args.binding.name));
        Ok(())
    }
}

pub fn record_filter(name: &str) -> Filter<RecordHooks> {
    create_filter(name, RecordHooks, FilterOptions::default())
}

/// 이름을 파라미터로 쓰는 기록 필터
pub fn recorder(name: &str, weight: i32) -> BindableFilter<RecordHooks> {
    record_filter(name).with(name.to_string()).weight(weight)
}

pub fn deny_filter(name: &str) -> Filter<DenyHooks> {
    create_filter(name, DenyHooks, FilterOptions::default())
}

pub struct UserController {
    request_id: String,
}

impl Controller for UserController {
    const NAME: &'static str = "UserController";

    fn new(ctx: &RequestContext) -> Self {
        Self {
            request_id: ctx.request_id.clone(),
        }
    }

    fn members() -> Vec<Member<Self>> {
        vec![
            Member::action("login", |this: Arc<Self>, data: Value| async move {
                Ok::<_, ActionError>(json!({
                    "user": data.get("name").cloned().unwrap_or(Value::Null),
                    "request_id": this.request_id,
                }))
            }),
            Member::action("logout", |_this: Arc<Self>, _data: Value| async move {
                Err::<Value, _>(ActionError::json(500, "logout failed"))
            }),
            Member::property("profile"),
        ]
    }
}

pub struct OrderController;

impl Controller for OrderController {
    const NAME: &'static str = "OrderController";

    fn new(_ctx: &RequestContext) -> Self {
        OrderController
    }

    fn members() -> Vec<Member<Self>> {
        vec![Member::action("list", |_this: Arc<Self>, data: Value| async move {
            Ok::<_, ActionError>(data)
        })]
    }
}

/// 접미사 규칙을 어기는 컨트롤러
pub struct Accounts;

impl Controller for Accounts {
    const NAME: &'static str = "Accounts";

    fn new(_ctx: &RequestContext) -> Self {
        Accounts
    }

    fn members() -> Vec<Member<Self>> {
        vec![Member::action("index", |_this: Arc<Self>, _data: Value| async move {
            Ok::<_, ActionError>(())
        })]
    }
}

/// 대소문자만 다른 액션을 가진 컨트롤러
pub struct ShadowController;

impl Controller for ShadowController {
    const NAME: &'static str = "ShadowController";

    fn new(_ctx: &RequestContext) -> Self {
        ShadowController
    }

    fn members() -> Vec<Member<Self>> {
        vec![
            Member::action("getUser", |_this: Arc<Self>, _data: Value| async move {
                Ok::<_, ActionError>(json!("first"))
            }),
            Member::action("GetUser", |_this: Arc<Self>, _data: Value| async move {
                Ok::<_, ActionError>(json!("second"))
            }),
        ]
    }
}

/// 생성자 이름을 멤버로 가진 컨트롤러
pub struct LegacyController;

impl Controller for LegacyController {
    const NAME: &'static str = "LegacyController";

    fn new(_ctx: &RequestContext) -> Self {
        LegacyController
    }

    fn members() -> Vec<Member<Self>> {
        vec![
            Member::action("constructor", |_this: Arc<Self>, _data: Value| async move {
                Ok::<_, ActionError>(())
            }),
            Member::action("index", |_this: Arc<Self>, _data: Value| async move {
                Ok::<_, ActionError>(json!("index"))
            }),
        ]
    }
}
