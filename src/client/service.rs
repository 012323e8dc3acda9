use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use bytes::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};
use url::Url;

use super::{ApiError, OutboundRequest, Transport, TransportError};
use crate::controller::{Controller, ControllerClass, DEFAULT_CONTROLLER_SUFFIX};
use crate::retry::{retry, RetryPolicy};
use crate::settings::{ClientSettings, RetrySettings};

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// 서버가 돌려주는 응답 봉투
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub code: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 실패한 호출의 정보
#[derive(Debug, Clone, Copy)]
pub struct FailedCall<'a> {
    pub controller: &'a str,
    pub action: &'a str,
    pub data: &'a Value,
    pub options: &'a CallOptions,
}

/// 호출 실패를 받아 대체 값을 돌려주거나 에러를 다시 던집니다.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn on_error(&self, error: ApiError, call: FailedCall<'_>) -> Result<Value, ApiError>;
}

/// 옵션에 담기는 공유 에러 핸들러
#[derive(Clone)]
pub struct OnError(Arc<dyn ErrorHandler>);

impl OnError {
    pub fn new(handler: impl ErrorHandler + 'static) -> Self {
        Self(Arc::new(handler))
    }
}

impl fmt::Debug for OnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OnError(..)")
    }
}

/// 클라이언트 전체에 적용되는 옵션
#[derive(Debug, Clone)]
pub struct ApiOptions {
    pub origin: String,
    pub prefix: String,
    pub http_method: Method,
    pub timeout: Option<Duration>,
    pub success_codes: Vec<Value>,
    pub transform_get_json_key: Option<String>,
    pub retry: RetrySettings,
    pub controller_suffix: String,
    pub headers: HeaderMap,
    pub common_data: Map<String, Value>,
    /// 호출별 핸들러가 없을 때 쓰는 에러 핸들러
    pub on_error: Option<OnError>,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self::from(&ClientSettings::default())
    }
}

impl From<&ClientSettings> for ApiOptions {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            origin: settings.origin.clone(),
            prefix: settings.prefix.clone(),
            http_method: Method::from_bytes(settings.http_method.to_uppercase().as_bytes())
                .unwrap_or(Method::POST),
            timeout: settings.timeout_ms.map(Duration::from_millis),
            success_codes: settings.success_codes.clone(),
            transform_get_json_key: settings.transform_get_json_key.clone(),
            retry: settings.retry.clone(),
            controller_suffix: DEFAULT_CONTROLLER_SUFFIX.to_string(),
            headers: HeaderMap::new(),
            common_data: Map::new(),
            on_error: None,
        }
    }
}

impl ApiOptions {
    pub fn on_error(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.on_error = Some(OnError::new(handler));
        self
    }
}

/// 호출 한 번에만 적용되는 옵션
///
/// 값이 있으면 클라이언트 옵션을 덮어쓰고, 헤더와 공통 데이터는 합칩니다.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// 봉투 전체를 그대로 반환
    pub raw: bool,
    pub method: Option<Method>,
    pub timeout: Option<Duration>,
    pub retry: Option<u32>,
    pub headers: Vec<(String, String)>,
    pub common_data: Map<String, Value>,
    pub on_error: Option<OnError>,
}

impl CallOptions {
    pub fn raw(mut self) -> Self {
        self.raw = true;
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, count: u32) -> Self {
        self.retry = Some(count);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.common_data.insert(key.into(), value);
        self
    }

    /// 클라이언트의 에러 핸들러 대신 쓸 핸들러
    pub fn on_error(mut self, handler: impl ErrorHandler + 'static) -> Self {
        self.on_error = Some(OnError::new(handler));
        self
    }
}

/// 선언된 컨트롤러 액션을 원격으로 호출하는 클라이언트
pub struct ApiClient<T> {
    transport: T,
    options: ApiOptions,
    // 소문자 컨트롤러 이름 -> 소문자 액션 이름
    actions: HashMap<String, HashSet<String>>,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, options: ApiOptions) -> Self {
        Self {
            transport,
            options,
            actions: HashMap::new(),
        }
    }

    pub fn options(&self) -> &ApiOptions {
        &self.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// 컨트롤러의 호출 가능한 액션을 선언합니다.
    pub fn declare<C: Controller>(mut self) -> Self {
        let class = ControllerClass::<C>::new();
        let suffix = self.options.controller_suffix.as_str();
        let name = if suffix.is_empty() {
            C::NAME
        } else {
            C::NAME.strip_suffix(suffix).unwrap_or(C::NAME)
        };
        let actions = class.action_names().map(str::to_string).collect::<Vec<_>>();
        self.insert(name, actions);
        self
    }

    /// 로컬 타입 없이 원격 액션 목록만 선언합니다.
    pub fn declare_raw<I, S>(mut self, controller: &str, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(controller, actions.into_iter().map(Into::into).collect());
        self
    }

    fn insert(&mut self, controller: &str, actions: Vec<String>) {
        let entry = self.actions.entry(controller.to_lowercase()).or_default();
        entry.extend(actions.into_iter().map(|action| action.to_lowercase()));
        debug!(controller = %controller, actions = entry.len(), "원격 액션 선언");
    }

    pub fn is_declared(&self, controller: &str, action: &str) -> bool {
        self.actions
            .get(&controller.to_lowercase())
            .is_some_and(|actions| actions.contains(&action.to_lowercase()))
    }

    /// 액션을 호출해 성공 데이터를 반환합니다.
    ///
    /// `raw`면 봉투 전체를 JSON으로 돌려줍니다. 실패하면 호출 옵션의 에러
    /// 핸들러를, 없으면 클라이언트의 핸들러를 부르고 그 결과를 반환합니다.
    pub async fn call(
        &self,
        controller: &str,
        action: &str,
        data: Value,
        options: &CallOptions,
    ) -> Result<Value, ApiError> {
        let handler = options.on_error.as_ref().or(self.options.on_error.as_ref());
        let Some(OnError(handler)) = handler else {
            return self.call_checked(controller, action, data, options).await;
        };

        let controller = controller.to_lowercase();
        let action = action.to_lowercase();
        match self.call_checked(&controller, &action, data.clone(), options).await {
            Ok(value) => Ok(value),
            Err(error) => {
                debug!(controller = %controller, action = %action, error = %error, "에러 핸들러 호출");
                let call = FailedCall {
                    controller: &controller,
                    action: &action,
                    data: &data,
                    options,
                };
                handler.on_error(error, call).await
            }
        }
    }

    async fn call_checked(
        &self,
        controller: &str,
        action: &str,
        data: Value,
        options: &CallOptions,
    ) -> Result<Value, ApiError> {
        let envelope = self.call_envelope(controller, action, data, options).await?;
        if options.raw {
            return Ok(serde_json::to_value(envelope)?);
        }
        if self.is_success(&envelope.code) {
            return Ok(envelope.data);
        }
        Err(ApiError::Business {
            code: envelope.code.clone(),
            message: envelope.message.clone(),
            envelope,
        })
    }

    /// 성공 데이터를 원하는 타입으로 역직렬화합니다.
    pub async fn call_as<R: DeserializeOwned>(
        &self,
        controller: &str,
        action: &str,
        data: Value,
        options: &CallOptions,
    ) -> Result<R, ApiError> {
        let value = self.call(controller, action, data, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// 성공 코드 검사 없이 응답 봉투를 반환합니다.
    #[instrument(skip(self, data, options))]
    pub async fn call_envelope(
        &self,
        controller: &str,
        action: &str,
        data: Value,
        options: &CallOptions,
    ) -> Result<Envelope, ApiError> {
        let controller = controller.to_lowercase();
        let action = action.to_lowercase();
        if !self.is_declared(&controller, &action) {
            return Err(ApiError::UnknownAction { controller, action });
        }

        let request = self.build_request(&controller, &action, data, options)?;
        let policy = self.retry_policy(options);
        debug!(method = %request.method, url = %request.url, total = policy.total, "원격 액션 호출");

        let response = retry(|| self.transport.send(&request), &policy).await?;
        let envelope: Envelope = serde_json::from_slice(&response.body)?;
        info!(code = %envelope.code, "원격 액션 응답");
        Ok(envelope)
    }

    fn is_success(&self, code: &Value) -> bool {
        self.options.success_codes.contains(code)
    }

    fn retry_policy(&self, options: &CallOptions) -> RetryPolicy<TransportError> {
        let mut settings = self.options.retry.clone();
        if let Some(count) = options.retry {
            settings.count = count;
        }
        RetryPolicy::from(&settings)
    }

    pub(crate) fn build_request(
        &self,
        controller: &str,
        action: &str,
        data: Value,
        options: &CallOptions,
    ) -> Result<OutboundRequest, ApiError> {
        let raw_url = join_url(&[&self.options.origin, &self.options.prefix, controller, action]);
        let mut url = Url::parse(&raw_url).map_err(|_| ApiError::InvalidUrl(raw_url.clone()))?;

        let method = options
            .method
            .clone()
            .unwrap_or_else(|| self.options.http_method.clone());

        let mut body = self.options.common_data.clone();
        body.extend(options.common_data.clone());
        match data {
            Value::Object(map) => body.extend(map),
            Value::Null => {}
            _ => return Err(ApiError::InvalidPayload),
        }

        let mut headers = HeaderMap::new();
        let payload = if method == Method::GET {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_FORM));
            match &self.options.transform_get_json_key {
                Some(key) => {
                    url.query_pairs_mut()
                        .append_pair(key, &Value::Object(body).to_string());
                }
                None if !body.is_empty() => {
                    let mut query = url.query_pairs_mut();
                    for (key, value) in &body {
                        match value {
                            Value::String(text) => query.append_pair(key, text),
                            other => query.append_pair(key, &other.to_string()),
                        };
                    }
                }
                None => {}
            }
            None
        } else {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_JSON));
            Some(Bytes::from(serde_json::to_vec(&Value::Object(body))?))
        };

        headers.extend(self.options.headers.clone());
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::InvalidHeader(name.to_string()))?;
            headers.insert(name, value);
        }

        Ok(OutboundRequest {
            method,
            url,
            headers,
            body: payload,
            timeout: options.timeout.or(self.options.timeout),
        })
    }
}

/// 경로 조각을 슬래시 하나로 이어 붙입니다. 빈 조각은 건너뜁니다.
pub fn join_url(parts: &[&str]) -> String {
    let mut joined = String::new();
    for part in parts.iter().filter(|part| !part.is_empty()) {
        if joined.is_empty() {
            joined.push_str(part.trim_end_matches('/'));
        } else {
            joined.push('/');
            joined.push_str(part.trim_matches('/'));
        }
    }
    joined
}
