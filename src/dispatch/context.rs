use std::collections::HashMap;

use hyper::header::{HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

/// 디스패치 한 번 동안 필터와 액션이 공유하는 요청 정보
///
/// 본문과 쿼리 파싱은 라우팅 쪽에서 끝난 상태로 전달됩니다.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub query: Map<String, Value>,
    pub body: Value,
    /// 필터가 액션에 값을 넘길 때 쓰는 저장소
    pub state: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method,
            uri,
            headers: HeaderMap::new(),
            query: Map::new(),
            body: Value::Null,
            state: HashMap::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// 액션에 넘길 요청 데이터를 만듭니다.
    ///
    /// 쿼리 위에 본문을 덮어씁니다. GET 요청이고 `json_query_key`가 주어지면
    /// 해당 쿼리 값을 JSON으로 해석해 합친 뒤 그 키는 제거합니다.
    pub fn request_data(&self, json_query_key: Option<&str>) -> Value {
        let mut data = self.query.clone();
        if let Value::Object(body) = &self.body {
            data.extend(body.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        if self.method == Method::GET {
            if let Some(key) = json_query_key {
                let raw = match self.query.get(key) {
                    Some(Value::String(raw)) => raw.clone(),
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                match serde_json::from_str::<Value>(&raw) {
                    Ok(Value::Object(url_json)) => data.extend(url_json),
                    Ok(_) => {}
                    Err(e) => debug!(key = %key, error = %e, "쿼리 JSON 파싱 실패, 무시"),
                }
                data.remove(key);
            }
        }

        Value::Object(data)
    }
}
