use async_trait::async_trait;
use hyper::{Method, StatusCode};
use once_cell::sync::Lazy;

use super::hooks::{HookArgs, Hooks};
use super::registry::{create_filter, Filter, FilterOptions};
use crate::dispatch::ActionError;

/// 허용된 HTTP 메서드가 아니면 404로 거절하는 훅
pub struct HttpMethodHooks;

#[async_trait]
impl Hooks for HttpMethodHooks {
    type Param = Vec<Method>;

    async fn pre_action(&self, args: HookArgs<'_, Self::Param>) -> Result<(), ActionError> {
        let current = args.ctx.method.as_str();
        let allowed = args
            .param
            .iter()
            .any(|method| method.as_str().eq_ignore_ascii_case(current));

        if allowed {
            Ok(())
        } else {
            Err(ActionError::Status {
                status: StatusCode::NOT_FOUND,
                message: "not found!".to_string(),
            })
        }
    }
}

static HTTP_METHOD_FILTER: Lazy<Filter<HttpMethodHooks>> = Lazy::new(|| {
    create_filter("httpMethodFilter", HttpMethodHooks, FilterOptions::default())
});

/// 프로세스 전체에서 하나뿐인 HTTP 메서드 필터
pub fn http_method_filter() -> Filter<HttpMethodHooks> {
    HTTP_METHOD_FILTER.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_method_filter_is_singleton() {
        assert_eq!(http_method_filter().id(), http_method_filter().id());
        assert_eq!(http_method_filter().name(), "httpMethodFilter");
    }
}
