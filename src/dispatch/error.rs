use hyper::StatusCode;

/// 훅과 액션 실행 중 발생하는 에러
///
/// 리졸버와 디스패처는 이 에러를 감싸거나 바꾸지 않고 그대로 전파합니다.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    /// HTTP 상태 코드로 응답해야 하는 오류
    #[error("{message}")]
    Status {
        status: StatusCode,
        message: String,
    },

    /// JSON 응답의 코드로 표현되는 업무 오류
    #[error("{message}")]
    Json {
        code: i64,
        message: String,
    },

    #[error("필터 {filter}의 파라미터 타입이 일치하지 않음")]
    ParamMismatch {
        filter: String,
    },

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl ActionError {
    pub fn status(status: StatusCode, message: impl Into<String>) -> Self {
        ActionError::Status {
            status,
            message: message.into(),
        }
    }

    pub fn json(code: i64, message: impl Into<String>) -> Self {
        ActionError::Json {
            code,
            message: message.into(),
        }
    }

    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ActionError::Other(Box::new(error))
    }
}
