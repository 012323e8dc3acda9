use hyper::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::Envelope;
use crate::retry::RetryError;

/// 요청 한 번의 전송 에러
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("요청 생성 실패: {0}")]
    Request(#[from] hyper::http::Error),

    #[error("HTTP 요청 실패: {0}")]
    Http(String),

    #[error("응답 본문 읽기 실패: {0}")]
    Body(String),

    #[error("요청 시간 초과 ({0}ms)")]
    Timeout(u64),

    #[error("HTTP 상태 오류: {0}")]
    Status(StatusCode),
}

/// API 호출 에러
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("선언되지 않은 액션: {controller}.{action}")]
    UnknownAction { controller: String, action: String },

    #[error("잘못된 URL: {0}")]
    InvalidUrl(String),

    #[error("요청 데이터는 JSON 객체여야 합니다")]
    InvalidPayload,

    #[error("잘못된 헤더: {0}")]
    InvalidHeader(String),

    #[error(transparent)]
    Transport(#[from] RetryError<TransportError>),

    #[error("응답 디코딩 실패: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("업무 오류 (code={code}): {}", .message.as_deref().unwrap_or(""))]
    Business {
        code: Value,
        message: Option<String>,
        envelope: Envelope,
    },
}
