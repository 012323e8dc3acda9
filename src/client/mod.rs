//! 컨트롤러 액션을 원격으로 호출하는 클라이언트
//!
//! 호출 경로는 `origin/prefix/컨트롤러/액션`이며 전송은 재시도 실행기로 감쌉니다.

mod error;
mod service;
mod transport;

pub use error::{ApiError, TransportError};
pub use service::{
    join_url, ApiClient, ApiOptions, CallOptions, Envelope, ErrorHandler, FailedCall, OnError,
};
pub use transport::{HyperTransport, OutboundRequest, RawResponse, Transport};
