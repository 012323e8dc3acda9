//! Action Filters는 컨트롤러 액션 앞뒤에 필터 훅을 끼워 실행하는 디스패치 라이브러리입니다.
//!
//! # 주요 기능
//!
//! - 액션, 컨트롤러, 전역 범위의 필터 바인딩과 가중치 정렬
//! - 컨트롤러 등록 규칙 검사 (이름 접미사, 액션 이름 중복)
//! - 요청 시점의 액션 조회와 필터 실행 목록 생성
//! - 외부 호출용 재시도 실행기와 API 클라이언트
//!
//! # 예제
//!
//! ```
//! use action_filters::controller::{mark_controller, Controller, ControllerOptions, Member};
//! use action_filters::dispatch::{ActionError, RequestContext};
//! use action_filters::filter::ConfigStore;
//! use serde_json::{json, Value};
//! use std::sync::Arc;
//!
//! struct UserController;
//!
//! impl Controller for UserController {
//!     const NAME: &'static str = "UserController";
//!
//!     fn new(_ctx: &RequestContext) -> Self {
//!         UserController
//!     }
//!
//!     fn members() -> Vec<Member<Self>> {
//!         vec![Member::action("login", |_this: Arc<Self>, data: Value| async move {
//!             Ok::<_, ActionError>(json!({ "user": data["name"] }))
//!         })]
//!     }
//! }
//!
//! let store = ConfigStore::new();
//! let class = mark_controller::<UserController>(&store, &ControllerOptions::default()).unwrap();
//! assert_eq!(class.action_names().collect::<Vec<_>>(), vec!["login"]);
//! ```

pub mod client;
pub mod controller;
pub mod dispatch;
pub mod filter;
pub mod logging;
pub mod retry;
pub mod settings;

pub use controller::{mark_controller, Controller, ControllerOptions, Member};
pub use dispatch::{ActionError, ActionReturn, ControllerRouter, DispatchOutcome, RequestContext};
pub use filter::{create_filter, http_method_filter, ConfigError, ConfigStore, FilterOptions, Hooks};
pub use retry::{retry, with_retry, RetryError, RetryPolicy};
