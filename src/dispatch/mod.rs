//! 요청 시점 처리
//!
//! 리졸버가 액션과 필터 실행 목록을 만들고, 디스패처가 훅과 액션을 순서대로
//! 실행합니다. 라우터는 컨트롤러 이름으로 이 과정을 묶어 줍니다.

mod context;
mod dispatcher;
mod error;
mod resolver;
mod response;
mod router;

pub use context::RequestContext;
pub use dispatcher::{ActionDispatcher, PayloadTransform};
pub use error::ActionError;
pub use resolver::{resolve, ExecutionEntry, Resolution, ResolvedAction};
pub use response::{ActionReturn, Disposition, Responder};
pub use router::{ControllerRouter, DispatchOutcome};
