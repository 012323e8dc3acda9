//! 컨트롤러 모델
//!
//! 컨트롤러는 액션 묶음입니다. 등록 시점에 대소문자를 무시하는 액션 조회 테이블을
//! 만들고, 이름 규칙을 검사합니다.

mod class;
mod mark;

pub use class::{
    ActionHandle, Controller, ControllerClass, ControllerKey, ErasedAction, Member, MemberKind,
    RESERVED_CONSTRUCTOR,
};
pub use mark::{mark_controller, ControllerOptions, DEFAULT_CONTROLLER_SUFFIX};
