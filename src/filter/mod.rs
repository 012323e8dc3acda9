//! 필터 정의와 바인딩
//!
//! 필터는 `pre_action`/`post_action` 훅 쌍이며 액션, 컨트롤러, 전역 범위에
//! 바인딩할 수 있습니다. 바인딩 정보는 `ConfigStore`에 컨트롤러별로 쌓입니다.

pub mod builtin;
pub mod config;
mod error;
pub mod hooks;
pub mod registry;
pub mod store;

pub use builtin::http_method_filter;
pub use config::{ActionConfig, ControllerConfig, FilterBinding, FilterId, FilterSet};
pub use error::ConfigError;
pub use hooks::{CommonOptions, HookArgs, Hooks, ScopeConfig, TargetInfo, TargetKind};
pub use registry::{create_filter, BindableFilter, Filter, FilterOptions, OnBind};
pub use store::ConfigStore;
