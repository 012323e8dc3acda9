use std::path::Path;

use tracing::{debug, error, info, span, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, fmt::time::UtcTime, EnvFilter};

use crate::settings::logging::{LogFormat, LogOutput};
use crate::settings::LogSettings;

/// 전역 구독자를 설치합니다.
///
/// 파일 출력이면 비동기 writer의 `WorkerGuard`를 돌려주며, 호출하는 쪽이
/// 들고 있어야 로그가 유실되지 않습니다. 이미 설치된 경우 조용히 넘어갑니다.
pub fn init_logging(settings: &LogSettings) -> Option<WorkerGuard> {
    let mut filter = EnvFilter::from_default_env().add_directive(settings.level.into());
    if settings.level >= Level::DEBUG {
        if let Ok(directive) = "action_filters=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    let builder = fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    let (writer, guard) = match &settings.output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::File(path) => {
            let path = Path::new(path);
            let directory = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|name| name.to_os_string())
                .unwrap_or_else(|| "actions.log".into());
            tracing_appender::non_blocking(tracing_appender::rolling::never(directory, file_name))
        }
    };

    let installed = match settings.format {
        LogFormat::Json => builder.json().with_writer(writer).try_init(),
        LogFormat::Text => builder.with_writer(writer).try_init(),
    };

    match installed {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

/// 디스패치 한 건의 기록
#[derive(Debug, Default)]
pub struct DispatchLog {
    pub request_id: String,
    pub controller: String,
    pub action: String,
    /// 실행 목록에 들어간 필터 수
    pub filters: usize,
    pub fallthrough: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

impl DispatchLog {
    pub fn new(request_id: String) -> Self {
        debug!(request_id = %request_id, "디스패치 기록 생성");
        Self {
            request_id,
            ..Self::default()
        }
    }

    /// 에러 메시지만 기록합니다. 출력은 `log_dispatch`가 합니다.
    pub fn with_error(&mut self, error: impl std::fmt::Display) {
        self.error = Some(error.to_string());
    }

    pub fn level(&self) -> Level {
        if self.error.is_some() {
            Level::ERROR
        } else if self.fallthrough {
            Level::DEBUG
        } else {
            Level::INFO
        }
    }
}

pub fn log_dispatch(log: &DispatchLog) {
    let level = log.level();

    let span = span!(
        Level::INFO,
        "dispatch",
        request_id = %log.request_id,
        controller = %log.controller,
        action = %log.action,
        duration_ms = %log.duration_ms
    );
    let _enter = span.enter();

    match level {
        Level::ERROR => error!(
            filters = log.filters,
            error = ?log.error,
            "디스패치 실패"
        ),
        Level::DEBUG => debug!("처리할 액션이 없어 요청을 넘김"),
        _ => info!(filters = log.filters, "디스패치 완료"),
    }
}
