//! 일시적인 실패에 대비한 재시도 실행기
//!
//! 필터 시스템과는 독립적이며 외부 호출(API 클라이언트 등)을 감쌀 때 씁니다.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::settings::RetrySettings;

/// 기본 시도 횟수
pub const DEFAULT_RETRY_TOTAL: u32 = 3;

/// `(에러, 시도 번호)`를 받아 계속 시도할지 결정합니다.
pub type ShouldRetry<E> = Arc<dyn Fn(&E, u32) -> bool + Send + Sync>;

/// 재시도 정책
pub struct RetryPolicy<E> {
    /// 최대 시도 횟수 (최소 1회는 시도)
    pub total: u32,
    /// 재시도 간격
    pub delay: Option<Duration>,
    /// 실패 시 모든 에러를 모아서 반환할지 여부
    pub throw_all_errors: bool,
    pub should_retry: Option<ShouldRetry<E>>,
}

impl<E> Default for RetryPolicy<E> {
    fn default() -> Self {
        Self {
            total: DEFAULT_RETRY_TOTAL,
            delay: None,
            throw_all_errors: false,
            should_retry: None,
        }
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            total: self.total,
            delay: self.delay,
            throw_all_errors: self.throw_all_errors,
            should_retry: self.should_retry.clone(),
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("total", &self.total)
            .field("delay", &self.delay)
            .field("throw_all_errors", &self.throw_all_errors)
            .field("should_retry", &self.should_retry.is_some())
            .finish()
    }
}

impl<E> RetryPolicy<E> {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn throw_all_errors(mut self, enabled: bool) -> Self {
        self.throw_all_errors = enabled;
        self
    }

    pub fn should_retry<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E, u32) -> bool + Send + Sync + 'static,
    {
        self.should_retry = Some(Arc::new(predicate));
        self
    }

    pub fn params(&self) -> RetryParams {
        RetryParams {
            total: self.total,
            delay: self.delay,
            throw_all_errors: self.throw_all_errors,
        }
    }
}

impl<E> From<&RetrySettings> for RetryPolicy<E> {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            total: settings.count.saturating_add(1),
            delay: settings.delay_ms.map(Duration::from_millis),
            throw_all_errors: settings.throw_all_errors,
            should_retry: None,
        }
    }
}

/// 에러와 함께 보고되는 호출 시 정책 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryParams {
    pub total: u32,
    pub delay: Option<Duration>,
    pub throw_all_errors: bool,
}

/// 모든 시도가 실패했을 때의 에러
#[derive(Debug)]
pub enum RetryError<E> {
    /// 마지막 시도의 에러
    Last(E),
    /// 시도 순서대로 모은 모든 에러
    Aggregate {
        errors: Vec<E>,
        attempts: u32,
        params: RetryParams,
    },
}

impl<E> RetryError<E> {
    /// 가장 마지막 에러
    pub fn last(&self) -> Option<&E> {
        match self {
            RetryError::Last(error) => Some(error),
            RetryError::Aggregate { errors, .. } => errors.last(),
        }
    }

    pub fn into_errors(self) -> Vec<E> {
        match self {
            RetryError::Last(error) => vec![error],
            RetryError::Aggregate { errors, .. } => errors,
        }
    }
}

impl<E: fmt::Display> fmt::Display for RetryError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetryError::Last(error) => write!(f, "{}", error),
            RetryError::Aggregate { errors, attempts, params } => {
                write!(f, "{}회 시도 모두 실패 (최대 {}회)", attempts, params.total)?;
                for (index, error) in errors.iter().enumerate() {
                    write!(f, "; #{}: {}", index + 1, error)?;
                }
                Ok(())
            }
        }
    }
}

impl<E: std::error::Error + 'static> std::error::Error for RetryError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.last().map(|error| error as &(dyn std::error::Error + 'static))
    }
}

/// 재시도 가능한 작업 특성
#[async_trait]
pub trait RetryableOperation: Send + Sync {
    type Output: Send;
    type Error: Send;

    /// 작업 실행
    async fn execute(&self) -> Result<Self::Output, Self::Error>;
}

/// `RetryableOperation` 구현체를 정책에 따라 실행합니다.
pub async fn with_retry<O>(
    operation: &O,
    policy: &RetryPolicy<O::Error>,
) -> Result<O::Output, RetryError<O::Error>>
where
    O: RetryableOperation,
{
    retry(|| operation.execute(), policy).await
}

/// 재시도 로직 실행
///
/// 시도 번호는 1부터 시작합니다. 첫 성공 결과를 바로 반환하고, `should_retry`가
/// `false`를 돌려주면 남은 횟수와 상관없이 멈춥니다. 이때도 `throw_all_errors`면
/// 지금까지 모은 에러를 묶어 반환합니다.
pub async fn retry<F, Fut, T, E>(
    mut operation: F,
    policy: &RetryPolicy<E>,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let total = policy.total.max(1);
    let mut errors = Vec::new();
    let mut attempt = 0;

    loop {
        attempt += 1;
        let error = match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(attempt, "재시도 후 성공");
                }
                return Ok(result);
            }
            Err(error) => error,
        };

        let keep_going = policy
            .should_retry
            .as_ref()
            .map_or(true, |should_retry| should_retry(&error, attempt));

        if !keep_going || attempt >= total {
            if !keep_going {
                warn!(attempt, max_attempts = total, "재시도 중단");
            }
            return Err(finish(errors, error, policy));
        }

        warn!(attempt, max_attempts = total, "작업 실패, 재시도 예정");
        errors.push(error);
        if let Some(delay) = policy.delay {
            sleep(delay).await;
        }
    }
}

fn finish<E>(mut errors: Vec<E>, last: E, policy: &RetryPolicy<E>) -> RetryError<E> {
    if !policy.throw_all_errors {
        return RetryError::Last(last);
    }

    errors.push(last);
    RetryError::Aggregate {
        attempts: errors.len() as u32,
        errors,
        params: policy.params(),
    }
}
