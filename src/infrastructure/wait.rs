//! 有界等待 - 基础设施层
//!
//! 所有与页面交互的挂起点都只通过这里的两个原语表达：
//! - `wait_for`：轮询谓词，直到满足或超时
//! - `retry`：固定次数、固定间隔的重试

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// 轮询 `probe` 直到返回 `Some`，超过 `timeout` 返回超时错误
///
/// 探测过程中的错误视为暂时性错误，继续轮询。
pub async fn wait_for<T, F, Fut>(
    what: &str,
    timeout: Duration,
    poll_interval: Duration,
    mut probe: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => debug!("等待 {} 时出现暂时性错误: {}", what, e),
        }
        if Instant::now() >= deadline {
            return Err(AppError::timeout(what, timeout));
        }
        sleep(poll_interval).await;
    }
}

/// 轮询布尔谓词，返回是否在超时前满足
pub async fn appears_within<F, Fut>(
    what: &str,
    timeout: Duration,
    poll_interval: Duration,
    mut probe: F,
) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<bool>>,
{
    wait_for(what, timeout, poll_interval, || {
        let pending = probe();
        async move { pending.await.map(|ok| ok.then_some(())) }
    })
    .await
    .is_ok()
}

/// 最多尝试 `attempts` 次，每次失败后等待 `delay`
///
/// `op` 返回 `None` 或错误都算失败；全部失败后返回"未找到元素"。
pub async fn retry<T, F, Fut>(
    what: &str,
    attempts: usize,
    delay: Duration,
    mut op: F,
) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<Option<T>>>,
{
    for attempt in 1..=attempts.max(1) {
        match op().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => debug!("未找到 {} (尝试 {}/{})", what, attempt, attempts),
            Err(e) => debug!("查找 {} 失败 (尝试 {}/{}): {}", what, attempt, attempts, e),
        }
        if attempt < attempts {
            sleep(delay).await;
        }
    }
    Err(AppError::element_not_found(what))
}
