//! 地点循环 - 编排层
//!
//! 按配置顺序逐个地点扫描。每个地点结束（没有结果、超时或所有页处理完）
//! 后游标恰好前进一格，游标到头时循环结束。

use crate::error::AppResult;
use crate::models::RunConfig;
use crate::services::document_store::DocumentStore;
use crate::services::ledger::LedgerDoc;
use crate::services::prompter::Prompter;
use crate::services::surface::{DialogSurface, FormSurface, SearchSurface};
use crate::utils::logging::{log_location_complete, log_location_start};
use crate::workflow::{ApplyCtx, ListingScanner, LocationCursor, LocationOutcome, ScanStats};

/// 全部地点的处理结果
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// 汇总统计
    pub stats: ScanStats,
    /// 每个地点的结束原因，按处理顺序
    pub outcomes: Vec<(String, LocationOutcome)>,
}

/// 处理游标上剩余的所有地点
///
/// 只有配置错误和人工暂停失败会中断循环。
pub async fn process_locations<P, L, C, R>(
    scanner: &mut ListingScanner<'_, P, L, C, R>,
    cursor: &mut LocationCursor,
) -> AppResult<RunSummary>
where
    P: SearchSurface + DialogSurface + FormSurface,
    L: DocumentStore<LedgerDoc>,
    C: DocumentStore<RunConfig>,
    R: Prompter,
{
    let total = cursor.len();
    let mut summary = RunSummary::default();

    while let Some(location) = cursor.current() {
        let ctx = ApplyCtx::for_location(location, cursor.index() + 1, total);
        log_location_start(&ctx);

        let (outcome, stats) = scanner.scan_location(&ctx).await?;
        log_location_complete(&ctx, outcome, &stats);

        summary.stats += stats;
        summary.outcomes.push((ctx.location, outcome));
        cursor.advance();
    }

    Ok(summary)
}
