//! 职位列表扫描 - 流程层
//!
//! 对游标当前的地点：
//! 1. 导航到编码后的搜索 URL，"没有结果"或超时则结束该地点
//! 2. 逐页、按渲染顺序处理结果卡片
//! 3. 已投递的公司直接跳过；其余打开详情，找到快速申请按钮则运行对话框状态机
//! 4. `Submitted` 写入已投递账本，`Aborted` 写入失败账本
//! 5. 找不到下一页按钮时结束该地点

use chrono::Utc;
use std::ops::AddAssign;
use tracing::{debug, error, info, warn};

use crate::error::{AppResult, PersistenceError};
use crate::infrastructure::{appears_within, retry, wait_for};
use crate::models::RunConfig;
use crate::services::answer_cache::AnswerCache;
use crate::services::document_store::DocumentStore;
use crate::services::ledger::{LedgerDoc, Ledgers};
use crate::services::prompter::Prompter;
use crate::services::query_encoder::encode_query;
use crate::services::surface::{DialogSurface, FormSurface, SearchSurface};
use crate::workflow::apply_ctx::{ApplyCtx, FlowSettings};
use crate::workflow::dialog_flow::DialogFlow;
use crate::workflow::form_resolver::FormResolver;

/// 扫描统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    /// 提交成功
    pub applied: usize,
    /// 对话框放弃
    pub failed: usize,
    /// 已投递过，跳过
    pub already_applied: usize,
    /// 没有快速申请按钮
    pub no_quick_apply: usize,
    /// 卡片无法读取或打开
    pub skipped: usize,
    /// 扫描过的页数
    pub pages: usize,
    /// 写盘失败次数
    pub persistence_failures: usize,
}

impl AddAssign for ScanStats {
    fn add_assign(&mut self, other: Self) {
        self.applied += other.applied;
        self.failed += other.failed;
        self.already_applied += other.already_applied;
        self.no_quick_apply += other.no_quick_apply;
        self.skipped += other.skipped;
        self.pages += other.pages;
        self.persistence_failures += other.persistence_failures;
    }
}

/// 一个地点的扫描为何结束
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationOutcome {
    /// 页面显示没有匹配结果
    NoResults,
    /// 搜索结果没有在限定时间内出现
    TimedOut,
    /// 所有页都处理完了
    Exhausted,
}

/// 单张卡片的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CardResult {
    Applied,
    Failed,
    AlreadyApplied,
    NoQuickApply,
    Skipped,
}

/// 职位列表扫描器
///
/// 独占三个账本、答案缓存和操作员交互，一次只处理一个地点。
pub struct ListingScanner<'a, P, L, C, R> {
    page: &'a P,
    config: &'a RunConfig,
    settings: &'a FlowSettings,
    ledgers: &'a mut Ledgers<L>,
    cache: &'a mut AnswerCache<C>,
    prompter: &'a mut R,
}

impl<'a, P, L, C, R> ListingScanner<'a, P, L, C, R>
where
    P: SearchSurface + DialogSurface + FormSurface,
    L: DocumentStore<LedgerDoc>,
    C: DocumentStore<RunConfig>,
    R: Prompter,
{
    pub fn new(
        page: &'a P,
        config: &'a RunConfig,
        settings: &'a FlowSettings,
        ledgers: &'a mut Ledgers<L>,
        cache: &'a mut AnswerCache<C>,
        prompter: &'a mut R,
    ) -> Self {
        Self {
            page,
            config,
            settings,
            ledgers,
            cache,
            prompter,
        }
    }

    /// 扫描一个地点
    ///
    /// 只有配置错误和人工暂停失败会返回 Err，其余问题都记录后继续。
    pub async fn scan_location(
        &mut self,
        ctx: &ApplyCtx,
    ) -> AppResult<(LocationOutcome, ScanStats)> {
        let mut stats = ScanStats::default();
        let query = encode_query(self.config, &ctx.location)?;
        let url = query.to_url(&self.settings.search_url);
        if self.settings.verbose_logging {
            info!("{} 搜索 URL: {}", ctx, url);
        } else {
            debug!("{} 搜索 URL: {}", ctx, url);
        }

        if let Err(e) = self.page.open_search(&url).await {
            self.record_error(&mut stats, format!("{} 打开搜索页失败: {}", ctx, e));
            return Ok((LocationOutcome::TimedOut, stats));
        }
        self.check_challenge().await?;

        let page = self.page;
        let has_results = wait_for(
            "搜索结果",
            self.settings.short_wait,
            self.settings.poll_interval,
            move || async move {
                if page.no_results_shown().await? {
                    return Ok(Some(false));
                }
                Ok(page.results_present().await?.then_some(true))
            },
        )
        .await;

        match has_results {
            Ok(false) => {
                info!("{} 没有匹配的职位，前往下一个地点", ctx);
                return Ok((LocationOutcome::NoResults, stats));
            }
            Err(e) => {
                self.record_error(&mut stats, format!("{} 搜索结果没有出现: {}", ctx, e));
                return Ok((LocationOutcome::TimedOut, stats));
            }
            Ok(true) => {}
        }

        let mut page_no = 1;
        loop {
            self.scan_page(&ctx.on_page(page_no), &mut stats).await?;
            stats.pages += 1;

            page_no += 1;
            if !self.go_to_page(page_no).await {
                info!("{} 没有第 {} 页，该地点扫描结束", ctx, page_no);
                break;
            }
            self.check_challenge().await?;
        }

        Ok((LocationOutcome::Exhausted, stats))
    }

    /// 处理当前页的所有卡片
    async fn scan_page(&mut self, ctx: &ApplyCtx, stats: &mut ScanStats) -> AppResult<()> {
        let count = match self.page.card_count().await {
            Ok(count) => count,
            Err(e) => {
                warn!("{} ⚠️ 读取结果卡片失败: {}", ctx, e);
                return Ok(());
            }
        };
        info!("{} 📄 本页 {} 个职位", ctx, count);

        for index in 0..count {
            let card_ctx = ctx.at_card(index + 1);
            match self.process_card(index, &card_ctx, stats).await? {
                CardResult::Applied => stats.applied += 1,
                CardResult::Failed => stats.failed += 1,
                CardResult::AlreadyApplied => stats.already_applied += 1,
                CardResult::NoQuickApply => stats.no_quick_apply += 1,
                CardResult::Skipped => stats.skipped += 1,
            }
        }
        Ok(())
    }

    /// 处理一张卡片
    async fn process_card(
        &mut self,
        index: usize,
        ctx: &ApplyCtx,
        stats: &mut ScanStats,
    ) -> AppResult<CardResult> {
        let page = self.page;
        let company = retry(
            "公司名",
            self.settings.lookup_retries,
            self.settings.lookup_retry_delay,
            move || page.company_at(index),
        )
        .await;
        let company = match company {
            Ok(company) => company,
            Err(e) => {
                warn!("{} ⚠️ 无法读取公司名，跳过: {}", ctx, e);
                return Ok(CardResult::Skipped);
            }
        };

        if self.ledgers.applied.contains(&company) {
            info!("{} 已投递过 {}，跳过", ctx, company);
            return Ok(CardResult::AlreadyApplied);
        }

        info!("{} 🔍 {}", ctx, company);
        if !matches!(self.page.open_card(index).await, Ok(true)) {
            warn!("{} ⚠️ 无法打开职位卡片", ctx);
            return Ok(CardResult::Skipped);
        }
        let details = appears_within(
            "职位详情",
            self.settings.short_wait,
            self.settings.poll_interval,
            move || page.details_present(),
        )
        .await;
        if !details {
            warn!("{} ⚠️ 职位详情没有出现", ctx);
            return Ok(CardResult::Skipped);
        }

        let quick_apply = retry(
            "快速申请按钮",
            self.settings.lookup_retries,
            self.settings.lookup_retry_delay,
            move || async move { Ok(page.quick_apply_present().await?.then_some(())) },
        )
        .await;
        if quick_apply.is_err() {
            info!("{} {} 没有快速申请，跳过", ctx, company);
            return Ok(CardResult::NoQuickApply);
        }

        let result = if matches!(self.page.start_quick_apply().await, Ok(true)) {
            self.apply(&company, ctx, stats).await
        } else {
            self.record_failure(&company, ctx, "快速申请按钮点击失败", stats);
            CardResult::Failed
        };

        self.check_challenge().await?;
        Ok(result)
    }

    /// 运行对话框并记录结果
    async fn apply(&mut self, company: &str, ctx: &ApplyCtx, stats: &mut ScanStats) -> CardResult {
        let mut resolver = FormResolver::new(
            self.page,
            &mut *self.cache,
            &mut *self.prompter,
            &ctx.location,
        );
        let outcome = DialogFlow::new(self.page, self.settings)
            .run(&mut resolver, ctx)
            .await;
        stats.persistence_failures += resolver.persistence_failures();

        match outcome {
            Ok(outcome) if outcome.is_submitted() => {
                if let Err(e) = self.ledgers.applied.record(company, Utc::now()) {
                    self.persistence_failed(stats, &e);
                }
                CardResult::Applied
            }
            Ok(outcome) => {
                let reason = outcome.reason.unwrap_or_else(|| "未知原因".to_string());
                self.record_failure(company, ctx, &reason, stats);
                CardResult::Failed
            }
            Err(e) => {
                self.record_failure(company, ctx, &e.to_string(), stats);
                CardResult::Failed
            }
        }
    }

    /// 按页码翻页，有限次重试
    async fn go_to_page(&self, page_no: usize) -> bool {
        let page = self.page;
        let clicked = retry(
            &format!("第 {} 页按钮", page_no),
            self.settings.lookup_retries,
            self.settings.lookup_retry_delay,
            move || async move { Ok(page.go_to_page(page_no).await?.then_some(())) },
        )
        .await;
        if clicked.is_err() {
            return false;
        }
        appears_within(
            "搜索结果",
            self.settings.short_wait,
            self.settings.poll_interval,
            move || page.results_present(),
        )
        .await
    }

    /// 出现人机验证时阻塞，直到操作员处理完毕
    async fn check_challenge(&mut self) -> AppResult<()> {
        if matches!(self.page.challenge_present().await, Ok(true)) {
            warn!("⚠️ 检测到人机验证，等待人工处理");
            self.prompter.pause_for_manual("CAPTCHA detected")?;
            info!("✓ 人工处理完成，继续");
        }
        Ok(())
    }

    fn record_failure(&mut self, company: &str, ctx: &ApplyCtx, reason: &str, stats: &mut ScanStats) {
        if let Err(e) = self.ledgers.failed.record(company, Utc::now()) {
            self.persistence_failed(stats, &e);
        }
        self.record_error(stats, format!("{} ❌ {} 投递失败: {}", ctx, company, reason));
    }

    /// 输出错误日志并写入错误历史
    fn record_error(&mut self, stats: &mut ScanStats, message: String) {
        if let Err(e) = self.ledgers.log_error(message) {
            self.persistence_failed(stats, &e);
        }
    }

    fn persistence_failed(&self, stats: &mut ScanStats, err: &PersistenceError) {
        error!("❌ 账本写入失败: {}", err);
        stats.persistence_failures += 1;
    }
}
