//! 申请对话框状态机 - 流程层
//!
//! 每一步按优先级检查控件：
//! 1. 下一步 → 填写当前表单，点击，继续
//! 2. 检查申请 → 点击，继续
//! 3. 提交 → 点击，确认 Done，结束于 `Submitted`
//! 4. 都没有 → 关闭对话框并确认放弃，结束于 `Aborted`
//!
//! 控件中途消失、对话框没有出现、步数超过上限也都结束于 `Aborted`。
//! 同一职位不会自动重试。

use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::infrastructure::appears_within;
use crate::services::surface::{DialogControl, DialogSurface};
use crate::workflow::apply_ctx::{ApplyCtx, FlowSettings};
use crate::workflow::form_resolver::StepResolver;

/// 对话框状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    AwaitingStep,
    Submitted,
    Aborted,
}

/// 对话框运行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogOutcome {
    /// 终止状态（`Submitted` 或 `Aborted`）
    pub state: DialogState,
    /// 执行过的步数
    pub steps: usize,
    /// 表单解析次数
    pub resolver_calls: usize,
    /// 放弃原因
    pub reason: Option<String>,
}

impl DialogOutcome {
    pub fn is_submitted(&self) -> bool {
        self.state == DialogState::Submitted
    }
}

/// 一步之后的去向
enum Transition {
    Stay,
    Submit,
    Abort(String),
}

/// 申请对话框流程
///
/// - 只依赖 `DialogSurface`，表单交给 `StepResolver`
/// - 不写账本，结果由扫描器记录
pub struct DialogFlow<'a, D> {
    dialog: &'a D,
    settings: &'a FlowSettings,
}

impl<'a, D: DialogSurface> DialogFlow<'a, D> {
    pub fn new(dialog: &'a D, settings: &'a FlowSettings) -> Self {
        Self { dialog, settings }
    }

    pub async fn run<R: StepResolver>(
        &self,
        resolver: &mut R,
        ctx: &ApplyCtx,
    ) -> AppResult<DialogOutcome> {
        let mut outcome = DialogOutcome {
            state: DialogState::AwaitingStep,
            steps: 0,
            resolver_calls: 0,
            reason: None,
        };

        let dialog = self.dialog;
        let opened = appears_within(
            "申请对话框",
            self.settings.short_wait,
            self.settings.poll_interval,
            move || dialog.dialog_open(),
        )
        .await;
        if !opened {
            warn!("{} ⚠️ 申请对话框没有出现", ctx);
            outcome.state = DialogState::Aborted;
            outcome.reason = Some("申请对话框没有出现".to_string());
            return Ok(outcome);
        }

        while outcome.state == DialogState::AwaitingStep {
            if outcome.steps >= self.settings.max_dialog_steps {
                let reason = format!("超过 {} 步仍未提交", outcome.steps);
                self.abort(&mut outcome, ctx, reason).await;
                break;
            }
            outcome.steps += 1;

            match self.step(resolver, &mut outcome, ctx).await {
                Transition::Stay => {}
                Transition::Submit => {
                    self.acknowledge_done(ctx).await;
                    outcome.state = DialogState::Submitted;
                    info!("{} ✅ 申请已提交 (共 {} 步)", ctx, outcome.steps);
                }
                Transition::Abort(reason) => self.abort(&mut outcome, ctx, reason).await,
            }
        }

        Ok(outcome)
    }

    /// 执行一步
    async fn step<R: StepResolver>(
        &self,
        resolver: &mut R,
        outcome: &mut DialogOutcome,
        ctx: &ApplyCtx,
    ) -> Transition {
        if self.probe(DialogControl::Next).await {
            debug!("{} 第 {} 步: 下一步", ctx, outcome.steps);
            outcome.resolver_calls += 1;
            if let Err(e) = resolver.resolve_step().await {
                return Transition::Abort(format!("表单填写失败: {}", e));
            }
            return self.press(DialogControl::Next, Transition::Stay).await;
        }

        if self.probe(DialogControl::Review).await {
            debug!("{} 第 {} 步: 检查申请", ctx, outcome.steps);
            return self.press(DialogControl::Review, Transition::Stay).await;
        }

        if self.probe(DialogControl::Submit).await {
            debug!("{} 第 {} 步: 提交", ctx, outcome.steps);
            return self.press(DialogControl::Submit, Transition::Submit).await;
        }

        Transition::Abort("没有可识别的控件".to_string())
    }

    /// 点击控件；控件已消失时放弃
    async fn press(&self, control: DialogControl, then: Transition) -> Transition {
        match self.dialog.activate(control).await {
            Ok(true) => then,
            Ok(false) => Transition::Abort(format!("{:?} 控件已消失", control)),
            Err(e) => Transition::Abort(format!("点击 {:?} 失败: {}", control, e)),
        }
    }

    /// 控件是否存在；探测出错视为不存在
    async fn probe(&self, control: DialogControl) -> bool {
        match self.dialog.has_control(control).await {
            Ok(present) => present,
            Err(e) => {
                debug!("检查 {:?} 控件失败: {}", control, e);
                false
            }
        }
    }

    /// 在限定时间内等待控件出现并点击，返回是否点击成功
    async fn click_when_present(&self, control: DialogControl) -> bool {
        let dialog = self.dialog;
        let present = appears_within(
            &format!("{:?} 控件", control),
            self.settings.short_wait,
            self.settings.poll_interval,
            move || dialog.has_control(control),
        )
        .await;
        present && matches!(self.dialog.activate(control).await, Ok(true))
    }

    /// 提交后的确认
    async fn acknowledge_done(&self, ctx: &ApplyCtx) {
        if !self.click_when_present(DialogControl::Done).await {
            info!("{} 没有找到 Done 按钮，继续下一个职位", ctx);
        }
    }

    /// 关闭对话框并确认放弃
    async fn abort(&self, outcome: &mut DialogOutcome, ctx: &ApplyCtx, reason: String) {
        warn!("{} ⚠️ 放弃申请: {}", ctx, reason);
        if self.click_when_present(DialogControl::Dismiss).await {
            if !self.click_when_present(DialogControl::Discard).await {
                info!("{} 没有出现放弃确认", ctx);
            }
        } else {
            info!("{} 没有找到关闭按钮", ctx);
        }
        outcome.state = DialogState::Aborted;
        outcome.reason = Some(reason);
    }
}
