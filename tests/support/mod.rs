//! 测试用的页面假实现
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use quick_apply::error::AppResult;
use quick_apply::services::surface::{
    DialogControl, DialogSurface, FieldKind, FieldOption, FieldSnapshot, FormSurface,
    SearchSurface,
};
use quick_apply::workflow::{FlowSettings, StepReport, StepResolver};
use quick_apply::{Config, RunConfig};

/// 等待时间缩短到毫秒级的流程参数
pub fn settings() -> FlowSettings {
    FlowSettings::from_config(&Config::fast())
}

pub fn run_config(locations: &[&str]) -> RunConfig {
    serde_json::from_value(serde_json::json!({
        "email": "me@example.com",
        "password": "secret",
        "keywords": ["Rust"],
        "keywordsToAvoid": [],
        "locations": locations,
        "filters": { "easy_apply": true },
        "sortBy": "R"
    }))
    .unwrap()
}

// ========== 对话框 ==========

/// 对话框剧本：若干次"下一步"，可选"检查申请"，最后是否有"提交"
#[derive(Debug, Clone, Copy)]
pub struct DialogPlan {
    pub nexts: usize,
    pub review: bool,
    pub submit: bool,
}

impl DialogPlan {
    pub fn submitting_after(nexts: usize) -> Self {
        Self {
            nexts,
            review: false,
            submit: true,
        }
    }

    /// 没有任何可识别控件
    pub fn dead_end() -> Self {
        Self {
            nexts: 0,
            review: false,
            submit: false,
        }
    }
}

#[derive(Debug, Default)]
struct DialogProgress {
    nexts_left: usize,
    review: bool,
    submit: bool,
    submitted: bool,
    dismissed: bool,
}

/// 按剧本运行的对话框
#[derive(Debug, Default)]
pub struct FakeDialog {
    state: RefCell<Option<DialogProgress>>,
    pub activations: RefCell<Vec<DialogControl>>,
}

impl FakeDialog {
    pub fn open(plan: DialogPlan) -> Self {
        let dialog = Self::default();
        dialog.start(plan);
        dialog
    }

    pub fn start(&self, plan: DialogPlan) {
        *self.state.borrow_mut() = Some(DialogProgress {
            nexts_left: plan.nexts,
            review: plan.review,
            submit: plan.submit,
            ..Default::default()
        });
    }

    pub fn is_open(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn count(&self, control: DialogControl) -> usize {
        self.activations
            .borrow()
            .iter()
            .filter(|c| **c == control)
            .count()
    }

    fn present(&self, control: DialogControl) -> bool {
        let state = self.state.borrow();
        let Some(p) = state.as_ref() else {
            return false;
        };
        match control {
            DialogControl::Next => !p.submitted && !p.dismissed && p.nexts_left > 0,
            DialogControl::Review => !p.submitted && !p.dismissed && p.nexts_left == 0 && p.review,
            DialogControl::Submit => {
                !p.submitted && !p.dismissed && p.nexts_left == 0 && !p.review && p.submit
            }
            DialogControl::Done => p.submitted,
            DialogControl::Dismiss => !p.dismissed,
            DialogControl::Discard => p.dismissed,
        }
    }
}

impl DialogSurface for FakeDialog {
    async fn dialog_open(&self) -> AppResult<bool> {
        Ok(self.is_open())
    }

    async fn has_control(&self, control: DialogControl) -> AppResult<bool> {
        Ok(self.present(control))
    }

    async fn activate(&self, control: DialogControl) -> AppResult<bool> {
        if !self.present(control) {
            return Ok(false);
        }
        self.activations.borrow_mut().push(control);
        let mut state = self.state.borrow_mut();
        let mut close = false;
        if let Some(p) = state.as_mut() {
            match control {
                DialogControl::Next => p.nexts_left -= 1,
                DialogControl::Review => p.review = false,
                DialogControl::Submit => p.submitted = true,
                DialogControl::Dismiss => p.dismissed = true,
                DialogControl::Done | DialogControl::Discard => close = true,
            }
        }
        if close {
            *state = None;
        }
        Ok(true)
    }
}

/// 只计数的表单解析器
#[derive(Debug, Default)]
pub struct CountingResolver {
    pub calls: usize,
}

impl StepResolver for CountingResolver {
    async fn resolve_step(&mut self) -> AppResult<StepReport> {
        self.calls += 1;
        Ok(StepReport::default())
    }
}

// ========== 表单 ==========

pub fn text_field(index: usize, label: &str, typeahead: bool) -> FieldSnapshot {
    FieldSnapshot {
        index,
        kind: FieldKind::Text,
        label: label.to_string(),
        value: String::new(),
        typeahead,
        options: Vec::new(),
    }
}

pub fn option(label: &str, value: &str, selected: bool) -> FieldOption {
    FieldOption {
        label: label.to_string(),
        value: value.to_string(),
        selected,
    }
}

pub fn choice_field(
    index: usize,
    kind: FieldKind,
    label: &str,
    options: Vec<FieldOption>,
) -> FieldSnapshot {
    FieldSnapshot {
        index,
        kind,
        label: label.to_string(),
        value: String::new(),
        typeahead: false,
        options,
    }
}

/// 记录所有操作的表单，操作会改变字段状态
#[derive(Debug, Default)]
pub struct FakeForm {
    pub fields: RefCell<Vec<FieldSnapshot>>,
    pub actions: RefCell<Vec<String>>,
}

impl FakeForm {
    pub fn new(fields: Vec<FieldSnapshot>) -> Self {
        Self {
            fields: RefCell::new(fields),
            actions: RefCell::new(Vec::new()),
        }
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.borrow().clone()
    }

    fn with_field<T>(&self, index: usize, f: impl FnOnce(&mut FieldSnapshot) -> T) -> Option<T> {
        self.fields
            .borrow_mut()
            .iter_mut()
            .find(|field| field.index == index)
            .map(f)
    }
}

impl FormSurface for FakeForm {
    async fn fields(&self) -> AppResult<Vec<FieldSnapshot>> {
        Ok(self.fields.borrow().clone())
    }

    async fn fill_text(&self, field: usize, text: &str, typeahead: bool) -> AppResult<()> {
        self.actions
            .borrow_mut()
            .push(format!("fill {} {} {}", field, text, typeahead));
        self.with_field(field, |f| f.value = text.to_string());
        Ok(())
    }

    async fn select_value(&self, field: usize, value: &str) -> AppResult<bool> {
        let found = self
            .with_field(field, |f| {
                if !f.options.iter().any(|o| o.value == value) {
                    return false;
                }
                for o in f.options.iter_mut() {
                    o.selected = o.value == value;
                }
                true
            })
            .unwrap_or(false);
        if found {
            self.actions
                .borrow_mut()
                .push(format!("select {} {}", field, value));
        }
        Ok(found)
    }

    async fn toggle_option(&self, field: usize, option: usize) -> AppResult<bool> {
        let toggled = self
            .with_field(field, |f| {
                let radio = f.kind == FieldKind::Radio;
                if option >= f.options.len() {
                    return false;
                }
                if radio {
                    for (k, o) in f.options.iter_mut().enumerate() {
                        o.selected = k == option;
                    }
                } else {
                    f.options[option].selected = !f.options[option].selected;
                }
                true
            })
            .unwrap_or(false);
        if toggled {
            self.actions
                .borrow_mut()
                .push(format!("toggle {} {}", field, option));
        }
        Ok(toggled)
    }

    async fn attach_file(&self, field: usize, path: &str) -> AppResult<()> {
        self.actions
            .borrow_mut()
            .push(format!("attach {} {}", field, path));
        self.with_field(field, |f| f.value = path.to_string());
        Ok(())
    }
}

// ========== 搜索结果 ==========

#[derive(Debug, Clone)]
pub struct FakeCard {
    pub company: Option<String>,
    pub quick_apply: bool,
    pub plan: DialogPlan,
}

impl FakeCard {
    pub fn applying(company: &str, plan: DialogPlan) -> Self {
        Self {
            company: Some(company.to_string()),
            quick_apply: true,
            plan,
        }
    }

    pub fn without_quick_apply(company: &str) -> Self {
        Self {
            company: Some(company.to_string()),
            quick_apply: false,
            plan: DialogPlan::dead_end(),
        }
    }
}

/// 一次搜索的剧本
#[derive(Debug, Clone)]
pub enum FakeSearch {
    NoResults,
    /// 结果一直不出现
    Blank,
    /// 按页排列的卡片
    Pages(Vec<Vec<FakeCard>>),
}

/// 搜索页 + 对话框 + 空表单
#[derive(Debug, Default)]
pub struct FakeSite {
    searches: RefCell<VecDeque<FakeSearch>>,
    current: RefCell<Option<FakeSearch>>,
    page_index: Cell<usize>,
    opened_card: Cell<Option<usize>>,
    challenge_pending: Cell<bool>,
    pub dialog: FakeDialog,
    /// 打开过的搜索 URL
    pub visited: RefCell<Vec<String>>,
    /// 打开过对话框的公司
    pub dialogs_opened: RefCell<Vec<String>>,
}

impl FakeSite {
    pub fn new(searches: Vec<FakeSearch>) -> Self {
        Self {
            searches: RefCell::new(searches.into()),
            ..Default::default()
        }
    }

    /// 下一次检查时出现一次人机验证
    pub fn raise_challenge(&self) {
        self.challenge_pending.set(true);
    }

    fn card(&self, index: usize) -> Option<FakeCard> {
        match self.current.borrow().as_ref() {
            Some(FakeSearch::Pages(pages)) => pages
                .get(self.page_index.get())
                .and_then(|cards| cards.get(index))
                .cloned(),
            _ => None,
        }
    }
}

impl SearchSurface for FakeSite {
    async fn open_search(&self, url: &str) -> AppResult<()> {
        self.visited.borrow_mut().push(url.to_string());
        let next = self.searches.borrow_mut().pop_front();
        *self.current.borrow_mut() = next;
        self.page_index.set(0);
        self.opened_card.set(None);
        Ok(())
    }

    async fn no_results_shown(&self) -> AppResult<bool> {
        Ok(matches!(*self.current.borrow(), Some(FakeSearch::NoResults)))
    }

    async fn results_present(&self) -> AppResult<bool> {
        Ok(matches!(*self.current.borrow(), Some(FakeSearch::Pages(_))))
    }

    async fn card_count(&self) -> AppResult<usize> {
        Ok(match self.current.borrow().as_ref() {
            Some(FakeSearch::Pages(pages)) => pages.get(self.page_index.get()).map_or(0, Vec::len),
            _ => 0,
        })
    }

    async fn company_at(&self, index: usize) -> AppResult<Option<String>> {
        Ok(self.card(index).and_then(|card| card.company))
    }

    async fn open_card(&self, index: usize) -> AppResult<bool> {
        let exists = self.card(index).is_some();
        if exists {
            self.opened_card.set(Some(index));
        }
        Ok(exists)
    }

    async fn details_present(&self) -> AppResult<bool> {
        Ok(self.opened_card.get().is_some())
    }

    async fn quick_apply_present(&self) -> AppResult<bool> {
        Ok(self
            .opened_card
            .get()
            .and_then(|index| self.card(index))
            .is_some_and(|card| card.quick_apply))
    }

    async fn start_quick_apply(&self) -> AppResult<bool> {
        let Some(card) = self.opened_card.get().and_then(|index| self.card(index)) else {
            return Ok(false);
        };
        if !card.quick_apply {
            return Ok(false);
        }
        self.dialogs_opened
            .borrow_mut()
            .push(card.company.unwrap_or_default());
        self.dialog.start(card.plan);
        Ok(true)
    }

    async fn go_to_page(&self, page: usize) -> AppResult<bool> {
        let pages = match self.current.borrow().as_ref() {
            Some(FakeSearch::Pages(pages)) => pages.len(),
            _ => 0,
        };
        if page == 0 || page > pages {
            return Ok(false);
        }
        self.page_index.set(page - 1);
        self.opened_card.set(None);
        Ok(true)
    }

    async fn challenge_present(&self) -> AppResult<bool> {
        Ok(self.challenge_pending.replace(false))
    }
}

impl DialogSurface for FakeSite {
    async fn dialog_open(&self) -> AppResult<bool> {
        self.dialog.dialog_open().await
    }

    async fn has_control(&self, control: DialogControl) -> AppResult<bool> {
        self.dialog.has_control(control).await
    }

    async fn activate(&self, control: DialogControl) -> AppResult<bool> {
        self.dialog.activate(control).await
    }
}

impl FormSurface for FakeSite {
    async fn fields(&self) -> AppResult<Vec<FieldSnapshot>> {
        Ok(Vec::new())
    }

    async fn fill_text(&self, _field: usize, _text: &str, _typeahead: bool) -> AppResult<()> {
        Ok(())
    }

    async fn select_value(&self, _field: usize, _value: &str) -> AppResult<bool> {
        Ok(false)
    }

    async fn toggle_option(&self, _field: usize, _option: usize) -> AppResult<bool> {
        Ok(false)
    }

    async fn attach_file(&self, _field: usize, _path: &str) -> AppResult<()> {
        Ok(())
    }
}
