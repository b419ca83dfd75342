//! 表单解析 - 流程层
//!
//! 对话框每一步的表单字段：先按 (地点, 标签) 查答案缓存，
//! 没有才询问操作员，答案立即写回配置。
//!
//! 复选框 / 单选按钮只点击状态与期望不符的选项，重复执行不会改变已正确的表单。

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Answer, RunConfig};
use crate::services::answer_cache::AnswerCache;
use crate::services::document_store::DocumentStore;
use crate::services::prompter::Prompter;
use crate::services::surface::{FieldKind, FieldSnapshot, FormSurface};

/// 一步表单的处理结果
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    /// 实际操作过的字段
    pub filled: usize,
    /// 跳过的字段（已填写、找不到控件或操作失败）
    pub skipped: usize,
}

/// 对话框每一步调用一次的字段解析器
#[allow(async_fn_in_trait)]
pub trait StepResolver {
    async fn resolve_step(&mut self) -> AppResult<StepReport>;
}

/// 基于答案缓存和操作员询问的表单解析器
pub struct FormResolver<'a, F, S, P> {
    form: &'a F,
    cache: &'a mut AnswerCache<S>,
    prompter: &'a mut P,
    location: &'a str,
    persistence_failures: usize,
}

impl<'a, F, S, P> FormResolver<'a, F, S, P>
where
    F: FormSurface,
    S: DocumentStore<RunConfig>,
    P: Prompter,
{
    pub fn new(
        form: &'a F,
        cache: &'a mut AnswerCache<S>,
        prompter: &'a mut P,
        location: &'a str,
    ) -> Self {
        Self {
            form,
            cache,
            prompter,
            location,
            persistence_failures: 0,
        }
    }

    /// 答案写盘失败的次数（内存中的答案仍然生效）
    pub fn persistence_failures(&self) -> usize {
        self.persistence_failures
    }

    fn remember(&mut self, label: &str, answer: Answer) {
        if let Err(e) = self.cache.put(self.location, label, answer) {
            error!("❌ 答案保存失败 '{}': {}", label, e);
            self.persistence_failures += 1;
        }
    }

    /// 文本答案：缓存优先，否则询问
    fn text_answer(&mut self, label: &str) -> AppResult<String> {
        if let Some(answer) = self.cache.get(self.location, label) {
            return Ok(answer.to_string());
        }
        let reply = self.prompter.ask_text(label)?;
        self.remember(label, Answer::Text(reply.clone()));
        Ok(reply)
    }

    fn file_answer(&mut self, label: &str) -> AppResult<String> {
        if let Some(answer) = self.cache.get(self.location, label) {
            return Ok(answer.to_string());
        }
        let reply = self.prompter.ask_file(label)?;
        self.remember(label, Answer::Text(reply.clone()));
        Ok(reply)
    }

    /// 复选框答案；缓存里有但不是是/否时返回 None，不再询问
    fn flag_answer(&mut self, label: &str) -> AppResult<Option<bool>> {
        if let Some(answer) = self.cache.get(self.location, label) {
            let flag = answer.as_flag();
            if flag.is_none() {
                warn!("⚠️ 缓存的答案 '{}' 不是是/否，跳过复选框 '{}'", answer, label);
            }
            return Ok(flag);
        }
        let reply = self.prompter.ask_yes_no(label)?;
        self.remember(label, Answer::Flag(reply));
        Ok(Some(reply))
    }

    /// 选项答案：返回被选中的选项下标
    fn choice_answer(
        &mut self,
        label: &str,
        choices: &[String],
        matches: impl Fn(&str, &str) -> bool,
        stored: impl Fn(usize) -> String,
    ) -> AppResult<Option<usize>> {
        if let Some(answer) = self.cache.get(self.location, label) {
            let wanted = answer.to_string();
            let position = (0..choices.len()).find(|&i| matches(&stored(i), &wanted));
            if position.is_none() {
                warn!("⚠️ 缓存的答案 '{}' 不在 '{}' 的选项中，跳过", wanted, label);
            }
            return Ok(position);
        }
        let index = self.prompter.ask_choice(label, choices)?;
        self.remember(label, Answer::Text(stored(index)));
        Ok(Some(index))
    }

    /// 处理单个字段，返回是否实际操作了页面
    async fn resolve_field(&mut self, field: &FieldSnapshot) -> AppResult<bool> {
        let label = normalize_label(&field.label)?;
        match field.kind {
            FieldKind::Missing | FieldKind::Unsupported => {
                debug!("跳过无法识别的字段 #{} '{}'", field.index, label);
                Ok(false)
            }
            _ if label.is_empty() && field.kind != FieldKind::Checkbox => {
                debug!("跳过没有标签的字段 #{}", field.index);
                Ok(false)
            }
            FieldKind::Text | FieldKind::TextArea => {
                if !field.value.trim().is_empty() {
                    debug!("字段 '{}' 已有内容，跳过", label);
                    return Ok(false);
                }
                let text = self.text_answer(&label)?;
                let typeahead = field.kind == FieldKind::Text && field.typeahead;
                self.form.fill_text(field.index, &text, typeahead).await?;
                Ok(true)
            }
            FieldKind::Select => {
                let options: Vec<_> = field
                    .options
                    .iter()
                    .filter(|option| !option.value.is_empty())
                    .collect();
                if options.is_empty() {
                    return Ok(false);
                }
                let labels: Vec<String> = options.iter().map(|o| o.label.clone()).collect();
                let chosen = self.choice_answer(
                    &label,
                    &labels,
                    |value, wanted| value == wanted,
                    |i| options[i].value.clone(),
                )?;
                let Some(index) = chosen else {
                    return Ok(false);
                };
                let option = options[index];
                if option.selected {
                    return Ok(false);
                }
                if !self.form.select_value(field.index, &option.value).await? {
                    warn!("⚠️ 下拉框 '{}' 中没有值 '{}'", label, option.value);
                    return Ok(false);
                }
                Ok(true)
            }
            FieldKind::Radio => {
                let labels = field
                    .options
                    .iter()
                    .map(|option| normalize_label(&option.label))
                    .collect::<AppResult<Vec<_>>>()?;
                if labels.is_empty() {
                    return Ok(false);
                }
                let chosen = self.choice_answer(
                    &label,
                    &labels,
                    |option, wanted| option.eq_ignore_ascii_case(wanted),
                    |i| labels[i].clone(),
                )?;
                let Some(index) = chosen else {
                    return Ok(false);
                };
                if field.options[index].selected {
                    return Ok(false);
                }
                Ok(self.form.toggle_option(field.index, index).await?)
            }
            FieldKind::Checkbox => {
                let mut toggled = false;
                for (index, option) in field.options.iter().enumerate() {
                    let option_label = match normalize_label(&option.label)? {
                        sub_key if !sub_key.is_empty() => sub_key,
                        _ => label.clone(),
                    };
                    if option_label.is_empty() {
                        continue;
                    }
                    let Some(desired) = self.flag_answer(&option_label)? else {
                        continue;
                    };
                    if option.selected != desired {
                        toggled |= self.form.toggle_option(field.index, index).await?;
                    }
                }
                Ok(toggled)
            }
            FieldKind::File => {
                if !field.value.trim().is_empty() {
                    return Ok(false);
                }
                let path = self.file_answer(&label)?;
                self.form.attach_file(field.index, &path).await?;
                Ok(true)
            }
        }
    }
}

impl<F, S, P> StepResolver for FormResolver<'_, F, S, P>
where
    F: FormSurface,
    S: DocumentStore<RunConfig>,
    P: Prompter,
{
    async fn resolve_step(&mut self) -> AppResult<StepReport> {
        let fields = self.form.fields().await?;
        let mut report = StepReport::default();

        for field in &fields {
            match self.resolve_field(field).await {
                Ok(true) => report.filled += 1,
                Ok(false) => report.skipped += 1,
                // 操作员无法作答时整个对话框放弃
                Err(e @ AppError::Prompt(_)) => return Err(e),
                Err(e) => {
                    warn!("⚠️ 字段 #{} 处理失败，跳过: {}", field.index, e);
                    report.skipped += 1;
                }
            }
        }

        info!(
            "📝 表单: {} 个字段已填写, {} 个跳过",
            report.filled, report.skipped
        );
        Ok(report)
    }
}

fn whitespace() -> AppResult<&'static Regex> {
    static WHITESPACE: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    WHITESPACE
        .get_or_init(|| Regex::new(r"\s+"))
        .as_ref()
        .map_err(|e| AppError::Pattern(e.clone()))
}

/// 规范化标签文本
///
/// 合并空白；页面上为读屏器重复渲染的标签（"City City"、"CityCity"）只保留一份。
pub fn normalize_label(raw: &str) -> AppResult<String> {
    let collapsed = whitespace()?.replace_all(raw.trim(), " ").into_owned();

    let chars: Vec<char> = collapsed.chars().collect();
    let half = chars.len() / 2;
    if half > 0 {
        let (first, rest) = chars.split_at(half);
        if chars.len() % 2 == 0 && first == rest {
            return Ok(first.iter().collect());
        }
        if chars.len() % 2 == 1 && rest[0] == ' ' && first == &rest[1..] {
            return Ok(first.iter().collect());
        }
    }
    Ok(collapsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_label() {
        let cases = [
            ("  Phone\n   number ", "Phone number"),
            ("Phone\t\u{a0}number", "Phone number"),
            ("CityCity", "City"),
            ("Mobile phone Mobile phone", "Mobile phone"),
            ("Yes", "Yes"),
            ("a a b", "a a b"),
            ("", ""),
        ];
        for (raw, expected) in cases {
            assert_eq!(normalize_label(raw).unwrap(), expected, "输入: {:?}", raw);
        }
    }
}
