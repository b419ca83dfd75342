//! 职位页面 - 业务能力层
//!
//! 基于 JsExecutor 实现搜索、对话框和表单三个页面接口。
//! 所有探测都是一段 JS，选择器统一来自 `selectors`。

use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

use crate::error::AppResult;
use crate::infrastructure::JsExecutor;
use crate::services::selectors::{self, js_str};
use crate::services::surface::{
    DialogControl, DialogSurface, FieldSnapshot, FormSurface, SearchSurface,
};

/// 取当前结果卡片列表的 JS 片段
fn cards_js() -> String {
    format!(
        r#"const cards = () => {{
                const list = document.querySelector({list});
                if (!list) return [];
                let items = Array.from(list.querySelectorAll(':scope > li'));
                if (items.length === 0) items = Array.from(list.querySelectorAll({card}));
                return items;
            }};"#,
        list = js_str(selectors::RESULT_LIST),
        card = js_str(selectors::RESULT_CARD),
    )
}

/// 采集对话框表单字段的脚本
fn fields_js() -> String {
    format!(
        r#"
        (() => {{
            const dialog = document.querySelector({dialog});
            if (!dialog) return [];
            const textTypes = ['text', 'email', 'tel', 'number', 'url', 'search', ''];
            const optionLabel = (container, input) => {{
                if (input.id) {{
                    const byFor = container.querySelector(`label[for="${{CSS.escape(input.id)}}"]`);
                    if (byFor) return byFor.textContent;
                }}
                const next = input.nextElementSibling;
                if (next && next.tagName === 'LABEL') return next.textContent;
                return input.value || '';
            }};
            return Array.from(dialog.querySelectorAll({containers})).map((container, index) => {{
                container.setAttribute({marker}, String(index));
                const label = container.querySelector('label, legend');
                const control = container.querySelector('input, select, textarea');
                if (!label || !control) {{
                    return {{ index, kind: 'missing', label: label ? label.textContent : '' }};
                }}
                const tag = control.tagName.toLowerCase();
                const type = (control.getAttribute('type') || '').toLowerCase();
                let kind = 'unsupported';
                if (tag === 'select') kind = 'select';
                else if (tag === 'textarea') kind = 'text_area';
                else if (type === 'checkbox') kind = 'checkbox';
                else if (type === 'radio') kind = 'radio';
                else if (type === 'file') kind = 'file';
                else if (textTypes.includes(type)) kind = 'text';

                let options = [];
                if (kind === 'select') {{
                    options = Array.from(control.options).map(o => ({{
                        label: o.textContent.trim(), value: o.value, selected: o.selected
                    }}));
                }} else if (kind === 'checkbox' || kind === 'radio') {{
                    options = Array.from(container.querySelectorAll(`input[type="${{type}}"]`)).map(input => ({{
                        label: optionLabel(container, input).trim(), value: input.value || '', selected: input.checked
                    }}));
                }}
                const typeahead = control.getAttribute('role') === 'combobox'
                    || control.hasAttribute('aria-autocomplete');
                return {{ index, kind, label: label.textContent, value: control.value || '', typeahead, options }};
            }});
        }})()
        "#,
        dialog = js_str(selectors::APPLY_DIALOG),
        containers = js_str(selectors::FORM_FIELD_CONTAINERS),
        marker = js_str(selectors::FIELD_MARKER),
    )
}

/// 控件对应的选择器
fn control_selector(control: DialogControl) -> String {
    match control {
        DialogControl::Next => format!("{} {}", selectors::APPLY_DIALOG, selectors::NEXT_BUTTON),
        DialogControl::Review => format!("{} {}", selectors::APPLY_DIALOG, selectors::REVIEW_BUTTON),
        DialogControl::Submit => format!("{} {}", selectors::APPLY_DIALOG, selectors::SUBMIT_BUTTON),
        DialogControl::Done => format!(".artdeco-modal {}", selectors::DONE_BUTTON),
        DialogControl::Dismiss => format!(".artdeco-modal {}", selectors::DISMISS_BUTTON),
        DialogControl::Discard => selectors::DISCARD_BUTTON.to_string(),
    }
}

/// 职位页面
pub struct JobsPage {
    executor: JsExecutor,
    settle_delay: Duration,
}

impl JobsPage {
    pub fn new(executor: JsExecutor, settle_delay: Duration) -> Self {
        Self {
            executor,
            settle_delay,
        }
    }

    pub fn executor(&self) -> &JsExecutor {
        &self.executor
    }

    /// 点击后留给页面渲染的时间
    pub async fn settle(&self) {
        if !self.settle_delay.is_zero() {
            sleep(self.settle_delay).await;
        }
    }

    /// 元素是否存在且可见
    pub async fn is_visible(&self, selector: &str) -> AppResult<bool> {
        self.executor
            .eval_as(format!(
                "(() => {{ const el = document.querySelector({}); return !!el && el.getClientRects().length > 0; }})()",
                js_str(selector)
            ))
            .await
    }

    /// 元素是否存在
    pub async fn exists(&self, selector: &str) -> AppResult<bool> {
        self.executor
            .eval_as(format!("!!document.querySelector({})", js_str(selector)))
            .await
    }

    /// 用 JS 点击元素，元素不存在时返回 false
    pub async fn click(&self, selector: &str) -> AppResult<bool> {
        let clicked: bool = self
            .executor
            .eval_as(format!(
                "(() => {{ const el = document.querySelector({}); if (!el) return false; el.click(); return true; }})()",
                js_str(selector)
            ))
            .await?;
        if clicked {
            debug!("已点击: {}", selector);
            self.settle().await;
        }
        Ok(clicked)
    }

    /// 文本完全等于 `text` 的链接是否存在
    pub async fn link_with_text_exists(&self, text: &str) -> AppResult<bool> {
        self.executor
            .eval_as(format!(
                "Array.from(document.querySelectorAll('a')).some(a => a.textContent.trim() === {})",
                js_str(text)
            ))
            .await
    }

    /// 点击文本完全等于 `text` 的链接
    pub async fn click_link_with_text(&self, text: &str) -> AppResult<bool> {
        let clicked: bool = self
            .executor
            .eval_as(format!(
                r#"(() => {{
                    const link = Array.from(document.querySelectorAll('a')).find(a => a.textContent.trim() === {});
                    if (!link) return false;
                    link.click();
                    return true;
                }})()"#,
                js_str(text)
            ))
            .await?;
        if clicked {
            self.settle().await;
        }
        Ok(clicked)
    }
}

impl SearchSurface for JobsPage {
    async fn open_search(&self, url: &str) -> AppResult<()> {
        self.executor.goto(url).await?;
        self.settle().await;
        Ok(())
    }

    async fn no_results_shown(&self) -> AppResult<bool> {
        self.is_visible(selectors::NO_RESULTS_BANNER).await
    }

    async fn results_present(&self) -> AppResult<bool> {
        self.exists(selectors::RESULT_LIST).await
    }

    async fn card_count(&self) -> AppResult<usize> {
        self.executor
            .eval_as(format!("(() => {{ {} return cards().length; }})()", cards_js()))
            .await
    }

    async fn company_at(&self, index: usize) -> AppResult<Option<String>> {
        let company: Option<String> = self
            .executor
            .eval_as(format!(
                r#"(() => {{
                    {cards}
                    const card = cards()[{index}];
                    if (!card) return null;
                    const el = card.querySelector({company});
                    return el ? el.textContent.trim() : null;
                }})()"#,
                cards = cards_js(),
                index = index,
                company = js_str(selectors::CARD_COMPANY),
            ))
            .await?;
        Ok(company.filter(|name| !name.is_empty()))
    }

    async fn open_card(&self, index: usize) -> AppResult<bool> {
        let clicked: bool = self
            .executor
            .eval_as(format!(
                r#"(() => {{
                    {cards}
                    const card = cards()[{index}];
                    if (!card) return false;
                    card.scrollIntoView(true);
                    (card.querySelector('a') || card).click();
                    return true;
                }})()"#,
                cards = cards_js(),
                index = index,
            ))
            .await?;
        if clicked {
            self.settle().await;
        }
        Ok(clicked)
    }

    async fn details_present(&self) -> AppResult<bool> {
        self.exists(selectors::DETAILS_PANE).await
    }

    async fn quick_apply_present(&self) -> AppResult<bool> {
        self.exists(&format!(
            "{} {}",
            selectors::DETAILS_PANE,
            selectors::QUICK_APPLY_BUTTON
        ))
        .await
    }

    async fn start_quick_apply(&self) -> AppResult<bool> {
        self.click(&format!(
            "{} {}",
            selectors::DETAILS_PANE,
            selectors::QUICK_APPLY_BUTTON
        ))
        .await
    }

    async fn go_to_page(&self, page: usize) -> AppResult<bool> {
        self.click(&selectors::page_button(page)).await
    }

    async fn challenge_present(&self) -> AppResult<bool> {
        let url = self.executor.current_url().await?;
        if selectors::CHALLENGE_URL_MARKERS
            .iter()
            .any(|marker| url.contains(marker))
        {
            return Ok(true);
        }
        self.exists(selectors::CHALLENGE_FRAME).await
    }
}

impl DialogSurface for JobsPage {
    async fn dialog_open(&self) -> AppResult<bool> {
        self.exists(selectors::APPLY_DIALOG).await
    }

    async fn has_control(&self, control: DialogControl) -> AppResult<bool> {
        self.exists(&control_selector(control)).await
    }

    async fn activate(&self, control: DialogControl) -> AppResult<bool> {
        self.click(&control_selector(control)).await
    }
}

impl FormSurface for JobsPage {
    async fn fields(&self) -> AppResult<Vec<FieldSnapshot>> {
        self.executor.eval_as(fields_js()).await
    }

    async fn fill_text(&self, field: usize, text: &str, typeahead: bool) -> AppResult<()> {
        let selector = format!("{0} input, {0} textarea", selectors::field_selector(field));
        self.executor.clear_value(&selector).await?;
        self.executor.type_into(&selector, text).await?;
        if typeahead {
            // 等建议列表出现后选第一项
            sleep(Duration::from_secs(1).min(self.settle_delay)).await;
            self.executor
                .press_keys(&selector, &["ArrowDown", "Enter"])
                .await?;
        }
        Ok(())
    }

    async fn select_value(&self, field: usize, value: &str) -> AppResult<bool> {
        self.executor
            .eval_as(format!(
                r#"(() => {{
                    const select = document.querySelector({selector});
                    if (!select) return false;
                    const wanted = {value};
                    if (!Array.from(select.options).some(o => o.value === wanted)) return false;
                    select.value = wanted;
                    select.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return true;
                }})()"#,
                selector = js_str(&format!("{} select", selectors::field_selector(field))),
                value = js_str(value),
            ))
            .await
    }

    async fn toggle_option(&self, field: usize, option: usize) -> AppResult<bool> {
        self.executor
            .eval_as(format!(
                r#"(() => {{
                    const container = document.querySelector({selector});
                    if (!container) return false;
                    const input = container.querySelectorAll('input[type="checkbox"], input[type="radio"]')[{option}];
                    if (!input) return false;
                    input.click();
                    return true;
                }})()"#,
                selector = js_str(&selectors::field_selector(field)),
                option = option,
            ))
            .await
    }

    async fn attach_file(&self, field: usize, path: &str) -> AppResult<()> {
        let selector = format!("{} input[type='file']", selectors::field_selector(field));
        self.executor.set_file(&selector, path).await?;
        self.settle().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripts_embed_selectors_as_literals() {
        let script = fields_js();
        assert!(script.contains(&js_str(selectors::APPLY_DIALOG)));
        assert!(script.contains("text_area"));
        assert!(cards_js().contains(&js_str(selectors::RESULT_LIST)));
    }

    #[test]
    fn test_control_selectors_are_scoped() {
        assert!(control_selector(DialogControl::Next).starts_with(selectors::APPLY_DIALOG));
        assert_eq!(
            control_selector(DialogControl::Discard),
            selectors::DISCARD_BUTTON
        );
        assert!(control_selector(DialogControl::Done).starts_with(".artdeco-modal "));
    }
}
