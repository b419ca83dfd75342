//! 页面选择器约定
//!
//! 目标站点的标记结构固定在这里，改版时只改这一个文件并提升版本号。

pub const SELECTOR_CONTRACT_VERSION: u32 = 1;

// ========== 登录 ==========
pub const LOGIN_EMAIL: &str = "input[name='session_key']";
pub const LOGIN_PASSWORD: &str = "input[name='session_password']";
/// 登录成功的标志：主导航里的 "Jobs" 入口
pub const NAV_JOBS_TEXT: &str = "Jobs";

// ========== 搜索 ==========
pub const SEARCH_KEYWORDS: &str = "input[aria-label='Search by title, skill, or company']";
pub const SEARCH_LOCATION: &str = "input[aria-label='City, state, or zip code']";
pub const NO_RESULTS_BANNER: &str = "div.jobs-search-no-results-banner";
pub const RESULT_LIST: &str = ".scaffold-layout__list-container";
pub const RESULT_CARD: &str = "li";
pub const CARD_COMPANY: &str =
    "div.artdeco-entity-lockup__subtitle span.job-card-container__primary-description";
pub const DETAILS_PANE: &str = ".jobs-search__job-details--wrapper";
pub const QUICK_APPLY_BUTTON: &str = "button.jobs-apply-button.artdeco-button--primary";
pub const PAGINATION: &str = ".artdeco-pagination__pages";

// ========== 申请对话框 ==========
pub const APPLY_DIALOG: &str = "div.artdeco-modal--layer-default.jobs-easy-apply-modal";
pub const NEXT_BUTTON: &str = "button[data-easy-apply-next-button]";
pub const REVIEW_BUTTON: &str = "button[aria-label='Review your application']";
pub const SUBMIT_BUTTON: &str = "button[aria-label='Submit application']";
pub const DONE_BUTTON: &str = "button.artdeco-button.artdeco-button--primary";
pub const DISMISS_BUTTON: &str = "button.artdeco-modal__dismiss";
pub const DISCARD_BUTTON: &str = "button[data-control-name='discard_application_confirm_btn']";
pub const FORM_FIELD_CONTAINERS: &str = "div[data-test-form-element], \
     fieldset[data-test-form-builder-radio-button-form-component], \
     fieldset[data-test-checkbox-form-component]";

// ========== 人机验证 ==========
pub const CHALLENGE_URL_MARKERS: [&str; 2] = ["/checkpoint/", "/challenge"];
pub const CHALLENGE_FRAME: &str = "iframe[src*='captcha'], #captcha-internal";

/// 表单字段被标记后使用的属性名
pub const FIELD_MARKER: &str = "data-qa-field";

/// 第 n 个表单字段的选择器
pub fn field_selector(index: usize) -> String {
    format!("{} [{}='{}']", APPLY_DIALOG, FIELD_MARKER, index)
}

/// 分页按钮
pub fn page_button(page: usize) -> String {
    format!("{} button[aria-label='Page {}']", PAGINATION, page)
}

/// 把选择器转成 JS 字符串字面量
pub fn js_str(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_str_escapes_quotes() {
        assert_eq!(js_str("button[aria-label='Page 2']"), "\"button[aria-label='Page 2']\"");
        assert_eq!(js_str("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_page_button() {
        assert_eq!(
            page_button(3),
            ".artdeco-pagination__pages button[aria-label='Page 3']"
        );
    }
}
