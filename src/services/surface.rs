//! 页面能力接口 - 业务能力层
//!
//! 流程层只通过这三个接口操作页面：
//! - `SearchSurface`：搜索结果与分页
//! - `DialogSurface`：申请对话框的控件
//! - `FormSurface`：对话框里的表单字段
//!
//! 每个方法都是一次性的探测或动作，等待和重试由流程层用
//! `infrastructure::wait` 组合。

use serde::Deserialize;

use crate::error::AppResult;

/// 对话框里可识别的控件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialogControl {
    /// 下一步
    Next,
    /// 检查申请
    Review,
    /// 提交申请
    Submit,
    /// 提交后的确认（Done）
    Done,
    /// 关闭对话框
    Dismiss,
    /// 关闭时"放弃未保存内容"的确认
    Discard,
}

/// 搜索结果页
#[allow(async_fn_in_trait)]
pub trait SearchSurface {
    /// 打开搜索 URL
    async fn open_search(&self, url: &str) -> AppResult<()>;

    /// 是否显示了"没有匹配结果"
    async fn no_results_shown(&self) -> AppResult<bool>;

    /// 结果列表是否已出现
    async fn results_present(&self) -> AppResult<bool>;

    /// 当前页的结果卡片数量
    async fn card_count(&self) -> AppResult<usize>;

    /// 第 index 张卡片上的公司名
    async fn company_at(&self, index: usize) -> AppResult<Option<String>>;

    /// 点击第 index 张卡片，卡片不存在时返回 false
    async fn open_card(&self, index: usize) -> AppResult<bool>;

    /// 详情面板是否已出现
    async fn details_present(&self) -> AppResult<bool>;

    /// 详情面板里是否有快速申请按钮
    async fn quick_apply_present(&self) -> AppResult<bool>;

    /// 点击快速申请按钮
    async fn start_quick_apply(&self) -> AppResult<bool>;

    /// 按页码跳转，没有该页码按钮时返回 false
    async fn go_to_page(&self, page: usize) -> AppResult<bool>;

    /// 是否出现了人机验证
    async fn challenge_present(&self) -> AppResult<bool>;
}

/// 申请对话框
#[allow(async_fn_in_trait)]
pub trait DialogSurface {
    /// 对话框是否打开
    async fn dialog_open(&self) -> AppResult<bool>;

    /// 控件是否存在
    async fn has_control(&self, control: DialogControl) -> AppResult<bool>;

    /// 点击控件，控件已消失时返回 false
    async fn activate(&self, control: DialogControl) -> AppResult<bool>;
}

/// 表单字段类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Select,
    TextArea,
    Checkbox,
    Radio,
    File,
    /// 找到了控件但类型不认识
    Unsupported,
    /// 找不到标签或控件
    Missing,
}

/// 选项（下拉项 / 复选框 / 单选按钮）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldOption {
    pub label: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub selected: bool,
}

/// 表单字段快照
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSnapshot {
    pub index: usize,
    pub kind: FieldKind,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
    /// 输入后需要从下拉建议中确认
    #[serde(default)]
    pub typeahead: bool,
    #[serde(default)]
    pub options: Vec<FieldOption>,
}

/// 对话框当前步骤的表单
#[allow(async_fn_in_trait)]
pub trait FormSurface {
    /// 当前可见的全部字段
    async fn fields(&self) -> AppResult<Vec<FieldSnapshot>>;

    /// 输入文本
    async fn fill_text(&self, field: usize, text: &str, typeahead: bool) -> AppResult<()>;

    /// 按选项的 value 选择下拉项，找不到该 value 时返回 false
    async fn select_value(&self, field: usize, value: &str) -> AppResult<bool>;

    /// 点击第 option 个复选框 / 单选按钮
    async fn toggle_option(&self, field: usize, option: usize) -> AppResult<bool>;

    /// 上传文件
    async fn attach_file(&self, field: usize, path: &str) -> AppResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_snapshot_from_script_result() {
        let raw = serde_json::json!([
            { "index": 0, "kind": "text", "label": "City", "value": "", "typeahead": true },
            { "index": 1, "kind": "text_area", "label": "Cover letter" },
            { "index": 2, "kind": "radio", "label": "Sponsorship?",
              "options": [ { "label": "Yes", "value": "yes", "selected": false },
                           { "label": "No", "value": "no", "selected": true } ] },
            { "index": 3, "kind": "missing" }
        ]);
        let fields: Vec<FieldSnapshot> = serde_json::from_value(raw).unwrap();
        assert_eq!(fields[0].kind, FieldKind::Text);
        assert!(fields[0].typeahead);
        assert_eq!(fields[1].kind, FieldKind::TextArea);
        assert!(fields[2].options[1].selected);
        assert_eq!(fields[3].kind, FieldKind::Missing);
        assert!(fields[3].label.is_empty());
    }
}
