//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS"、导航和原生输入的能力

use chromiumoxide::cdp::browser_protocol::dom::SetFileInputFilesParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::{AppResult, BrowserError};

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识职位 / 对话框
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> AppResult<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        // 脚本返回 undefined 时没有值
        Ok(result.value().cloned().unwrap_or(JsonValue::Null))
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 导航到 URL 并等待加载完成
    pub async fn goto(&self, url: &str) -> AppResult<()> {
        debug!("导航到: {}", url);
        self.page
            .goto(url)
            .await
            .map_err(|source| BrowserError::NavigationFailed {
                url: url.to_string(),
                source,
            })?;
        Ok(())
    }

    /// 当前页面 URL
    pub async fn current_url(&self) -> AppResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    /// 点击元素并逐键输入文本
    ///
    /// 逐键输入会触发页面框架的输入事件，单纯改 value 不会。
    pub async fn type_into(&self, selector: &str, text: &str) -> AppResult<()> {
        let element = self.page.find_element(selector).await?;
        element.click().await?;
        element.type_str(text).await?;
        Ok(())
    }

    /// 在元素上依次按键（如 "ArrowDown"、"Enter"）
    pub async fn press_keys(&self, selector: &str, keys: &[&str]) -> AppResult<()> {
        let element = self.page.find_element(selector).await?;
        for key in keys {
            element.press_key(*key).await?;
        }
        Ok(())
    }

    /// 清空输入框的值
    pub async fn clear_value(&self, selector: &str) -> AppResult<()> {
        self.eval(format!(
            "(() => {{ const el = document.querySelector({}); if (el) {{ el.value = ''; }} }})()",
            JsonValue::String(selector.to_string())
        ))
        .await?;
        Ok(())
    }

    /// 给文件输入框设置文件
    pub async fn set_file(&self, selector: &str, path: &str) -> AppResult<()> {
        let element = self.page.find_element(selector).await?;
        let mut params = SetFileInputFilesParams::new(vec![path.to_string()]);
        params.backend_node_id = Some(element.backend_node_id);
        self.page.execute(params).await?;
        Ok(())
    }
}
