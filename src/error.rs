use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误（致命，运行前抛出）
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
    /// 页面元素相关错误（可恢复）
    #[error("页面错误: {0}")]
    Ui(#[from] UiError),
    /// 持久化错误
    #[error("持久化错误: {0}")]
    Persistence(#[from] PersistenceError),
    /// 操作员交互失败
    #[error("交互错误: {0}")]
    Prompt(String),
    /// 内置正则表达式无法编译
    #[error("正则表达式错误: {0}")]
    Pattern(#[from] regex::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 过滤条件的值不在枚举表中
    #[error("过滤条件 {category} 的值 '{value}' 没有对应的编码")]
    UnknownFilterValue { category: &'static str, value: String },
    /// 排序方式不在枚举表中
    #[error("未知的排序方式: '{0}'")]
    UnknownSortMode(String),
    /// 地点列表为空
    #[error("地点列表不能为空")]
    NoLocations,
    /// 求职配置文件无法加载
    #[error("无法加载求职配置 {path}: {message}")]
    RunConfigUnreadable { path: String, message: String },
    /// 登录页 URL 无法解析出站点
    #[error("无效的登录页 URL '{url}': {message}")]
    InvalidLoginUrl { url: String, message: String },
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    ConfigurationFailed(String),
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 执行脚本失败
    #[error("执行脚本失败: {0}")]
    ScriptExecutionFailed(#[from] chromiumoxide::error::CdpError),
    /// 脚本返回值无法解析
    #[error("脚本返回值解析失败: {0}")]
    UnexpectedScriptResult(#[from] serde_json::Error),
}

/// 页面元素错误
#[derive(Debug, Error)]
pub enum UiError {
    /// 重试后仍未找到元素
    #[error("未找到元素: {0}")]
    ElementNotFound(String),
    /// 等待超时
    #[error("等待 {what} 超时 ({timeout_ms}ms)")]
    Timeout { what: String, timeout_ms: u128 },
}

/// 持久化错误
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 文档解析失败
    #[error("解析文件失败 ({path}): {message}")]
    ParseFailed { path: String, message: String },
    /// 文档序列化失败
    #[error("序列化失败 ({path}): {message}")]
    SerializeFailed { path: String, message: String },
}

impl From<chromiumoxide::error::CdpError> for AppError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        AppError::Browser(BrowserError::ScriptExecutionFailed(err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Browser(BrowserError::UnexpectedScriptResult(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建元素未找到错误
    pub fn element_not_found(what: impl Into<String>) -> Self {
        AppError::Ui(UiError::ElementNotFound(what.into()))
    }

    /// 创建等待超时错误
    pub fn timeout(what: impl Into<String>, timeout: std::time::Duration) -> Self {
        AppError::Ui(UiError::Timeout {
            what: what.into(),
            timeout_ms: timeout.as_millis(),
        })
    }

    /// 是否为致命错误（只有配置错误会终止运行）
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Config(_))
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_only_config_errors_are_fatal() {
        let config = AppError::from(ConfigError::NoLocations);
        assert!(config.is_fatal());

        let timeout = AppError::timeout("对话框", Duration::from_secs(10));
        assert!(!timeout.is_fatal());
        assert_eq!(timeout.to_string(), "页面错误: 等待 对话框 超时 (10000ms)");

        let missing = AppError::element_not_found("button.next");
        assert!(!missing.is_fatal());
    }

    #[test]
    fn test_unknown_filter_value_message() {
        let err = ConfigError::UnknownFilterValue {
            category: "experience",
            value: "Guru".to_string(),
        };
        assert_eq!(err.to_string(), "过滤条件 experience 的值 'Guru' 没有对应的编码");
    }
}
