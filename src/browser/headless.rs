use chromiumoxide::{Browser, BrowserConfig, Page};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::browser::connection::spawn_handler;
use crate::error::{AppResult, BrowserError};

/// 启动浏览器选项
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions<'a> {
    pub headless: bool,
    pub chrome_executable: Option<&'a str>,
}

/// 自行启动浏览器并打开空白页面
pub async fn launch_browser(options: LaunchOptions<'_>) -> AppResult<(Browser, Page)> {
    info!(
        "🚀 启动浏览器 ({})...",
        if options.headless { "无头模式" } else { "窗口模式" }
    );

    let mut builder = BrowserConfig::builder();
    builder = if options.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };
    if let Some(executable) = options.chrome_executable {
        debug!("浏览器可执行文件: {}", executable);
        builder = builder.chrome_executable(Path::new(executable));
    }
    let config = builder
        .args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
        ])
        .build()
        .map_err(|e| {
            error!("配置浏览器失败: {}", e);
            BrowserError::ConfigurationFailed(e)
        })?;

    let (browser, handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        BrowserError::ConfigurationFailed(e.to_string())
    })?;
    debug!("浏览器启动成功");
    spawn_handler(handler);

    sleep(Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        e
    })?;
    Ok((browser, page))
}
