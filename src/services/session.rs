//! 会话控制 - 业务能力层
//!
//! 持有浏览器，负责登录和顶层导航。登录失败不致命：
//! 记录错误后继续运行，后续步骤会因找不到元素而自行降级。

use chromiumoxide::Browser;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::browser::{self, LaunchOptions};
use crate::config::Config;
use crate::error::{AppResult, ConfigError};
use crate::infrastructure::{appears_within, JsExecutor};
use crate::services::jobs_page::JobsPage;
use crate::services::selectors;

/// 浏览器会话
pub struct Session {
    browser: Browser,
    page: JobsPage,
    /// 浏览器是否由本程序启动（决定结束时是否关闭）
    launched: bool,
    login_url: String,
    short_wait: Duration,
    long_wait: Duration,
    poll_interval: Duration,
}

impl Session {
    /// 连接或启动浏览器
    pub async fn start(config: &Config) -> AppResult<Self> {
        info!("🌐 页面选择器约定 v{}", selectors::SELECTOR_CONTRACT_VERSION);
        let (browser, page) = if config.launch_browser {
            browser::launch_browser(LaunchOptions {
                headless: config.headless,
                chrome_executable: config.chrome_executable.as_deref(),
            })
            .await?
        } else {
            let origin = site_origin(&config.login_url)?;
            browser::connect_to_browser_and_page(config.browser_debug_port, Some(&origin)).await?
        };

        Ok(Self {
            browser,
            page: JobsPage::new(JsExecutor::new(page), config.settle_delay),
            launched: config.launch_browser,
            login_url: config.login_url.clone(),
            short_wait: config.short_wait,
            long_wait: config.long_wait,
            poll_interval: config.poll_interval,
        })
    }

    pub fn page(&self) -> &JobsPage {
        &self.page
    }

    /// 登录，返回是否观察到登录成功的标志
    pub async fn login(&self, email: &str, password: &str) -> AppResult<bool> {
        info!("🔐 正在登录: {}", email);
        self.page.executor().goto(&self.login_url).await?;

        let page = &self.page;
        let executor = page.executor();
        let form_ready = appears_within("登录表单", self.short_wait, self.poll_interval, move || async move {
            Ok(page.exists(selectors::LOGIN_EMAIL).await?
                && page.exists(selectors::LOGIN_PASSWORD).await?)
        })
        .await;

        if form_ready {
            executor.clear_value(selectors::LOGIN_EMAIL).await?;
            executor.type_into(selectors::LOGIN_EMAIL, email).await?;
            executor.clear_value(selectors::LOGIN_PASSWORD).await?;
            executor.type_into(selectors::LOGIN_PASSWORD, password).await?;
            executor.press_keys(selectors::LOGIN_PASSWORD, &["Enter"]).await?;
        } else {
            // 可能已经处于登录状态
            debug!("未找到登录表单");
        }

        let logged_in = appears_within("登录成功标志", self.long_wait, self.poll_interval, move || {
            page.link_with_text_exists(selectors::NAV_JOBS_TEXT)
        })
        .await;

        if logged_in {
            info!("✓ 登录成功");
        }
        Ok(logged_in)
    }

    /// 从导航进入职位页并在搜索框里输入关键词和地点
    ///
    /// 返回搜索框是否出现；之后扫描器会直接导航到编码后的搜索 URL。
    pub async fn open_job_search(&self, location: &str, keywords: &str) -> AppResult<bool> {
        info!("🔍 打开职位搜索: {}", location);
        if !self.page.click_link_with_text(selectors::NAV_JOBS_TEXT).await? {
            warn!("⚠️ 导航栏中没有找到 \"{}\" 入口", selectors::NAV_JOBS_TEXT);
            return Ok(false);
        }

        let page = &self.page;
        let executor = page.executor();
        let search_ready = appears_within("搜索框", self.short_wait, self.poll_interval, move || async move {
            Ok(page.exists(selectors::SEARCH_KEYWORDS).await?
                && page.exists(selectors::SEARCH_LOCATION).await?)
        })
        .await;
        if !search_ready {
            return Ok(false);
        }

        executor.clear_value(selectors::SEARCH_KEYWORDS).await?;
        executor.type_into(selectors::SEARCH_KEYWORDS, keywords).await?;
        executor.clear_value(selectors::SEARCH_LOCATION).await?;
        executor.type_into(selectors::SEARCH_LOCATION, location).await?;
        executor.press_keys(selectors::SEARCH_LOCATION, &["Enter"]).await?;
        page.settle().await;
        Ok(true)
    }

    /// 结束会话；只关闭由本程序启动的浏览器
    pub async fn close(mut self) -> AppResult<()> {
        info!("🛑 会话结束");
        if self.launched {
            self.browser.close().await?;
            // 等待浏览器进程退出，不关心结果
            let _ = self.browser.wait().await;
        }
        Ok(())
    }
}

/// URL 的站点部分（scheme + host + 非默认端口）
fn site_origin(raw: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidLoginUrl {
        url: raw.to_string(),
        message,
    };
    let origin = Url::parse(raw).map_err(|e| invalid(e.to_string()))?.origin();
    if !origin.is_tuple() {
        return Err(invalid("没有可识别的站点".to_string()));
    }
    Ok(origin.ascii_serialization())
}
