use std::time::Duration;

/// 程序配置（进程级设置，来自环境变量）
///
/// 操作员的求职配置（关键词、地点、过滤条件、缓存答案）不在这里，
/// 见 [`crate::models::RunConfig`]。
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 是否自行启动浏览器（否则连接已打开的浏览器）
    pub launch_browser: bool,
    /// 自行启动时是否使用无头模式
    pub headless: bool,
    /// 自行启动时的浏览器可执行文件（为空则自动查找）
    pub chrome_executable: Option<String>,
    /// 登录页 URL
    pub login_url: String,
    /// 职位搜索页 URL（查询串拼接在其后）
    pub search_url: String,
    /// 求职配置文件（.json 或 .toml）
    pub run_config_path: String,
    /// 错误历史文件
    pub error_log_path: String,
    /// 已投递公司记录文件
    pub applied_log_path: String,
    /// 投递失败记录文件
    pub failed_log_path: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 短等待（元素出现、对话框打开）
    pub short_wait: Duration,
    /// 长等待（登录完成）
    pub long_wait: Duration,
    /// 轮询间隔
    pub poll_interval: Duration,
    /// 元素查找重试次数
    pub lookup_retries: usize,
    /// 元素查找重试间隔
    pub lookup_retry_delay: Duration,
    /// 每次点击后的停顿
    pub settle_delay: Duration,
    /// 申请对话框最多步数
    pub max_dialog_steps: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            launch_browser: false,
            headless: false,
            chrome_executable: None,
            login_url: "https://www.linkedin.com/login".to_string(),
            search_url: "https://www.linkedin.com/jobs/search/".to_string(),
            run_config_path: "config.json".to_string(),
            error_log_path: "error_log.json".to_string(),
            applied_log_path: "applied_companies_log.json".to_string(),
            failed_log_path: "failed_applications_log.json".to_string(),
            output_log_file: "output.txt".to_string(),
            short_wait: Duration::from_secs(10),
            long_wait: Duration::from_secs(30),
            poll_interval: Duration::from_millis(250),
            lookup_retries: 3,
            lookup_retry_delay: Duration::from_secs(2),
            settle_delay: Duration::from_secs(2),
            max_dialog_steps: 15,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT").unwrap_or(default.browser_debug_port),
            launch_browser: env_parse("LAUNCH_BROWSER").unwrap_or(default.launch_browser),
            headless: env_parse("HEADLESS").unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            login_url: std::env::var("LOGIN_URL").unwrap_or(default.login_url),
            search_url: std::env::var("SEARCH_URL").unwrap_or(default.search_url),
            run_config_path: std::env::var("RUN_CONFIG_PATH").unwrap_or(default.run_config_path),
            error_log_path: std::env::var("ERROR_LOG_PATH").unwrap_or(default.error_log_path),
            applied_log_path: std::env::var("APPLIED_LOG_PATH").unwrap_or(default.applied_log_path),
            failed_log_path: std::env::var("FAILED_LOG_PATH").unwrap_or(default.failed_log_path),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            short_wait: env_parse("SHORT_WAIT_SECS").map(Duration::from_secs).unwrap_or(default.short_wait),
            long_wait: env_parse("LONG_WAIT_SECS").map(Duration::from_secs).unwrap_or(default.long_wait),
            poll_interval: env_parse("POLL_INTERVAL_MS").map(Duration::from_millis).unwrap_or(default.poll_interval),
            lookup_retries: env_parse("LOOKUP_RETRIES").unwrap_or(default.lookup_retries),
            lookup_retry_delay: env_parse("LOOKUP_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(default.lookup_retry_delay),
            settle_delay: env_parse("SETTLE_DELAY_MS").map(Duration::from_millis).unwrap_or(default.settle_delay),
            max_dialog_steps: env_parse("MAX_DIALOG_STEPS").unwrap_or(default.max_dialog_steps),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(default.verbose_logging),
        }
    }

    /// 测试用配置：所有等待都缩短到毫秒级
    pub fn fast() -> Self {
        Self {
            short_wait: Duration::from_millis(50),
            long_wait: Duration::from_millis(100),
            poll_interval: Duration::from_millis(5),
            lookup_retry_delay: Duration::from_millis(1),
            settle_delay: Duration::ZERO,
            ..Self::default()
        }
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str) -> Option<T> {
    std::env::var(var_name).ok().and_then(|v| v.parse().ok())
}
