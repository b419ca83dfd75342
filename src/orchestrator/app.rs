//! 应用 - 编排层
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：写日志文件头、加载并校验求职配置、打开三个账本，最后才启动浏览器会话
//! 2. **答案缓存**：运行期间的新答案写回求职配置文件
//! 3. **登录与搜索**：登录失败不致命，记录后继续
//! 4. **地点循环**：委托 `location_processor`
//! 5. **全局统计**：输出结果；有写盘失败时以错误结束

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppResult, ConfigError};
use crate::models::RunConfig;
use crate::orchestrator::location_processor::process_locations;
use crate::services::document_store::{DocumentStore, FileStore};
use crate::services::ledger::{LedgerDoc, Ledgers};
use crate::services::{encode_query, keyword_expression, AnswerCache, ConsolePrompter, Session};
use crate::utils::logging::{init_log_file, log_startup, print_final_stats};
use crate::workflow::{FlowSettings, ListingScanner, LocationCursor};

/// 应用主结构
pub struct App {
    config: Config,
    run_config: RunConfig,
    ledgers: Ledgers<FileStore<LedgerDoc>>,
    session: Session,
}

impl App {
    /// 初始化应用
    ///
    /// 求职配置和账本都在启动浏览器之前加载，任何一个出错都不会触碰网络。
    pub async fn initialize(config: Config) -> Result<Self> {
        init_log_file(&config.output_log_file)?;

        let run_config = load_run_config(&config.run_config_path)?;
        validate_run_config(&run_config)?;

        let keywords = keyword_expression(&run_config.keywords, &run_config.keywords_to_avoid);
        log_startup(run_config.locations.len(), &keywords);

        let ledgers = open_ledgers(&config)?;
        info!(
            "📒 已投递 {} 家，失败 {} 家，近期错误 {} 条",
            ledgers.applied.len(),
            ledgers.failed.len(),
            ledgers.errors.len()
        );

        let session = Session::start(&config)
            .await
            .context("浏览器会话启动失败")?;

        Ok(Self {
            config,
            run_config,
            ledgers,
            session,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(self) -> Result<()> {
        let Self {
            config,
            run_config,
            mut ledgers,
            session,
        } = self;

        let mut cache = AnswerCache::new(&run_config, FileStore::new(&config.run_config_path));
        let mut prompter = ConsolePrompter::stdio();
        let settings = FlowSettings::from_config(&config);
        let mut persistence_failures = 0;

        match session.login(&run_config.email, &run_config.password).await {
            Ok(true) => {}
            Ok(false) => {
                if ledgers.log_error("登录后没有出现导航栏，继续运行").is_err() {
                    persistence_failures += 1;
                }
            }
            Err(e) => {
                if ledgers.log_error(format!("登录失败: {}", e)).is_err() {
                    persistence_failures += 1;
                }
            }
        }

        if let Some(first) = run_config.locations.first() {
            let keywords = keyword_expression(&run_config.keywords, &run_config.keywords_to_avoid);
            match session.open_job_search(first, &keywords).await {
                Ok(true) => {}
                Ok(false) => warn!("⚠️ 职位搜索框没有出现，直接使用搜索 URL"),
                Err(e) => warn!("⚠️ 打开职位搜索失败: {}", e),
            }
        }

        let summary = {
            let mut scanner = ListingScanner::new(
                session.page(),
                &run_config,
                &settings,
                &mut ledgers,
                &mut cache,
                &mut prompter,
            );
            let mut cursor = LocationCursor::new(run_config.locations.clone());
            process_locations(&mut scanner, &mut cursor).await
        };

        if let Err(e) = session.close().await {
            warn!("⚠️ 关闭浏览器失败: {}", e);
        }

        let mut summary = summary?;
        summary.stats.persistence_failures += persistence_failures;
        print_final_stats(&summary.stats, &config.output_log_file);
        info!(
            "💾 答案缓存覆盖 {} 个地点",
            cache.snapshot().user_inputs.len()
        );

        if summary.stats.persistence_failures > 0 {
            bail!(
                "有 {} 次记录未能写入磁盘，请检查账本文件",
                summary.stats.persistence_failures
            );
        }
        Ok(())
    }
}

/// 打开已投递、失败和错误历史三个账本
pub fn open_ledgers(config: &Config) -> AppResult<Ledgers<FileStore<LedgerDoc>>> {
    Ok(Ledgers::open(
        FileStore::new(&config.applied_log_path),
        FileStore::new(&config.failed_log_path),
        FileStore::new(&config.error_log_path),
    )?)
}

/// 加载求职配置（.json 或 .toml）
pub fn load_run_config(path: &str) -> AppResult<RunConfig> {
    let store = FileStore::<RunConfig>::new(path);
    match store.load() {
        Ok(Some(run_config)) => Ok(run_config),
        Ok(None) => Err(ConfigError::RunConfigUnreadable {
            path: path.to_string(),
            message: "文件不存在或为空".to_string(),
        }
        .into()),
        Err(e) => Err(ConfigError::RunConfigUnreadable {
            path: path.to_string(),
            message: e.to_string(),
        }
        .into()),
    }
}

/// 校验求职配置：为每个地点编码一次查询，任何未知的过滤值都在这里失败
pub fn validate_run_config(run_config: &RunConfig) -> AppResult<()> {
    run_config.validate()?;
    for location in &run_config.locations {
        encode_query(run_config, location)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AppError, PersistenceError};

    const SAMPLE: &str = r#"{
        "email": "me@example.com",
        "password": "secret",
        "keywords": ["rust"],
        "keywordsToAvoid": [],
        "locations": ["Switzerland", "Belgium"],
        "filters": { "easy_apply": true, "experience": ["Entry level"] },
        "sortBy": "DD"
    }"#;

    #[test]
    fn test_load_and_validate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let run_config = load_run_config(path.to_str().unwrap()).unwrap();
        assert_eq!(run_config.locations.len(), 2);
        validate_run_config(&run_config).unwrap();
    }

    #[test]
    fn test_unknown_filter_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, SAMPLE.replace("Entry level", "Wizard")).unwrap();

        let run_config = load_run_config(path.to_str().unwrap()).unwrap();
        let err = validate_run_config(&run_config).unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            AppError::Config(ConfigError::UnknownFilterValue { .. })
        ));
    }

    #[tokio::test]
    async fn test_corrupt_ledger_stops_before_browser_starts() {
        let dir = tempfile::tempdir().unwrap();
        let path = |name: &str| dir.path().join(name).to_str().unwrap().to_string();
        std::fs::write(path("config.json"), SAMPLE).unwrap();
        std::fs::write(path("applied.json"), "{ not json").unwrap();

        // 浏览器路径不存在：如果先启动会话，错误会变成浏览器错误
        let config = Config {
            launch_browser: true,
            headless: true,
            chrome_executable: Some(path("no-such-chrome")),
            run_config_path: path("config.json"),
            applied_log_path: path("applied.json"),
            failed_log_path: path("failed.json"),
            error_log_path: path("errors.json"),
            output_log_file: path("output.txt"),
            ..Config::fast()
        };

        let err = match App::initialize(config).await {
            Ok(_) => panic!("损坏的账本应当让初始化失败"),
            Err(e) => e,
        };
        assert!(
            matches!(
                err.downcast_ref::<AppError>(),
                Some(AppError::Persistence(PersistenceError::ParseFailed { .. }))
            ),
            "{:#}",
            err
        );
    }

    #[test]
    fn test_missing_run_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_run_config(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(
            err,
            AppError::Config(ConfigError::RunConfigUnreadable { .. })
        ));
    }
}
