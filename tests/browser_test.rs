use quick_apply::browser::connect_to_browser_and_page;
use quick_apply::config::Config;
use quick_apply::infrastructure::JsExecutor;
use quick_apply::services::surface::{FormSurface, SearchSurface};
use quick_apply::services::JobsPage;
use quick_apply::utils::logging;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_browser_connection() {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();

    // 测试浏览器连接
    let result = connect_to_browser_and_page(config.browser_debug_port, None).await;

    assert!(result.is_ok(), "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore]
async fn test_blank_page_has_no_results_or_fields() {
    logging::init();
    let config = Config::from_env();

    let (_browser, page) = connect_to_browser_and_page(config.browser_debug_port, None)
        .await
        .expect("连接浏览器失败");
    let executor = JsExecutor::new(page);
    executor.goto("about:blank").await.expect("导航失败");

    let two: i64 = executor.eval_as("1 + 1").await.expect("执行脚本失败");
    assert_eq!(two, 2);

    let jobs = JobsPage::new(executor, std::time::Duration::ZERO);
    assert!(!jobs.results_present().await.unwrap());
    assert_eq!(jobs.card_count().await.unwrap(), 0);
    assert!(jobs.fields().await.unwrap().is_empty());
    assert!(!jobs.challenge_present().await.unwrap());
}
