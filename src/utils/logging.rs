/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::workflow::{ApplyCtx, LocationOutcome, ScanStats};

/// 初始化 tracing，默认 info 级别，可用 RUST_LOG 覆盖
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quick_apply=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n快速申请日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .with_context(|| format!("无法写入日志文件: {}", log_file_path))?;
    Ok(())
}

/// 记录程序启动信息
///
/// # 参数
/// - `locations`: 地点总数
/// - `keywords`: 关键词表达式
pub fn log_startup(locations: usize, keywords: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 快速申请模式");
    info!("📍 地点数: {}", locations);
    info!("🔑 关键词: {}", truncate_text(keywords, 80));
    info!("{}", "=".repeat(60));
}

/// 记录地点开始信息
pub fn log_location_start(ctx: &ApplyCtx) {
    info!("\n{}", "=".repeat(60));
    info!("📍 开始处理地点 {}/{}: {}", ctx.location_index, ctx.location_total, ctx.location);
    info!("{}", "=".repeat(60));
}

/// 记录地点完成信息
pub fn log_location_complete(ctx: &ApplyCtx, outcome: LocationOutcome, stats: &ScanStats) {
    let reason = match outcome {
        LocationOutcome::NoResults => "没有匹配结果",
        LocationOutcome::TimedOut => "搜索超时",
        LocationOutcome::Exhausted => "所有页已处理",
    };
    info!("\n{}", "─".repeat(60));
    info!(
        "✓ {} 完成 ({}): 已投递 {}, 失败 {}, 扫描 {} 页",
        ctx, reason, stats.applied, stats.failed, stats.pages
    );
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息，并追加到日志文件
///
/// # 参数
/// - `stats`: 全部地点的汇总
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(stats: &ScanStats, log_file_path: &str) {
    let lines = final_stats_lines(stats);

    info!("\n{}", "=".repeat(60));
    for line in &lines {
        info!("{}", line);
    }
    info!("{}", "=".repeat(60));

    let appended = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .and_then(|mut file| writeln!(file, "{}", lines.join("\n")));
    match appended {
        Ok(()) => info!("\n日志已保存至: {}", log_file_path),
        Err(e) => tracing::warn!("⚠️ 写入日志文件失败: {}", e),
    }
}

fn final_stats_lines(stats: &ScanStats) -> Vec<String> {
    vec![
        "📊 全部处理完成统计".to_string(),
        format!(
            "完成时间: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!("✅ 已投递: {}", stats.applied),
        format!("❌ 失败: {}", stats.failed),
        format!("⏭️ 已投递过: {}", stats.already_applied),
        format!("🚫 无快速申请: {}", stats.no_quick_apply),
        format!("⚠️ 无法读取: {}", stats.skipped),
        format!("📄 扫描页数: {}", stats.pages),
        format!("💾 写盘失败: {}", stats.persistence_failures),
    ]
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("这是一段很长的文本", 4), "这是一段...");
    }

    #[test]
    fn test_final_stats_appended_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.txt");
        let path = path.to_str().unwrap();
        init_log_file(path).unwrap();

        let stats = ScanStats {
            applied: 2,
            failed: 1,
            ..Default::default()
        };
        print_final_stats(&stats, path);

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("快速申请日志"));
        assert!(content.contains("✅ 已投递: 2"));
        assert!(content.contains("❌ 失败: 1"));
    }
}
