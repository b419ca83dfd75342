//! # Quick Apply
//!
//! 在求职网站上按地点搜索职位并自动完成"快速申请"对话框的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `wait` - 有界等待与有限重试，所有挂起点都通过它表达
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `query_encoder` - 过滤条件 → 搜索查询串
//! - `Ledger` / `AnswerCache` - 持久化的账本和答案缓存
//! - `JobsPage` / `Session` - 页面能力与浏览器会话
//! - `Prompter` - 操作员交互
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个地点"和"一个职位"的完整处理流程
//! - `ListingScanner` - 搜索 → 逐页 → 逐个职位
//! - `DialogFlow` - 申请对话框状态机
//! - `FormResolver` - 表单字段解析
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用生命周期，持有会话和持久化资源
//! - `orchestrator/location_processor` - 地点循环
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser_and_page;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::JsExecutor;
pub use models::RunConfig;
pub use orchestrator::{process_locations, App, RunSummary};
pub use workflow::{
    ApplyCtx, DialogFlow, DialogOutcome, DialogState, ListingScanner, LocationCursor,
    LocationOutcome, ScanStats,
};
