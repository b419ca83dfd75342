//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用生命周期
//! - 加载并校验求职配置（在打开浏览器之前）
//! - 管理浏览器会话、账本、答案缓存和操作员交互
//! - 登录、打开职位搜索、输出全局统计
//!
//! ### `location_processor` - 地点循环
//! - 驱动地点游标，逐个地点调用扫描器
//!
//! ## 层次关系
//!
//! ```text
//! app (会话 + 持久化)
//!     ↓
//! location_processor (Vec<地点>)
//!     ↓
//! workflow::ListingScanner (单个地点的所有页)
//!     ↓
//! workflow::DialogFlow + FormResolver (单个职位)
//!     ↓
//! services (能力层：页面 / 账本 / 缓存 / 交互)
//!     ↓
//! infrastructure (基础设施：JsExecutor / 有界等待)
//! ```

pub mod app;
pub mod location_processor;

pub use app::App;
pub use location_processor::{process_locations, RunSummary};
