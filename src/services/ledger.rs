//! 账本服务 - 业务能力层
//!
//! 持久化的 键 → 时间戳 映射，带保留期清理。
//! 三个实例：已投递公司、投递失败公司、错误历史（时间戳 → 消息）。
//!
//! 每次写入都会立即落盘，然后按保留期清理；
//! 时间戳不晚于 `now - retention` 的条目（包括恰好等于的）会被删除。

use chrono::{DateTime, Duration, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

use crate::error::PersistenceError;
use crate::services::document_store::DocumentStore;

/// 账本文档
pub type LedgerDoc = BTreeMap<String, String>;

/// 时间戳存放在键还是值上
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSide {
    /// 公司名 → 时间戳
    Value,
    /// 时间戳 → 消息
    Key,
}

/// 已投递 / 失败记录保留两周
pub fn application_retention() -> Duration {
    Duration::weeks(2)
}

/// 错误历史保留一天
pub fn error_retention() -> Duration {
    Duration::days(1)
}

/// 持久化账本
#[derive(Debug)]
pub struct Ledger<S> {
    name: &'static str,
    entries: LedgerDoc,
    retention: Duration,
    side: TimestampSide,
    store: S,
}

impl<S: DocumentStore<LedgerDoc>> Ledger<S> {
    /// 从存储加载账本
    pub fn open(
        name: &'static str,
        store: S,
        retention: Duration,
        side: TimestampSide,
    ) -> Result<Self, PersistenceError> {
        let entries = store.load()?.unwrap_or_default();
        debug!("账本 {} 已加载 {} 条记录", name, entries.len());
        Ok(Self {
            name,
            entries,
            retention,
            side,
            store,
        })
    }

    /// 已投递公司
    pub fn applied(store: S) -> Result<Self, PersistenceError> {
        Self::open("applied", store, application_retention(), TimestampSide::Value)
    }

    /// 投递失败公司
    pub fn failed(store: S) -> Result<Self, PersistenceError> {
        Self::open("failed", store, application_retention(), TimestampSide::Value)
    }

    /// 错误历史
    pub fn errors(store: S) -> Result<Self, PersistenceError> {
        Self::open("errors", store, error_retention(), TimestampSide::Key)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &LedgerDoc {
        &self.entries
    }

    /// 写入一条记录：先落盘，再清理
    pub fn put(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        self.entries.insert(key.into(), value.into());
        self.store.save(&self.entries)?;
        self.prune(now)?;
        Ok(())
    }

    /// 以当前时间记录一个公司
    pub fn record(&mut self, company: &str, now: DateTime<Utc>) -> Result<(), PersistenceError> {
        self.put(company, format_timestamp(now), now)
    }

    /// 以时间戳为键记录一条消息；同一微秒内的重复键顺延 1 微秒
    pub fn record_message(
        &mut self,
        message: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        let mut stamp = now;
        while self.entries.contains_key(&format_timestamp(stamp)) {
            stamp += Duration::microseconds(1);
        }
        self.put(format_timestamp(stamp), message, now)
    }

    /// 删除时间戳不严格晚于 `now - retention` 的记录，返回删除条数
    ///
    /// 无法解析的时间戳视为已过期。
    pub fn prune(&mut self, now: DateTime<Utc>) -> Result<usize, PersistenceError> {
        let cutoff = now - self.retention;
        let side = self.side;
        let name = self.name;
        let before = self.entries.len();

        self.entries.retain(|key, value| {
            let raw = match side {
                TimestampSide::Key => key.as_str(),
                TimestampSide::Value => value.as_str(),
            };
            match parse_timestamp(raw) {
                Some(stamp) => stamp > cutoff,
                None => {
                    warn!("账本 {} 中的时间戳无法解析，已清理: {}", name, raw);
                    false
                }
            }
        });

        let removed = before - self.entries.len();
        if removed > 0 {
            debug!("账本 {} 清理了 {} 条过期记录", self.name, removed);
            self.store.save(&self.entries)?;
        }
        Ok(removed)
    }
}

/// 三个账本的集合，由扫描器独占使用
#[derive(Debug)]
pub struct Ledgers<S> {
    pub applied: Ledger<S>,
    pub failed: Ledger<S>,
    pub errors: Ledger<S>,
}

impl<S: DocumentStore<LedgerDoc>> Ledgers<S> {
    pub fn open(applied: S, failed: S, errors: S) -> Result<Self, PersistenceError> {
        Ok(Self {
            applied: Ledger::applied(applied)?,
            failed: Ledger::failed(failed)?,
            errors: Ledger::errors(errors)?,
        })
    }

    /// 记录错误：输出日志并写入错误历史
    pub fn log_error(&mut self, message: impl Into<String>) -> Result<(), PersistenceError> {
        let message = message.into();
        error!("{}", message);
        self.errors.record_message(message, Utc::now())
    }
}

/// RFC 3339，微秒精度，UTC
pub fn format_timestamp(stamp: DateTime<Utc>) -> String {
    stamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// 解析时间戳；兼容旧文件中 `2024-05-01 10:00:00.123456` 形式的本地时间
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(stamp.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| Local.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc))
}
