//! 答案缓存 - 业务能力层
//!
//! (地点, 字段标签) → 答案。新答案写入后立即把整个求职配置写回存储。

use tracing::debug;

use crate::error::PersistenceError;
use crate::models::{Answer, RunConfig};
use crate::services::document_store::DocumentStore;

/// 答案缓存
///
/// 持有求职配置的一份快照，只修改其中的 `user_inputs`。
/// 运行期间快照是答案的唯一权威副本，也是写回文件的内容；
/// 构造时传入的配置之后只用于搜索条件，不会看到新答案。
#[derive(Debug)]
pub struct AnswerCache<S> {
    snapshot: RunConfig,
    store: S,
}

impl<S: DocumentStore<RunConfig>> AnswerCache<S> {
    pub fn new(config: &RunConfig, store: S) -> Self {
        Self {
            snapshot: config.clone(),
            store,
        }
    }

    pub fn get(&self, location: &str, label: &str) -> Option<&Answer> {
        self.snapshot.user_inputs.get(location)?.get(label)
    }

    /// 写入答案并持久化整个配置快照
    pub fn put(
        &mut self,
        location: &str,
        label: &str,
        answer: Answer,
    ) -> Result<(), PersistenceError> {
        debug!("缓存答案 [{}] {} = {}", location, label, answer);
        self.snapshot
            .user_inputs
            .entry(location.to_string())
            .or_default()
            .insert(label.to_string(), answer);
        self.store.save(&self.snapshot)
    }

    pub fn snapshot(&self) -> &RunConfig {
        &self.snapshot
    }
}
