use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::ConfigError;
use crate::models::answer::Answer;
use crate::models::filters::SortMode;

/// 地点 → (字段标签 → 答案)
pub type UserInputs = BTreeMap<String, BTreeMap<String, Answer>>;

/// 操作员的求职配置
///
/// 除 `user_inputs` 外在整个运行期间只读；`user_inputs` 由答案缓存维护，
/// 每次新增答案都会把整个文档写回原文件。
#[derive(Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(rename = "keywordsToAvoid", default)]
    pub keywords_to_avoid: Vec<String>,
    pub locations: Vec<String>,
    #[serde(default)]
    pub filters: FilterSelection,
    #[serde(rename = "sortBy", default = "default_sort_by")]
    pub sort_by: String,
    #[serde(default)]
    pub user_inputs: UserInputs,
    /// 其他字段原样保留，写回时不丢失
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

fn default_sort_by() -> String {
    SortMode::Relevance.code().to_string()
}

impl RunConfig {
    /// 基本校验：地点不能为空，排序方式必须可识别
    pub fn validate(&self) -> Result<SortMode, ConfigError> {
        if self.locations.is_empty() {
            return Err(ConfigError::NoLocations);
        }
        SortMode::parse(&self.sort_by)
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("email", &self.email)
            .field("password", &"***")
            .field("keywords", &self.keywords)
            .field("keywords_to_avoid", &self.keywords_to_avoid)
            .field("locations", &self.locations)
            .field("filters", &self.filters)
            .field("sort_by", &self.sort_by)
            .field("user_inputs", &self.user_inputs.len())
            .finish()
    }
}

/// 过滤条件（稀疏记录，空列表 / false 表示不过滤）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    #[serde(default)]
    pub easy_apply: bool,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(rename = "jobType", default)]
    pub job_type: Vec<String>,
    #[serde(rename = "timePostedRange", default)]
    pub time_posted_range: Vec<String>,
    #[serde(rename = "workplaceType", default)]
    pub workplace_type: Vec<String>,
    #[serde(default)]
    pub less_than_10_applicants: bool,
}
