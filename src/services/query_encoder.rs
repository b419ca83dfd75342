//! 搜索查询编码 - 业务能力层
//!
//! 纯函数：求职配置 + 当前地点 → 查询串。
//! 所有过滤值先全部解析，任何一个不在枚举表里就直接返回配置错误，
//! 不会产生半成品查询。

use crate::error::ConfigError;
use crate::models::filters::{
    geo_code, resolve_all, ExperienceLevel, JobType, SortMode, TimePosted, WorkplaceType,
};
use crate::models::RunConfig;

/// 固定的来源标记
pub const ORIGIN_MARKER: &str = "JOB_SEARCH_PAGE_JOB_FILTER";

/// 编码后的搜索查询（参数保持插入顺序）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    params: Vec<(&'static str, String)>,
}

impl SearchQuery {
    /// 查询某个参数的原始值（未做 URL 编码）
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(|(key, _)| *key)
    }

    /// 渲染为查询串；逗号分隔的编码列表里逗号保持原样
    pub fn to_query_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| {
                let encoded = value
                    .split(',')
                    .map(|part| urlencoding::encode(part).into_owned())
                    .collect::<Vec<_>>()
                    .join(",");
                format!("{}={}", key, encoded)
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// 拼接到搜索页 URL 后面
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}?{}", base_url, self.to_query_string())
    }
}

/// 组合关键词表达式，例如 `(A OR B) NOT (C NOT D)`
///
/// 包含词用 OR 连接。排除词之间有意用 NOT 连接而不是 OR，与站点上一直使用的搜索串保持一致。
/// 两组各自加括号，某一组为空时省略该组。
pub fn keyword_expression(include: &[String], exclude: &[String]) -> String {
    let include_group = include.join(" OR ");
    let exclude_group = exclude.join(" NOT ");
    match (include.is_empty(), exclude.is_empty()) {
        (false, false) => format!("({}) NOT ({})", include_group, exclude_group),
        (false, true) => format!("({})", include_group),
        (true, false) => format!("NOT ({})", exclude_group),
        (true, true) => String::new(),
    }
}

/// 为当前地点编码搜索查询
pub fn encode_query(config: &RunConfig, location: &str) -> Result<SearchQuery, ConfigError> {
    let filters = &config.filters;

    // 先解析全部过滤值，失败时不构造任何参数
    let sort = SortMode::parse(&config.sort_by)?;
    let experience = resolve_all(
        ExperienceLevel::CATEGORY,
        &filters.experience,
        ExperienceLevel::from_name,
    )?;
    let job_types = resolve_all(JobType::CATEGORY, &filters.job_type, JobType::from_name)?;
    let time_posted = resolve_all(
        TimePosted::CATEGORY,
        &filters.time_posted_range,
        TimePosted::from_name,
    )?;
    let workplaces = resolve_all(
        WorkplaceType::CATEGORY,
        &filters.workplace_type,
        WorkplaceType::from_name,
    )?;

    let mut params: Vec<(&'static str, String)> = vec![
        (
            "keywords",
            keyword_expression(&config.keywords, &config.keywords_to_avoid),
        ),
        ("origin", ORIGIN_MARKER.to_string()),
        ("refresh", "true".to_string()),
        ("sortBy", sort.code().to_string()),
    ];

    if filters.easy_apply {
        params.push(("f_AL", "true".to_string()));
    }
    push_codes(&mut params, "f_E", experience.iter().map(|e| e.code()));
    push_codes(&mut params, "f_JT", job_types.iter().map(|j| j.code()));
    push_codes(&mut params, "f_TPR", time_posted.iter().filter_map(|t| t.code()));
    push_codes(&mut params, "f_WT", workplaces.iter().map(|w| w.code()));
    if filters.less_than_10_applicants {
        params.push(("f_EA", "true".to_string()));
    }
    if let Some(geo_id) = geo_code(location) {
        params.push(("geoId", geo_id.to_string()));
    }

    Ok(SearchQuery { params })
}

/// 只有编码列表非空时才追加参数
fn push_codes<'a>(
    params: &mut Vec<(&'static str, String)>,
    name: &'static str,
    codes: impl Iterator<Item = &'a str>,
) {
    let joined = codes.collect::<Vec<_>>().join(",");
    if !joined.is_empty() {
        params.push((name, joined));
    }
}
