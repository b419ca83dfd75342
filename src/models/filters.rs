//! 过滤条件枚举
//!
//! 每个过滤类别是一个封闭枚举，外加一个按名称查找的函数，
//! 查不到即为配置错误。

use crate::error::ConfigError;

/// 经验要求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperienceLevel {
    Internship,
    EntryLevel,
    Associate,
    MidSenior,
    Director,
    Executive,
}

impl ExperienceLevel {
    pub const CATEGORY: &'static str = "experience";

    /// 外部编码
    pub fn code(self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "1",
            ExperienceLevel::EntryLevel => "2",
            ExperienceLevel::Associate => "3",
            ExperienceLevel::MidSenior => "4",
            ExperienceLevel::Director => "5",
            ExperienceLevel::Executive => "6",
        }
    }

    /// 从配置中的名称解析
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Internship" => Some(ExperienceLevel::Internship),
            "Entry level" => Some(ExperienceLevel::EntryLevel),
            "Associate" => Some(ExperienceLevel::Associate),
            "Mid-Senior level" => Some(ExperienceLevel::MidSenior),
            "Director" => Some(ExperienceLevel::Director),
            "Executive" => Some(ExperienceLevel::Executive),
            _ => None,
        }
    }
}

/// 工作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
}

impl JobType {
    pub const CATEGORY: &'static str = "jobType";

    pub fn code(self) -> &'static str {
        match self {
            JobType::FullTime => "F",
            JobType::PartTime => "P",
            JobType::Contract => "C",
            JobType::Internship => "I",
            JobType::Temporary => "T",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Full-time" => Some(JobType::FullTime),
            "Part-time" => Some(JobType::PartTime),
            "Contract" => Some(JobType::Contract),
            "Internship" => Some(JobType::Internship),
            "Temporary" => Some(JobType::Temporary),
            _ => None,
        }
    }
}

/// 发布时间范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePosted {
    AnyTime,
    PastMonth,
    PastWeek,
    Past24Hours,
}

impl TimePosted {
    pub const CATEGORY: &'static str = "timePostedRange";

    /// "Any Time" 没有编码，不会出现在查询串中
    pub fn code(self) -> Option<&'static str> {
        match self {
            TimePosted::AnyTime => None,
            TimePosted::PastMonth => Some("r2592000"),
            TimePosted::PastWeek => Some("r604800"),
            TimePosted::Past24Hours => Some("r86400"),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Any Time" => Some(TimePosted::AnyTime),
            "Last Month" => Some(TimePosted::PastMonth),
            "Past Week" => Some(TimePosted::PastWeek),
            "Past 24 hours" => Some(TimePosted::Past24Hours),
            _ => None,
        }
    }
}

/// 办公方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkplaceType {
    OnSite,
    Remote,
    Hybrid,
}

impl WorkplaceType {
    pub const CATEGORY: &'static str = "workplaceType";

    pub fn code(self) -> &'static str {
        match self {
            WorkplaceType::OnSite => "1",
            WorkplaceType::Remote => "2",
            WorkplaceType::Hybrid => "3",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "On-site" => Some(WorkplaceType::OnSite),
            "Remote" => Some(WorkplaceType::Remote),
            "Hybrid" => Some(WorkplaceType::Hybrid),
            _ => None,
        }
    }
}

/// 排序方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortMode {
    Relevance,
    MostRecent,
}

impl SortMode {
    pub fn code(self) -> &'static str {
        match self {
            SortMode::Relevance => "R",
            SortMode::MostRecent => "DD",
        }
    }

    /// 配置里既可以写编码，也可以写名称
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "R" | "Relevance" | "Most relevant" => Ok(SortMode::Relevance),
            "DD" | "Most recent" => Ok(SortMode::MostRecent),
            other => Err(ConfigError::UnknownSortMode(other.to_string())),
        }
    }
}

/// 地点 → geoId
static GEO_CODES: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "Canada" => "101174742",
    "Portugal" => "100364837",
    "Switzerland" => "106693272",
    "United States" => "103644278",
    "Belgium" => "100565514",
    "Netherlands" => "102890719",
    "DACH" => "91000006",
    "Benelux" => "91000005",
    "European Union" => "91000000",
    "European Economic Area" => "91000002",
    "Germany" => "101282230",
    "Spain" => "105646813",
    "United Kingdom" => "101165590",
};

/// 查询地点的 geoId，未收录的地点返回 None
pub fn geo_code(location: &str) -> Option<&'static str> {
    GEO_CODES.get(location).copied()
}

/// 按类别解析一组名称，任意一个查不到就整体失败
pub fn resolve_all<T>(
    category: &'static str,
    names: &[String],
    lookup: impl Fn(&str) -> Option<T>,
) -> Result<Vec<T>, ConfigError> {
    names
        .iter()
        .map(|name| {
            lookup(name).ok_or_else(|| ConfigError::UnknownFilterValue {
                category,
                value: name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_tables() {
        assert_eq!(ExperienceLevel::from_name("Mid-Senior level").map(|e| e.code()), Some("4"));
        assert_eq!(JobType::from_name("Contract").map(|j| j.code()), Some("C"));
        assert_eq!(WorkplaceType::from_name("On-site").map(|w| w.code()), Some("1"));
        assert_eq!(TimePosted::from_name("Past Week").and_then(|t| t.code()), Some("r604800"));
        assert_eq!(TimePosted::from_name("Any Time").and_then(|t| t.code()), None);
        assert!(ExperienceLevel::from_name("entry level").is_none());
    }

    #[test]
    fn test_geo_code() {
        assert_eq!(geo_code("Switzerland"), Some("106693272"));
        assert_eq!(geo_code("Belgium"), Some("100565514"));
        assert_eq!(geo_code("Atlantis"), None);
    }

    #[test]
    fn test_sort_mode() {
        assert_eq!(SortMode::parse("R").unwrap(), SortMode::Relevance);
        assert_eq!(SortMode::parse("Most recent").unwrap().code(), "DD");
        assert!(SortMode::parse("random").is_err());
    }

    #[test]
    fn test_resolve_all_reports_first_unknown() {
        let names = vec!["Remote".to_string(), "Moon".to_string(), "Mars".to_string()];
        let err = resolve_all(WorkplaceType::CATEGORY, &names, WorkplaceType::from_name).unwrap_err();
        match err {
            ConfigError::UnknownFilterValue { category, value } => {
                assert_eq!(category, "workplaceType");
                assert_eq!(value, "Moon");
            }
            other => panic!("意外的错误: {other}"),
        }
    }
}
