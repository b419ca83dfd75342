use serde::{Deserialize, Serialize};
use std::fmt;

/// 缓存的表单答案
///
/// 文本、下拉值、单选项和文件路径都存成字符串，复选框存成布尔值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Flag(bool),
    Text(String),
}

impl Answer {
    /// 复选框答案，兼容手工写入配置的 "yes"/"no"
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Answer::Flag(flag) => Some(*flag),
            Answer::Text(text) => match text.trim().to_lowercase().as_str() {
                "yes" | "true" => Some(true),
                "no" | "false" => Some(false),
                _ => None,
            },
        }
    }
}

impl From<bool> for Answer {
    fn from(flag: bool) -> Self {
        Answer::Flag(flag)
    }
}

impl From<String> for Answer {
    fn from(text: String) -> Self {
        Answer::Text(text)
    }
}

impl From<&str> for Answer {
    fn from(text: &str) -> Self {
        Answer::Text(text.to_string())
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Flag(flag) => write!(f, "{}", if *flag { "yes" } else { "no" }),
            Answer::Text(text) => write!(f, "{}", text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_json_shape() {
        let flag: Answer = serde_json::from_str("true").unwrap();
        assert_eq!(flag, Answer::Flag(true));
        let text: Answer = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(text, Answer::Text("5".to_string()));
        assert_eq!(serde_json::to_string(&Answer::Flag(false)).unwrap(), "false");
    }

    #[test]
    fn test_flag_from_text() {
        assert_eq!(Answer::from("Yes").as_flag(), Some(true));
        assert_eq!(Answer::from("maybe").as_flag(), None);
        assert_eq!(Answer::from(true).as_flag(), Some(true));
    }
}
