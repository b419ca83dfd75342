//! 地点游标
//!
//! 按配置顺序遍历地点。下标只增不减，不回绕；
//! 等于地点数时地点循环结束。

/// 地点游标
#[derive(Debug, Clone)]
pub struct LocationCursor {
    locations: Vec<String>,
    index: usize,
}

impl LocationCursor {
    pub fn new(locations: Vec<String>) -> Self {
        Self {
            locations,
            index: 0,
        }
    }

    /// 当前地点，已遍历完时为 None
    pub fn current(&self) -> Option<&str> {
        self.locations.get(self.index).map(String::as_str)
    }

    /// 前进一个地点；已到末尾时保持不变
    pub fn advance(&mut self) {
        if self.index < self.locations.len() {
            self.index += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.locations.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_advances_to_end_and_stops() {
        let mut cursor = LocationCursor::new(vec!["Switzerland".into(), "Belgium".into()]);
        assert_eq!(cursor.current(), Some("Switzerland"));

        cursor.advance();
        assert_eq!(cursor.index(), 1);
        assert_eq!(cursor.current(), Some("Belgium"));

        cursor.advance();
        assert_eq!(cursor.index(), 2);
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.current(), None);

        cursor.advance();
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn test_empty_cursor_is_exhausted() {
        let cursor = LocationCursor::new(Vec::new());
        assert!(cursor.is_empty());
        assert!(cursor.is_exhausted());
    }
}
