//! 文档存储 - 业务能力层
//!
//! 账本、错误历史和求职配置都是"整体读、整体写"的键值文档，
//! 这里提供统一的存储接口和两个实现：文件和内存。

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::error::PersistenceError;

/// 文档存储
pub trait DocumentStore<T> {
    /// 读取文档，不存在时返回 None
    fn load(&self) -> Result<Option<T>, PersistenceError>;

    /// 整体写入文档
    fn save(&self, doc: &T) -> Result<(), PersistenceError>;
}

/// 文件格式，按扩展名选择
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Json,
        }
    }
}

/// 文件存储：每次保存都完整重写文件
#[derive(Debug, Clone)]
pub struct FileStore<T> {
    path: PathBuf,
    format: FileFormat,
    _doc: PhantomData<fn() -> T>,
}

impl<T> FileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = FileFormat::from_path(&path);
        Self {
            path,
            format,
            _doc: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

impl<T: Serialize + DeserializeOwned> DocumentStore<T> for FileStore<T> {
    fn load(&self) -> Result<Option<T>, PersistenceError> {
        if !self.path.exists() {
            debug!("文件不存在，使用空文档: {}", self.display_path());
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|source| PersistenceError::ReadFailed {
                path: self.display_path(),
                source,
            })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let doc = match self.format {
            FileFormat::Json => serde_json::from_str(&content).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::from_str(&content).map_err(|e| e.to_string()),
        }
        .map_err(|message| PersistenceError::ParseFailed {
            path: self.display_path(),
            message,
        })?;

        Ok(Some(doc))
    }

    fn save(&self, doc: &T) -> Result<(), PersistenceError> {
        let content = match self.format {
            FileFormat::Json => serde_json::to_string_pretty(doc).map_err(|e| e.to_string()),
            FileFormat::Toml => toml::to_string_pretty(doc).map_err(|e| e.to_string()),
        }
        .map_err(|message| PersistenceError::SerializeFailed {
            path: self.display_path(),
            message,
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::WriteFailed {
                path: self.display_path(),
                source,
            })?;
        }

        std::fs::write(&self.path, content).map_err(|source| PersistenceError::WriteFailed {
            path: self.display_path(),
            source,
        })?;

        debug!("已写入: {}", self.display_path());
        Ok(())
    }
}

/// 内存存储：测试用，记录保存次数；克隆后共享同一份数据
#[derive(Debug)]
pub struct MemoryStore<T> {
    inner: Arc<Mutex<MemoryInner<T>>>,
}

#[derive(Debug)]
struct MemoryInner<T> {
    doc: Option<T>,
    saves: usize,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner { doc: None, saves: 0 })),
        }
    }

    pub fn with_doc(doc: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                doc: Some(doc),
                saves: 0,
            })),
        }
    }

    /// 已保存的次数
    pub fn saves(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner<T>> {
        // 锁中毒只可能来自测试线程 panic，数据本身仍然可用
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> MemoryStore<T> {
    /// 最近一次保存的文档
    pub fn snapshot(&self) -> Option<T> {
        self.lock().doc.clone()
    }
}

impl<T: Clone> DocumentStore<T> for MemoryStore<T> {
    fn load(&self) -> Result<Option<T>, PersistenceError> {
        Ok(self.lock().doc.clone())
    }

    fn save(&self, doc: &T) -> Result<(), PersistenceError> {
        let mut inner = self.lock();
        inner.doc = Some(doc.clone());
        inner.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FileFormat::from_path(Path::new("config.toml")), FileFormat::Toml);
        assert_eq!(FileFormat::from_path(Path::new("config.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("ledger")), FileFormat::Json);
    }

    #[test]
    fn test_file_store_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileStore<BTreeMap<String, String>> =
            FileStore::new(dir.path().join("nested").join("applied.json"));

        assert!(store.load().unwrap().is_none());

        let mut doc = BTreeMap::new();
        doc.insert("Acme".to_string(), "2024-05-01T10:00:00Z".to_string());
        store.save(&doc).unwrap();

        assert_eq!(store.load().unwrap(), Some(doc));
    }

    #[test]
    fn test_file_store_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store: FileStore<BTreeMap<String, String>> = FileStore::new(&path);
        assert!(matches!(store.load(), Err(PersistenceError::ParseFailed { .. })));
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store: MemoryStore<Vec<u8>> = MemoryStore::new();
        let shared = store.clone();
        store.save(&vec![1]).unwrap();
        store.save(&vec![1, 2]).unwrap();
        assert_eq!(shared.saves(), 2);
        assert_eq!(shared.snapshot(), Some(vec![1, 2]));
    }
}
