use log::warn;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 跨运行持久化的状态,目前只有累计指标一项
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedState {
    cumulative: f64,
}

/// 存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
}

/// 累计指标存储:会话开始读一次,会话结束写一次,重置时额外写一次
pub struct CumulativeStore {
    path: PathBuf,
    auto_create_dir: bool,
}

impl CumulativeStore {
    pub fn new(path: PathBuf, auto_create_dir: bool) -> Self {
        Self {
            path,
            auto_create_dir,
        }
    }

    /// 读取持久化的累计值;文件缺失视为首次运行返回 0.0,损坏时告警后回退
    pub fn load(&self) -> f64 {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return 0.0,
        };

        match toml::from_str::<PersistedState>(&content) {
            Ok(state) => state.cumulative,
            Err(e) => {
                warn!(
                    "State file {} is corrupt ({}), starting from 0.0",
                    self.path.display(),
                    e
                );
                0.0
            }
        }
    }

    /// 写入累计值
    pub fn save(&self, cumulative: f64) -> Result<(), StorageError> {
        if self.auto_create_dir {
            if let Some(parent) = self.path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(StorageError::IoError)?;
                }
            }
        }

        let content = toml::to_string_pretty(&PersistedState { cumulative })
            .map_err(StorageError::SerializeError)?;

        std::fs::write(&self.path, content).map_err(StorageError::IoError)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gauge_state_{}_{}.toml", tag, std::process::id()))
    }

    #[test]
    fn test_missing_file_defaults_to_zero() {
        let store = CumulativeStore::new(temp_state_path("missing"), false);
        assert_eq!(store.load(), 0.0);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let path = temp_state_path("round_trip");
        let store = CumulativeStore::new(path.clone(), true);
        store.save(12.34).unwrap();
        assert!((store.load() - 12.34).abs() < 1e-12);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_zero() {
        let path = temp_state_path("corrupt");
        std::fs::write(&path, "cumulative = \"not a number\"").unwrap();
        let store = CumulativeStore::new(path.clone(), false);
        assert_eq!(store.load(), 0.0);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_save_overwrites_previous_value() {
        let path = temp_state_path("overwrite");
        let store = CumulativeStore::new(path.clone(), true);
        store.save(1.0).unwrap();
        store.save(0.0).unwrap();
        assert_eq!(store.load(), 0.0);
        let _ = std::fs::remove_file(path);
    }
}
