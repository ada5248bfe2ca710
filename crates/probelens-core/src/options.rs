//! 收集器选项（TOML 加载）
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::error::CollectorError;

/// 默认去抖窗口
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(10);

/// 收集器选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorOptions {
    /// 扫描计数归零后，延迟多久再宣布“全部扫描结束”
    pub debounce: Duration,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self { debounce: DEFAULT_DEBOUNCE }
    }
}

/// 文件中的原始结构（缺省字段回落到默认值）
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsFile {
    #[serde(default)]
    debounce_ms: Option<u64>,
}

impl CollectorOptions {
    /// 从 TOML 文本解析
    pub fn from_toml_str(txt: &str) -> Result<Self, CollectorError> {
        let parsed: OptionsFile = toml::from_str(txt)?;
        let mut opts = Self::default();
        if let Some(ms) = parsed.debounce_ms {
            if ms == 0 {
                return Err(CollectorError::InvalidOptions("debounce_ms must be greater than 0".into()));
            }
            opts.debounce = Duration::from_millis(ms);
        }
        Ok(opts)
    }

    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> Result<Self, CollectorError> {
        let txt = std::fs::read_to_string(path)
            .map_err(|source| CollectorError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&txt)
    }
}
