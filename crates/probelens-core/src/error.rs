//! 错误类型
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    #[error("failed to read options file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options: {0}")]
    ParseOptions(#[from] toml::de::Error),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// 结束次数多于开始次数：调用方的 start/finish 未配对
    #[error("scan finished reported while no scan is running")]
    UnbalancedScanFinished,
}
