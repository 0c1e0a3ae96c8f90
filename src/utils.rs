use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 自定义错误类型
#[derive(Error, Debug)]
pub enum ConfError {
    #[error("配置文件不存在: {path:?}")]
    NotFound { path: PathBuf },

    #[error("XML文档格式错误 {path:?}: {reason}")]
    MalformedDocument { path: PathBuf, reason: String },

    /// 逐行改写时找不到需要修改的行（例如标签被拆到多行）
    #[error("无法识别的文件布局 {path:?}: {detail}")]
    UnrecognizedLayout { path: PathBuf, detail: String },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ConfError>;

impl ConfError {
    pub(crate) fn layout(path: &Path, detail: impl Into<String>) -> Self {
        ConfError::UnrecognizedLayout {
            path: path.to_path_buf(),
            detail: detail.into(),
        }
    }

    pub(crate) fn malformed(path: &Path, reason: impl ToString) -> Self {
        ConfError::MalformedDocument {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// 是否为"文件不存在"错误
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfError::NotFound { .. })
    }
}

/// 打开已存在的文件，把 NotFound 映射为 [`ConfError::NotFound`]
pub(crate) fn open_existing(path: &Path) -> Result<std::fs::File> {
    std::fs::File::open(path).map_err(|e| not_found_or_io(path, e))
}

/// 读取整个文件为字符串
pub(crate) fn read_existing(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| not_found_or_io(path, e))
}

fn not_found_or_io(path: &Path, err: io::Error) -> ConfError {
    if err.kind() == io::ErrorKind::NotFound {
        ConfError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        ConfError::IoError(err)
    }
}
