//! 逐行改写工具
//!
//! 改写流程：逐行读取原文件写入暂存文件，只修改需要变更的行，其余内容原样复制；
//! 最后把暂存文件的内容复制回原路径并删除暂存文件。
//!
//! 这里采用"复制 + 删除"而不是 rename，暂存目录可以和目标文件位于不同的文件系统。

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::utils::{open_existing, Result};

/// 默认的暂存文件前缀
pub const DEFAULT_SCRATCH_PREFIX: &str = "xmlf-";

/// 暂存文件配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchConfig {
    /// 暂存目录；None 表示使用系统临时目录
    pub dir: Option<PathBuf>,
    /// 暂存文件名前缀
    pub prefix: String,
}

impl Default for ScratchConfig {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: DEFAULT_SCRATCH_PREFIX.to_string(),
        }
    }
}

impl ScratchConfig {
    /// 使用指定的暂存目录
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Self::default()
        }
    }

    /// 实际使用的暂存目录
    pub fn directory(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    fn create(&self) -> io::Result<NamedTempFile> {
        tempfile::Builder::new()
            .prefix(&self.prefix)
            .tempfile_in(self.directory())
    }
}

/// 按行读取，保留每行原始的换行符
#[derive(Debug)]
pub struct LineCursor<R> {
    reader: R,
    line_no: usize,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_no: 0 }
    }

    /// 读取下一行（包含行尾的 `\n` 或 `\r\n`）；到达文件末尾返回 None
    pub fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        Ok(Some(line))
    }

    /// 已读取的行数
    pub fn line_no(&self) -> usize {
        self.line_no
    }

    fn into_inner(self) -> R {
        self.reader
    }
}

/// 原文件上的行游标
pub type FileCursor = LineCursor<BufReader<File>>;

/// 逐行改写文件
///
/// `edit` 从游标读取行并写入输出，返回后游标中剩余的内容会原样复制到输出末尾。
/// `edit` 返回错误时不会触碰原文件，暂存文件随之删除。
///
/// # 参数
/// * `path` - 要改写的文件（必须存在）
/// * `scratch` - 暂存文件配置
/// * `edit` - 改写逻辑
pub fn rewrite_file<F>(path: &Path, scratch: &ScratchConfig, edit: F) -> Result<()>
where
    F: FnOnce(&mut FileCursor, &mut dyn Write) -> Result<()>,
{
    let mut cursor = LineCursor::new(BufReader::new(open_existing(path)?));
    let mut temp = scratch.create()?;
    tracing::trace!(scratch = ?temp.path(), target = ?path, "写入暂存文件");

    {
        let mut out = BufWriter::new(temp.as_file_mut());
        edit(&mut cursor, &mut out)?;
        io::copy(&mut cursor.into_inner(), &mut out)?;
        out.flush()?;
    }

    install(temp, path)
}

/// 把暂存文件内容复制到目标路径，然后删除暂存文件
///
/// 只复制内容，目标文件的权限保持不变。
fn install(temp: NamedTempFile, target: &Path) -> Result<()> {
    let mut source = temp.reopen()?;
    let mut dest = OpenOptions::new().write(true).truncate(true).open(target)?;
    io::copy(&mut source, &mut dest)?;
    dest.flush()?;
    drop(source);

    temp.close()?;
    Ok(())
}
