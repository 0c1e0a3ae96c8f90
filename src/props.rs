//! 纯文本配置存储
//!
//! 每行一条 `key<空白>value` 记录，`#` 开头的行是注释（如 spark-defaults.conf）。
mod line;


use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use indexmap::IndexMap;

use crate::io::{rewrite_file, PropertyReader, PropertyWriter, ScratchConfig};
use crate::property::{Property, WritePolicy};
use crate::utils::{open_existing, ConfError, Result};

/// 纯文本属性文件存储
#[derive(Debug, Clone, Default)]
pub struct FlatPropertyStore {
    scratch: ScratchConfig,
}

impl FlatPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scratch(scratch: ScratchConfig) -> Self {
        Self { scratch }
    }

    /// 创建（或清空为）空文件
    pub fn create(&self, path: &Path) -> Result<()> {
        fs::write(path, "")?;
        Ok(())
    }

    /// 按文件顺序读取所有可解析的记录
    pub fn properties(&self, path: &Path) -> Result<Vec<Property>> {
        let reader = BufReader::new(open_existing(path)?);
        let mut properties = Vec::new();

        for text in reader.lines() {
            if let Some((name, value)) = line::parse_line(&text?) {
                properties.push(Property::new(name, value));
            }
        }

        Ok(properties)
    }

    /// 把第一条键为 `name` 的记录改写为 `name\tvalue`
    fn replace_existing(&self, path: &Path, name: &str, value: &str) -> Result<()> {
        rewrite_file(path, &self.scratch, |cursor, out| loop {
            let text = cursor
                .next_line()?
                .ok_or_else(|| ConfError::layout(path, format!("未找到键 {}", name)))?;
            if matches!(line::parse_line(&text), Some((key, _)) if key == name) {
                out.write_all(line::record_line(name, value).as_bytes())?;
                return Ok(());
            }
            out.write_all(text.as_bytes())?;
        })
    }

    /// 在文件末尾追加一条记录，文件不存在时创建
    fn append(&self, path: &Path, name: &str, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;

        let mut record = String::new();
        if !ends_with_newline(&mut file)? {
            record.push('\n');
        }
        record.push_str(&line::record_line(name, value));

        file.write_all(record.as_bytes())?;
        Ok(())
    }
}

/// 空文件也视为以换行结尾
fn ends_with_newline(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

impl PropertyReader for FlatPropertyStore {
    /// 返回第一条键匹配的记录的值
    fn read_one(&self, path: &Path, name: &str) -> Result<Option<String>> {
        let reader = BufReader::new(open_existing(path)?);

        for text in reader.lines() {
            let text = text?;
            if let Some((key, value)) = line::parse_line(&text) {
                if key == name {
                    return Ok(Some(value.to_string()));
                }
            }
        }

        Ok(None)
    }

    /// 重复的键以最后一次出现为准，顺序为键第一次出现的位置
    fn read_many(&self, path: &Path, names: Option<&[&str]>) -> Result<IndexMap<String, String>> {
        let mut params = IndexMap::new();

        for p in self.properties(path)? {
            if names.map_or(true, |names| names.contains(&p.name.as_str())) {
                params.insert(p.name, p.value);
            }
        }

        Ok(params)
    }
}

impl PropertyWriter for FlatPropertyStore {
    fn initialize(&self, path: &Path) -> Result<()> {
        self.create(path)
    }

    fn write_one(&self, path: &Path, name: &str, value: &str, policy: WritePolicy) -> Result<bool> {
        let current = match self.read_one(path, name) {
            Err(e) if e.is_not_found() && policy.create_if_absent => None,
            other => other?,
        };

        match current {
            Some(_) if policy.replace_if_present => {
                self.replace_existing(path, name, value)?;
                tracing::debug!(path = ?path, name, "已替换配置项");
                Ok(true)
            }
            None if policy.create_if_absent => {
                self.append(path, name, value)?;
                tracing::debug!(path = ?path, name, "已追加配置项");
                Ok(true)
            }
            current => {
                tracing::debug!(path = ?path, name, present = current.is_some(), "写入策略不允许修改");
                Ok(false)
            }
        }
    }
}
