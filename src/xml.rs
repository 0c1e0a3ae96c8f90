//! XML 配置存储
//!
//! 读写 Hadoop 风格的 `<configuration>` 属性文件：
//!
//! ```xml
//! <configuration>
//!   <property><name>fs.defaultFS</name><value>hdfs://nn:9000</value></property>
//! </configuration>
//! ```
//!
//! 查询通过 XML 解析完成；修改则直接在原始文本上逐行进行，
//! 只改动目标值所在的行，注释、缩进和其余配置项保持逐字节不变。
mod parser;
mod rewrite;

#[cfg(test)]
mod tests;

use std::fs;
use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;

use crate::io::{rewrite_file, PropertyReader, PropertyWriter, ScratchConfig};
use crate::property::{Property, WritePolicy};
use crate::utils::{read_existing, ConfError, Result};
use parser::{ParsedProperty, ValueAt};

/// 根元素开始标签
pub const ROOT_OPEN: &str = "<configuration>";
/// 根元素结束标签
pub const ROOT_CLOSE: &str = "</configuration>";

/// XML 属性文件存储
#[derive(Debug, Clone, Default)]
pub struct XmlPropertyStore {
    scratch: ScratchConfig,
}

impl XmlPropertyStore {
    /// 使用默认暂存配置创建
    pub fn new() -> Self {
        Self::default()
    }

    /// 使用指定的暂存配置创建
    pub fn with_scratch(scratch: ScratchConfig) -> Self {
        Self { scratch }
    }

    /// 写入只包含根元素的最小文档（已存在时覆盖）
    pub fn create(&self, path: &Path) -> Result<()> {
        fs::write(path, format!("{}\n{}", ROOT_OPEN, ROOT_CLOSE))?;
        tracing::debug!(path = ?path, "已创建XML配置文件");
        Ok(())
    }

    /// 按文档顺序读取所有配置项
    pub fn properties(&self, path: &Path) -> Result<Vec<Property>> {
        Ok(self.parse(path)?.into_iter().map(|p| p.property).collect())
    }

    fn parse(&self, path: &Path) -> Result<Vec<ParsedProperty>> {
        let text = read_existing(path)?;
        parser::parse_properties(&text).map_err(|reason| ConfError::malformed(path, reason))
    }

    /// 第一个名称匹配的配置项
    fn locate(&self, path: &Path, name: &str) -> Result<Option<ParsedProperty>> {
        Ok(self.parse(path)?.into_iter().find(|p| p.property.name == name))
    }

    /// 替换解析时定位到的那个 `<value>` 元素的文本
    ///
    /// 值的原文必须在一行之内；其余行逐字节复制。
    fn replace_existing(&self, path: &Path, at: ValueAt, value: &str) -> Result<()> {
        rewrite_file(path, &self.scratch, |cursor, out| {
            let mut line_start = 0usize;
            loop {
                let line = cursor
                    .next_line()?
                    .ok_or_else(|| ConfError::layout(path, "文件在 <value> 之前结束"))?;
                let line_end = line_start + line.len();

                if at.offset <= line_end {
                    let col = at.offset - line_start;
                    let replaced =
                        rewrite::replace_value_at(&line, col, at.empty, value).ok_or_else(|| {
                            ConfError::layout(path, format!("第 {} 行的 <value> 跨行", cursor.line_no()))
                        })?;
                    out.write_all(replaced.as_bytes())?;
                    return Ok(());
                }

                out.write_all(line.as_bytes())?;
                line_start = line_end;
            }
        })
    }

    /// 在 `</configuration>` 之前插入新配置项
    fn insert_new(&self, path: &Path, name: &str, value: &str) -> Result<()> {
        rewrite_file(path, &self.scratch, |cursor, out| loop {
            let line = cursor
                .next_line()?
                .ok_or_else(|| ConfError::layout(path, format!("未找到 {}", ROOT_CLOSE)))?;
            if line.contains(ROOT_CLOSE) {
                out.write_all(rewrite::insert_before_close(&line, name, value).as_bytes())?;
                return Ok(());
            }
            out.write_all(line.as_bytes())?;
        })
    }
}

impl PropertyReader for XmlPropertyStore {
    /// 返回第一个名称匹配的配置项的值
    fn read_one(&self, path: &Path, name: &str) -> Result<Option<String>> {
        let value = self.locate(path, name)?.map(|p| p.property.value);
        tracing::trace!(path = ?path, name, found = value.is_some(), "读取XML配置项");
        Ok(value)
    }

    /// 重复的名称取最后一个匹配项；请求列表为空时不读取文件
    fn read_many(&self, path: &Path, names: Option<&[&str]>) -> Result<IndexMap<String, String>> {
        if names.is_some_and(|n| n.is_empty()) {
            return Ok(IndexMap::new());
        }

        let properties = self.properties(path)?;
        let mut params = IndexMap::new();

        match names {
            Some(names) => {
                for &name in names {
                    if let Some(p) = properties.iter().rev().find(|p| p.name == name) {
                        params.insert(p.name.clone(), p.value.clone());
                    }
                }
            }
            None => {
                for p in properties {
                    params.insert(p.name, p.value);
                }
            }
        }

        Ok(params)
    }
}

impl PropertyWriter for XmlPropertyStore {
    fn initialize(&self, path: &Path) -> Result<()> {
        self.create(path)
    }

    fn write_one(&self, path: &Path, name: &str, value: &str, policy: WritePolicy) -> Result<bool> {
        match self.locate(path, name)? {
            Some(found) if policy.replace_if_present => {
                self.replace_existing(path, found.value_at, value)?;
                tracing::debug!(path = ?path, name, "已替换XML配置项");
                Ok(true)
            }
            None if policy.create_if_absent => {
                self.insert_new(path, name, value)?;
                tracing::debug!(path = ?path, name, "已新增XML配置项");
                Ok(true)
            }
            current => {
                tracing::debug!(path = ?path, name, present = current.is_some(), "写入策略不允许修改");
                Ok(false)
            }
        }
    }
}
