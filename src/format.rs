use std::path::Path;

use crate::io::{PropertyStore, ScratchConfig};
use crate::props::FlatPropertyStore;
use crate::xml::XmlPropertyStore;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFormat {
    /// `<configuration>` 属性文件（core-site.xml 等）
    Xml,
    /// 每行 `key value` 的纯文本文件（spark-defaults.conf 等）
    Properties,
}

impl ConfigFormat {
    /// 从文件扩展名获取格式，`.xml` 以外一律按纯文本处理
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xml") => ConfigFormat::Xml,
            _ => ConfigFormat::Properties,
        }
    }

    /// 格式名称
    pub fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Xml => "xml",
            ConfigFormat::Properties => "props",
        }
    }

    /// 创建对应格式的存储
    pub fn store(&self, scratch: ScratchConfig) -> Box<dyn PropertyStore> {
        match self {
            ConfigFormat::Xml => Box::new(XmlPropertyStore::with_scratch(scratch)),
            ConfigFormat::Properties => Box::new(FlatPropertyStore::with_scratch(scratch)),
        }
    }
}
