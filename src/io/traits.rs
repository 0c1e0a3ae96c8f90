//! IO 抽象层 - trait 定义
//!
//! XML 与纯文本两种存储共享同一套接口，调用方可以按文件格式选择实现。

use std::fmt::Display;
use std::path::Path;

use indexmap::IndexMap;

use crate::property::WritePolicy;
use crate::utils::Result;

/// 配置读取 trait
///
/// # 职责
/// - 按名称查询单个配置项
/// - 批量查询配置项
/// - 每次调用都重新读取文件，不缓存任何状态
pub trait PropertyReader {
    /// 查询单个配置项
    ///
    /// # 参数
    /// * `path` - 配置文件路径（必须存在）
    /// * `name` - 配置项名称
    ///
    /// # 返回
    /// 找到时返回第一个匹配项的值，否则返回 None
    fn read_one(&self, path: &Path, name: &str) -> Result<Option<String>>;

    /// 查询单个配置项，不存在时返回默认值
    fn read_one_or(&self, path: &Path, name: &str, default: &str) -> Result<String> {
        Ok(self
            .read_one(path, name)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 批量查询配置项
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    /// * `names` - 要查询的名称；None 表示全部
    ///
    /// # 返回
    /// 名称 -> 值 的映射，重复的键以最后一次出现为准；未找到的名称不出现在结果中
    fn read_many(&self, path: &Path, names: Option<&[&str]>) -> Result<IndexMap<String, String>>;
}

/// 配置写入 trait
///
/// # 职责
/// - 初始化空配置文件
/// - 按写入策略新建或替换单个配置项，保留文件其余内容
pub trait PropertyWriter {
    /// 创建（或覆盖为）空配置文件
    fn initialize(&self, path: &Path) -> Result<()>;

    /// 写入单个配置项
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    /// * `name` - 配置项名称
    /// * `value` - 新值（原样写入，不做转义）
    /// * `policy` - 写入策略
    ///
    /// # 返回
    /// 文件被修改时返回 Ok(true)；策略不允许修改时返回 Ok(false)，文件保持不变
    fn write_one(&self, path: &Path, name: &str, value: &str, policy: WritePolicy) -> Result<bool>;

    /// 写入任意可显示的值（数字等会先转为字符串）
    fn write_value<V: Display>(
        &self,
        path: &Path,
        name: &str,
        value: V,
        policy: WritePolicy,
    ) -> Result<bool>
    where
        Self: Sized,
    {
        self.write_one(path, name, &value.to_string(), policy)
    }
}

/// 完整的配置存储接口
pub trait PropertyStore: PropertyReader + PropertyWriter {}

impl<T: PropertyReader + PropertyWriter> PropertyStore for T {}
