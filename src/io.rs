//! IO 抽象层模块
//!
//! 该模块定义两种配置格式共用的读写接口，以及"逐行复制 + 暂存文件 + 覆盖原文件"的改写工具。
//!
//! # 架构设计
//!
//! - **traits**: 定义 PropertyReader/PropertyWriter trait 接口
//! - **replace**: 暂存文件配置与逐行改写实现
//!
//! # 使用示例
//!
//! ```rust,ignore
//! use confstore::io::{PropertyReader, PropertyWriter};
//! use confstore::{WritePolicy, XmlPropertyStore};
//!
//! let store = XmlPropertyStore::new();
//! store.write_one(Path::new("core-site.xml"), "fs.defaultFS", "hdfs://nn:9000", WritePolicy::upsert())?;
//! let value = store.read_one(Path::new("core-site.xml"), "fs.defaultFS")?;
//! ```
pub mod traits;
pub mod replace;

// === 导出 trait 定义 ===
pub use traits::{PropertyReader, PropertyStore, PropertyWriter};

// === 导出改写工具 ===
pub use replace::{rewrite_file, LineCursor, ScratchConfig};
