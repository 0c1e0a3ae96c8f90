pub mod format;
pub mod io;
pub mod property;
pub mod props;
pub mod utils;
pub mod xml;

// 重新导出主要结构
pub use format::ConfigFormat;
pub use io::{PropertyReader, PropertyStore, PropertyWriter, ScratchConfig};
pub use property::{Property, WritePolicy};
pub use props::FlatPropertyStore;
pub use utils::{ConfError, Result};
pub use xml::XmlPropertyStore;
