/// 配置项（两种格式共用）
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Property {
    /// 配置项名称
    pub name: String,
    /// 配置项的值（原样文本，不做转义处理）
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// 写入策略
///
/// 控制 `write_one` 在键不存在/已存在时的行为。
/// 默认值：不存在时不创建，存在时覆盖。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WritePolicy {
    /// 键不存在时是否新建
    pub create_if_absent: bool,
    /// 键已存在时是否覆盖（纯文本格式中称为 override）
    pub replace_if_present: bool,
}

impl Default for WritePolicy {
    fn default() -> Self {
        Self {
            create_if_absent: false,
            replace_if_present: true,
        }
    }
}

impl WritePolicy {
    /// 不存在则创建，存在则覆盖
    pub fn upsert() -> Self {
        Self {
            create_if_absent: true,
            replace_if_present: true,
        }
    }

    /// 设置是否允许新建
    pub fn create_if_absent(mut self, create: bool) -> Self {
        self.create_if_absent = create;
        self
    }

    /// 设置是否允许覆盖已有值
    pub fn replace_if_present(mut self, replace: bool) -> Self {
        self.replace_if_present = replace;
        self
    }
}
