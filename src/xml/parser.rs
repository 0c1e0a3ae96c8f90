use quick_xml::events::Event;
use quick_xml::Reader;

use crate::property::Property;

/// 当前正在收集文本的子元素
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    Value,
    Other,
}

/// `<value>` 开始标签在文档中的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ValueAt {
    /// 开始标签结尾 `>` 之后的字节偏移
    pub(crate) offset: usize,
    /// 是否为自闭合的 `<value/>`
    pub(crate) empty: bool,
}

/// 解析出的配置项及其值在原文中的位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedProperty {
    pub(crate) property: Property,
    pub(crate) value_at: ValueAt,
}

#[derive(Debug, Default)]
struct PendingProperty {
    name: Option<String>,
    value: Option<(String, ValueAt)>,
}

impl PendingProperty {
    // 同名子元素只取第一个
    fn set(&mut self, field: Field, text: String, at: ValueAt) {
        match field {
            Field::Name if self.name.is_none() => self.name = Some(text),
            Field::Value if self.value.is_none() => self.value = Some((text, at)),
            _ => {}
        }
    }

    fn finish(self) -> Option<ParsedProperty> {
        let (value, value_at) = self.value?;
        Some(ParsedProperty {
            property: Property {
                name: self.name?,
                value,
            },
            value_at,
        })
    }
}

/// 解析 `<configuration>` 文档中根元素下的所有 `<property>`
///
/// 只收集同时具有 `<name>` 和 `<value>` 子元素的配置项，按文档顺序返回。
/// 文本不做 trim，`<value></value>` 与 `<value/>` 都视为空字符串。
/// 注释中的 `<property>` 不会被收集。
///
/// # 返回
/// 文档格式错误时返回错误描述
pub(crate) fn parse_properties(text: &str) -> Result<Vec<ParsedProperty>, String> {
    let mut reader = Reader::from_str(text);

    let mut properties = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut pending: Option<PendingProperty> = None;
    let mut field: Option<(Field, String, usize)> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(format!("位置 {}: {}", reader.buffer_position(), e)),
        };
        // 刚读完的标签结尾之后的位置
        let position = reader.buffer_position() as usize;

        match event {
            Event::Start(e) => {
                if depth == 0 {
                    enter_root(&mut seen_root)?;
                } else if depth == 1 && e.name().as_ref() == b"property" {
                    pending = Some(PendingProperty::default());
                } else if depth == 2 && pending.is_some() {
                    field = Some((field_kind(e.name().as_ref()), String::new(), position));
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 0 {
                    enter_root(&mut seen_root)?;
                } else if depth == 2 {
                    if let Some(p) = pending.as_mut() {
                        let at = ValueAt {
                            offset: position,
                            empty: true,
                        };
                        p.set(field_kind(e.name().as_ref()), String::new(), at);
                    }
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or("多余的结束标签")?;
                if depth == 2 {
                    if let (Some((kind, text, offset)), Some(p)) = (field.take(), pending.as_mut()) {
                        let at = ValueAt {
                            offset,
                            empty: false,
                        };
                        p.set(kind, text, at);
                    }
                } else if depth == 1 {
                    if let Some(property) = pending.take().and_then(PendingProperty::finish) {
                        properties.push(property);
                    }
                }
            }
            Event::Text(t) => {
                if let Some((_, buf, _)) = field.as_mut() {
                    let text = t.unescape().map_err(|e| e.to_string())?;
                    buf.push_str(&text);
                } else if depth == 0 && !t.iter().all(u8::is_ascii_whitespace) {
                    return Err("根元素之外存在文本".to_string());
                }
            }
            Event::CData(c) => {
                if let Some((_, buf, _)) = field.as_mut() {
                    buf.push_str(&String::from_utf8_lossy(&c));
                } else if depth == 0 {
                    return Err("根元素之外存在CDATA".to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err("未找到根元素".to_string());
    }
    if depth != 0 {
        return Err(format!("文档结束时仍有 {} 个元素未闭合", depth));
    }

    Ok(properties)
}

fn enter_root(seen_root: &mut bool) -> Result<(), String> {
    if *seen_root {
        return Err("存在多个根元素".to_string());
    }
    *seen_root = true;
    Ok(())
}

fn field_kind(tag: &[u8]) -> Field {
    match tag {
        b"name" => Field::Name,
        b"value" => Field::Value,
        _ => Field::Other,
    }
}
