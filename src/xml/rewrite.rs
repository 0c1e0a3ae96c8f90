use super::ROOT_CLOSE;

const VALUE_OPEN: &str = "<value>";
const VALUE_CLOSE: &str = "</value>";

/// 替换一行中某个 `<value>` 元素的文本，其余字节保持不变
///
/// # 参数
/// * `line` - `<value>` 开始标签结尾所在的行
/// * `col` - 开始标签结尾 `>` 之后的列（字节）
/// * `empty` - 是否为自闭合的 `<value/>`，此时整个标签被替换为 `<value>VALUE</value>`
///
/// # 返回
/// 值中含有 `<` 或 `</value>` 不在同一行时返回 None
pub(crate) fn replace_value_at(line: &str, col: usize, empty: bool, value: &str) -> Option<String> {
    let head = line.get(..col)?;
    let tail = &line[col..];

    if empty {
        let start = head.rfind("<value")?;
        return Some(format!("{}{}{}{}{}", &head[..start], VALUE_OPEN, value, VALUE_CLOSE, tail));
    }

    let end = tail.find('<')?;
    if !tail[end..].starts_with(VALUE_CLOSE) {
        return None;
    }
    Some(format!("{}{}{}", head, value, &tail[end..]))
}

/// 新配置项所在的整行
pub(crate) fn property_line(name: &str, value: &str, eol: &str) -> String {
    format!(
        "  <property><name>{}</name><value>{}</value></property>{}",
        name, value, eol
    )
}

/// 在含有 `</configuration>` 的行之前插入新配置项
///
/// 结束标签前面还有其他内容时（如单行的 `<configuration></configuration>`），
/// 在结束标签处拆行，使新配置项单独占一行。
pub(crate) fn insert_before_close(line: &str, name: &str, value: &str) -> String {
    let eol = line_ending(line);

    match line.find(ROOT_CLOSE) {
        Some(pos) if !line[..pos].trim().is_empty() => format!(
            "{}{}{}{}",
            &line[..pos],
            eol,
            property_line(name, value, eol),
            &line[pos..]
        ),
        _ => format!("{}{}", property_line(name, value, eol), line),
    }
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}
