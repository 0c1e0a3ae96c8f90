/// 解析一行 `key<空白>value`
///
/// - 第一个字符为 `#` 的行是注释；缩进的 `#` 属于键名
/// - 第一段空白分隔键与值，值保留内部空白，去掉首尾空白
/// - 空行、只有键没有值的行视为无法解析
pub(crate) fn parse_line(line: &str) -> Option<(&str, &str)> {
    if line.starts_with('#') {
        return None;
    }
    let body = line.trim();
    if body.is_empty() {
        return None;
    }

    let (key, rest) = body.split_once(char::is_whitespace)?;
    Some((key, rest.trim_start()))
}

/// 写入时使用的记录行（键与值之间统一为一个制表符）
pub(crate) fn record_line(name: &str, value: &str) -> String {
    format!("{}\t{}\n", name, value)
}
