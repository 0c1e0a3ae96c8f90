use super::*;
use tempfile::TempDir;

const SAMPLE: &str = concat!(
    "<?xml version=\"1.0\"?>\n",
    "<!-- 本地修改 -->\n",
    "<configuration>\n",
    "  <property><name>fs.defaultFS</name><value>hdfs://nn:9000</value></property>\n",
    "  <property>\n",
    "    <name>dfs.replication</name>\n",
    "    <value>3</value>\n",
    "  </property>\n",
    "</configuration>\n",
);

/// 在临时目录中创建测试用的XML文件，暂存文件也放在同一目录
fn create_test_file(content: &str) -> (TempDir, std::path::PathBuf, XmlPropertyStore) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("core-site.xml");
    std::fs::write(&path, content).unwrap();
    let store = XmlPropertyStore::with_scratch(ScratchConfig::in_dir(temp_dir.path()));
    (temp_dir, path, store)
}

#[test]
fn test_parse_properties() {
    let properties: Vec<Property> = parser::parse_properties(SAMPLE)
        .unwrap()
        .into_iter()
        .map(|p| p.property)
        .collect();

    assert_eq!(
        properties,
        vec![
            Property::new("fs.defaultFS", "hdfs://nn:9000"),
            Property::new("dfs.replication", "3"),
        ]
    );
}

#[test]
fn test_parse_skips_incomplete_properties() {
    let text = concat!(
        "<configuration>",
        "<property><name>only.name</name></property>",
        "<property><value>orphan</value></property>",
        "<property><name>empty</name><value/></property>",
        "<other><name>x</name><value>1</value></other>",
        "</configuration>",
    );

    let properties = parser::parse_properties(text).unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].property, Property::new("empty", ""));
    assert!(properties[0].value_at.empty);
}

#[test]
fn test_parse_unescapes_text() {
    let text = "<configuration><property><name>a</name><value>x &amp; y</value></property></configuration>";
    let properties = parser::parse_properties(text).unwrap();
    assert_eq!(properties[0].property.value, "x & y");
}

#[test]
fn test_parse_malformed_documents() {
    assert!(parser::parse_properties("").is_err());
    assert!(parser::parse_properties("<configuration>").is_err());
    assert!(parser::parse_properties("<configuration></config>").is_err());
    assert!(parser::parse_properties("<configuration/><configuration/>").is_err());
    assert!(parser::parse_properties("junk<configuration/>").is_err());
    assert!(parser::parse_properties("<configuration><property></configuration>").is_err());
}

#[test]
fn test_parse_records_value_position() {
    let text = "<configuration>\n  <property><name>x</name><value>1</value></property>\n</configuration>";
    let properties = parser::parse_properties(text).unwrap();

    let at = properties[0].value_at;
    assert!(!at.empty);
    assert_eq!(&text[at.offset..at.offset + 1], "1");
    assert_eq!(&text[..at.offset], "<configuration>\n  <property><name>x</name><value>");
}

#[test]
fn test_replace_value_at() {
    let line = "  <property><name>x</name><value>1</value></property>\n";
    let col = line.find("1</value>").unwrap();
    assert_eq!(
        rewrite::replace_value_at(line, col, false, "2").unwrap(),
        "  <property><name>x</name><value>2</value></property>\n"
    );

    // 同一行中只改动指定位置的值
    let line = "<value>a</value><name>x</name><value>b</value>\n";
    let col = line.rfind("b</value>").unwrap();
    assert_eq!(
        rewrite::replace_value_at(line, col, false, "c").unwrap(),
        "<value>a</value><name>x</name><value>c</value>\n"
    );

    let line = "    <value/>\n";
    assert_eq!(
        rewrite::replace_value_at(line, line.find('\n').unwrap(), true, "v").unwrap(),
        "    <value>v</value>\n"
    );

    let line = "    <value><b>1</b></value>\n";
    assert!(rewrite::replace_value_at(line, "    <value>".len(), false, "v").is_none());
    let line = "    <value>first\n";
    assert!(rewrite::replace_value_at(line, "    <value>".len(), false, "v").is_none());
}

#[test]
fn test_insert_before_close() {
    assert_eq!(
        rewrite::insert_before_close("</configuration>", "a", "1"),
        "  <property><name>a</name><value>1</value></property>\n</configuration>"
    );
    assert_eq!(
        rewrite::insert_before_close("<configuration></configuration>\n", "a", "1"),
        "<configuration>\n  <property><name>a</name><value>1</value></property>\n</configuration>\n"
    );
}

#[test]
fn test_create_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("hdfs-site.xml");

    let store = XmlPropertyStore::new();
    store.create(&path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<configuration>\n</configuration>");
    assert!(store.properties(&path).unwrap().is_empty());
}

#[test]
fn test_create_unwritable_path() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing-dir").join("core-site.xml");

    let err = XmlPropertyStore::new().create(&path).unwrap_err();
    assert!(matches!(err, ConfError::IoError(_)));
}

#[test]
fn test_read_one() {
    let (_dir, path, store) = create_test_file(SAMPLE);

    assert_eq!(store.read_one(&path, "dfs.replication").unwrap().as_deref(), Some("3"));
    assert_eq!(store.read_one(&path, "missing").unwrap(), None);
    assert_eq!(store.read_one_or(&path, "missing", "default").unwrap(), "default");
}

#[test]
fn test_read_one_malformed() {
    let (_dir, path, store) = create_test_file("<configuration><property>");

    let err = store.read_one(&path, "x").unwrap_err();
    assert!(matches!(err, ConfError::MalformedDocument { .. }));
}

#[test]
fn test_read_many_empty_names_skips_file() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.xml");

    let params = XmlPropertyStore::new().read_many(&missing, Some(&[][..])).unwrap();
    assert!(params.is_empty());
}

#[test]
fn test_read_many_all() {
    let (_dir, path, store) = create_test_file(SAMPLE);

    let params = store.read_many(&path, None).unwrap();
    let keys: Vec<&str> = params.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["fs.defaultFS", "dfs.replication"]);
}

#[test]
fn test_write_multiline_property() {
    let (_dir, path, store) = create_test_file(SAMPLE);

    assert!(store.write_one(&path, "dfs.replication", "1", WritePolicy::default()).unwrap());

    let expected = SAMPLE.replace("<value>3</value>", "<value>1</value>");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
}

#[test]
fn test_write_numeric_value() {
    let (_dir, path, store) = create_test_file(SAMPLE);

    assert!(store.write_value(&path, "dfs.replication", 2u32, WritePolicy::default()).unwrap());
    assert_eq!(store.read_one(&path, "dfs.replication").unwrap().as_deref(), Some("2"));
}

#[test]
fn test_write_split_name_tag() {
    let content = "<configuration>\n  <property><name>\n    x\n  </name><value>1</value></property>\n</configuration>\n";
    let (_dir, path, store) = create_test_file(content);

    // 名称的原文跨行也能定位，因为位置来自解析器
    let name = "\n    x\n  ";
    assert!(store.write_one(&path, name, "2", WritePolicy::default()).unwrap());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        content.replace("<value>1</value>", "<value>2</value>")
    );
}

#[test]
fn test_write_skips_property_without_value() {
    let content = concat!(
        "<configuration>\n",
        "<property><name>x</name><description>d</description></property>\n",
        "<property><name>y</name><value>5</value></property>\n",
        "<property><name>x</name><value>1</value></property>\n",
        "</configuration>\n",
    );
    let (_dir, path, store) = create_test_file(content);

    assert!(store.write_one(&path, "x", "2", WritePolicy::default()).unwrap());

    assert_eq!(store.read_one(&path, "y").unwrap().as_deref(), Some("5"));
    assert_eq!(store.read_one(&path, "x").unwrap().as_deref(), Some("2"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        content.replace("<value>1</value>", "<value>2</value>")
    );
}

#[test]
fn test_write_value_on_line_after_earlier_property() {
    let content = concat!(
        "<configuration>\n",
        "<property><name>a</name><value>1</value></property><property><name>x</name>\n",
        "<value>2</value></property>\n",
        "</configuration>\n",
    );
    let (_dir, path, store) = create_test_file(content);

    assert!(store.write_one(&path, "x", "9", WritePolicy::default()).unwrap());

    assert_eq!(store.read_one(&path, "a").unwrap().as_deref(), Some("1"));
    assert_eq!(store.read_one(&path, "x").unwrap().as_deref(), Some("9"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        content.replace("<value>2</value>", "<value>9</value>")
    );
}

#[test]
fn test_write_ignores_commented_property() {
    let content = concat!(
        "<configuration>\n",
        "<!-- <property><name>x</name><value>old</value></property> -->\n",
        "<property><name>x</name><value>1</value></property>\n",
        "</configuration>\n",
    );
    let (_dir, path, store) = create_test_file(content);

    assert!(store.write_one(&path, "x", "2", WritePolicy::default()).unwrap());

    assert_eq!(store.read_one(&path, "x").unwrap().as_deref(), Some("2"));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        content.replace("<value>1</value>", "<value>2</value>")
    );
}

#[test]
fn test_write_escaped_name() {
    let content = "<configuration>\n<property><name>a&amp;b</name><value>1</value></property>\n</configuration>\n";
    let (_dir, path, store) = create_test_file(content);

    assert!(store.write_one(&path, "a&b", "2", WritePolicy::default()).unwrap());
    assert_eq!(store.read_one(&path, "a&b").unwrap().as_deref(), Some("2"));
}

#[test]
fn test_write_value_spanning_lines() {
    let content = "<configuration>\n<property><name>x</name><value>first\nsecond</value></property>\n</configuration>\n";
    let (_dir, path, store) = create_test_file(content);

    let err = store.write_one(&path, "x", "2", WritePolicy::default()).unwrap_err();
    assert!(matches!(err, ConfError::UnrecognizedLayout { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_write_self_closing_value() {
    let content = "<configuration>\n  <property><name>x</name><value/></property>\n</configuration>\n";
    let (_dir, path, store) = create_test_file(content);

    assert!(store.write_one(&path, "x", "v", WritePolicy::default()).unwrap());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "<configuration>\n  <property><name>x</name><value>v</value></property>\n</configuration>\n"
    );
}

#[test]
fn test_write_empty_value() {
    let content = "<configuration>\n  <property><name>x</name><value></value></property>\n</configuration>\n";
    let (_dir, path, store) = create_test_file(content);

    assert_eq!(store.read_one(&path, "x").unwrap().as_deref(), Some(""));
    assert!(store.write_one(&path, "x", "filled", WritePolicy::upsert()).unwrap());
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "<configuration>\n  <property><name>x</name><value>filled</value></property>\n</configuration>\n"
    );
}

#[test]
fn test_create_without_closing_line() {
    let (_dir, path, store) = create_test_file("<configuration/>\n");

    let err = store.write_one(&path, "x", "1", WritePolicy::upsert()).unwrap_err();
    assert!(matches!(err, ConfError::UnrecognizedLayout { .. }));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "<configuration/>\n");
}

#[test]
fn test_write_leaves_no_scratch_files() {
    let (dir, path, store) = create_test_file(SAMPLE);

    store.write_one(&path, "fs.defaultFS", "hdfs://other:9000", WritePolicy::default()).unwrap();
    store.write_one(&path, "new.key", "v", WritePolicy::upsert()).unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}
