//! Gmail 过滤器 feed（Atom XML）序列化
//!
//! 输出格式固定：无 XML 声明、两空格缩进、空元素自闭合、属性按固定顺序输出。

use std::io::Write;
use chrono::{DateTime, Utc};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer as XmlWriter;
use tracing::debug;

use super::clock::{format_timestamp, Clock, SystemClock};
use crate::error::BrittaResult;
use crate::filter::{FilterEntry, FilterSet};

pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
pub const APPS_NS: &str = "http://schemas.google.com/apps/2006";
const TAG_PREFIX: &str = "tag:mail.google.com,2008";
const FEED_TITLE: &str = "Mail Filters";
const ENTRY_TITLE: &str = "Mail Filter";
const TRUE: &str = "true";

/// 过滤器集合序列化器
#[derive(Debug, Clone, Default)]
pub struct FeedSerializer<C: Clock = SystemClock> {
    clock: C,
}

impl FeedSerializer<SystemClock> {
    pub fn new() -> Self {
        Self { clock: SystemClock }
    }
}

impl<C: Clock> FeedSerializer<C> {
    /// 注入时间源
    pub fn with_clock(clock: C) -> Self {
        Self { clock }
    }

    /// 序列化为完整文档
    ///
    /// 时间只读取一次，feed 与所有 entry 共用同一个 <updated>。
    pub fn serialize(&self, set: &FilterSet) -> BrittaResult<Vec<u8>> {
        render_feed(set, &self.clock.now())
    }
}

/// 按给定时间渲染文档，同一输入、同一时间输出逐字节一致
pub fn render_feed(set: &FilterSet, updated: &DateTime<Utc>) -> BrittaResult<Vec<u8>> {
    let updated = format_timestamp(updated);
    let mut writer = FeedWriter::new(Vec::new());
    writer.write(set, &updated)?;

    let buf = writer.into_inner();
    debug!("feed 序列化完成，条目{}个，{}字节", set.len(), buf.len());
    Ok(buf)
}

/// 条目属性（名称, 值），按 feed 要求的固定顺序
pub fn entry_properties(entry: &FilterEntry) -> Vec<(&'static str, String)> {
    let mut props = Vec::new();

    if let Some(words) = entry.has_the_word() {
        props.push(("hasTheWord", words));
    }
    if let Some(words) = entry.does_not_have_word() {
        props.push(("doesNotHaveWord", words));
    }
    for label in &entry.labels {
        props.push(("label", label.clone()));
    }

    let flags = [
        ("shouldArchive", entry.archive),
        ("shouldMarkAsRead", entry.mark_read),
        ("shouldStar", entry.star),
        ("neverSpam", entry.never_spam),
    ];
    for (name, _) in flags.into_iter().filter(|(_, on)| *on) {
        props.push((name, TRUE.to_string()));
    }

    props
}

/// 转义文本/属性值
///
/// 除 `& < > ' "` 外，`\t \n \r` 写成字符引用，否则解析器会把属性里的
/// 空白规整成空格；XML 1.0 不允许的字符替换为 U+FFFD。
pub fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            '\t' => escaped.push_str("&#x9;"),
            '\n' => escaped.push_str("&#xA;"),
            '\r' => escaped.push_str("&#xD;"),
            c if is_xml_char(c) => escaped.push(c),
            _ => escaped.push(char::REPLACEMENT_CHARACTER),
        }
    }

    escaped
}

/// XML 1.0 Char 产生式（\t \n \r 已在上面单独处理）
fn is_xml_char(c: char) -> bool {
    matches!(c, '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// 负责写出 feed 文档
pub struct FeedWriter<W: Write> {
    writer: XmlWriter<W>,
}

impl<W: Write> FeedWriter<W> {
    pub fn new(write: W) -> Self {
        let writer = XmlWriter::new_with_indent(write, b' ', 2);

        Self { writer }
    }

    /// 取回内部 `Write`
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// 写出整个 feed
    pub fn write(&mut self, set: &FilterSet, updated: &str) -> BrittaResult<()> {
        let primary = set.primary_email();

        self.write_start_feed()?
            .write_text_element("title", FEED_TITLE)?
            .write_text_element("id", &format!("{}:filters:{}", TAG_PREFIX, primary))?
            .write_text_element("updated", updated)?
            .write_element("author", |writer| {
                writer
                    .write_text_element("name", primary)?
                    .write_text_element("email", primary)
            })?;

        for (index, entry) in set.iter().enumerate() {
            self.write_entry(index + 1, entry, updated)?;
        }

        self.write_end_tag("feed")?;

        Ok(())
    }

    /// 写出单个 <entry>，编号从 1 开始
    fn write_entry(
        &mut self,
        number: usize,
        entry: &FilterEntry,
        updated: &str,
    ) -> BrittaResult<&mut FeedWriter<W>> {
        self.write_element("entry", |writer| {
            writer
                .write_empty(BytesStart::new("category").with_attributes([("term", "filter")]))?
                .write_text_element("title", ENTRY_TITLE)?
                .write_text_element("id", &format!("{}:filter:{}", TAG_PREFIX, number))?
                .write_text_element("updated", updated)?
                .write_empty(BytesStart::new("content"))?;

            for (name, value) in entry_properties(entry) {
                let value = escape_xml(&value);
                writer.write_empty(
                    BytesStart::new("apps:property").with_attributes([
                        ("name".as_bytes(), name.as_bytes()),
                        ("value".as_bytes(), value.as_bytes()),
                    ]),
                )?;
            }

            Ok(writer)
        })
    }

    /// 写出元素：开标签、回调写内容、闭标签
    #[inline]
    fn write_element<F>(
        &mut self,
        name: &str,
        callback: F,
    ) -> BrittaResult<&mut FeedWriter<W>>
    where
        F: FnOnce(&mut Self) -> BrittaResult<&mut FeedWriter<W>>,
    {
        self.write_start_tag(name)?;
        (callback)(self)?;
        self.write_end_tag(name)?;

        Ok(self)
    }

    /// <feed> 开标签需要命名空间属性
    fn write_start_feed(&mut self) -> BrittaResult<&mut FeedWriter<W>> {
        let root = BytesStart::new("feed")
            .with_attributes([("xmlns", ATOM_NS), ("xmlns:apps", APPS_NS)]);

        self.writer.write_event(Event::Start(root))?;

        Ok(self)
    }

    fn write_start_tag(&mut self, name: &str) -> BrittaResult<&mut FeedWriter<W>> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;

        Ok(self)
    }

    fn write_end_tag(&mut self, name: &str) -> BrittaResult<&mut FeedWriter<W>> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;

        Ok(self)
    }

    /// 单行文本元素，如 <title>Mail Filters</title>
    fn write_text_element(&mut self, name: &str, text: &str) -> BrittaResult<&mut FeedWriter<W>> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.writer.write_event(Event::Text(BytesText::from_escaped(escape_xml(text))))?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;

        Ok(self)
    }

    fn write_empty(&mut self, element: BytesStart<'_>) -> BrittaResult<&mut FeedWriter<W>> {
        self.writer.write_event(Event::Empty(element))?;

        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use crate::serializer::clock::FixedClock;

    fn frozen() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    fn render(set: &FilterSet) -> String {
        String::from_utf8(render_feed(set, &frozen()).unwrap()).unwrap()
    }

    #[test]
    fn test_property_order() {
        let entry = FilterEntry {
            has_words: vec!["a".to_string(), "b".to_string()],
            does_not_have_words: vec!["c".to_string()],
            labels: vec!["l1".to_string(), "l2".to_string()],
            archive: true,
            mark_read: true,
            star: true,
            never_spam: true,
        };

        let names: Vec<&str> = entry_properties(&entry).into_iter().map(|(n, _)| n).collect();
        assert_eq!(
            names,
            vec!["hasTheWord", "doesNotHaveWord", "label", "label", "shouldArchive", "shouldMarkAsRead", "shouldStar", "neverSpam"]
        );
    }

    #[test]
    fn test_negative_only_entry() {
        // 测试场景：只有排除词项时不输出 hasTheWord
        let entry = FilterEntry {
            does_not_have_words: vec!["from:boss@example.com".to_string()],
            ..FilterEntry::new()
        };

        assert_eq!(
            entry_properties(&entry),
            vec![("doesNotHaveWord", "from:boss@example.com".to_string())]
        );
    }

    #[test]
    fn test_render_single_entry_document() {
        let mut set = FilterSet::new(vec!["me@example.com".to_string()]);
        set.push(FilterEntry {
            has_words: vec!["list:x".to_string()],
            star: true,
            ..FilterEntry::new()
        });

        let expected = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:apps="http://schemas.google.com/apps/2006">
  <title>Mail Filters</title>
  <id>tag:mail.google.com,2008:filters:me@example.com</id>
  <updated>2024-01-02T03:04:05Z</updated>
  <author>
    <name>me@example.com</name>
    <email>me@example.com</email>
  </author>
  <entry>
    <category term="filter"/>
    <title>Mail Filter</title>
    <id>tag:mail.google.com,2008:filter:1</id>
    <updated>2024-01-02T03:04:05Z</updated>
    <content/>
    <apps:property name="hasTheWord" value="list:x"/>
    <apps:property name="shouldStar" value="true"/>
  </entry>
</feed>"#;

        assert_eq!(render(&set), expected);
    }

    #[test]
    fn test_attribute_values_are_escaped() {
        let mut set = FilterSet::new(vec!["me@example.com".to_string()]);
        set.push(FilterEntry {
            has_words: vec!["subject:\"a & b\"".to_string()],
            ..FilterEntry::new()
        });

        let xml = render(&set);
        assert!(xml.contains(r#"<apps:property name="hasTheWord" value="subject:&quot;a &amp; b&quot;"/>"#));
    }

    /// 读回所有 apps:property 的 (name, value)
    fn read_properties(xml: &str) -> Vec<(String, String)> {
        let mut reader = quick_xml::Reader::from_str(xml);
        let mut props = Vec::new();

        loop {
            match reader.read_event().unwrap() {
                Event::Empty(e) if e.name().as_ref() == b"apps:property" => {
                    let mut name = String::new();
                    let mut value = String::new();
                    for attr in e.attributes() {
                        let attr = attr.unwrap();
                        let text = attr.unescape_value().unwrap().into_owned();
                        match attr.key.as_ref() {
                            b"name" => name = text,
                            b"value" => value = text,
                            _ => {}
                        }
                    }
                    props.push((name, value));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        props
    }

    #[test]
    fn test_control_characters_round_trip() {
        // 测试场景：换行/制表符写成字符引用可原样读回，非法字符替换为 U+FFFD
        let mut set = FilterSet::new(vec!["me@example.com".to_string()]);
        set.push(FilterEntry {
            has_words: vec!["subject:a\u{1}b".to_string(), "from:x\ny".to_string()],
            labels: vec!["l\tz\r".to_string()],
            ..FilterEntry::new()
        });

        let xml = render(&set);
        assert!(xml.contains("value=\"subject:a\u{FFFD}b AND from:x&#xA;y\""));
        assert!(xml.contains(r#"value="l&#x9;z&#xD;""#));
        assert!(!xml.contains('\u{1}'));

        assert_eq!(
            read_properties(&xml),
            vec![
                ("hasTheWord".to_string(), "subject:a\u{FFFD}b AND from:x\ny".to_string()),
                ("label".to_string(), "l\tz\r".to_string()),
            ]
        );
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml(r#"<a & 'b' "c">"#), "&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;");
        assert_eq!(escape_xml("a\u{0}b\u{FFFE}c"), "a\u{FFFD}b\u{FFFD}c");
        assert_eq!(escape_xml("中文 ✓ \u{1F600}"), "中文 ✓ \u{1F600}");
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut set = FilterSet::new(vec!["me@example.com".to_string()]);
        set.push(FilterEntry { has_words: vec!["a".to_string()], archive: true, ..FilterEntry::new() });

        let serializer = FeedSerializer::with_clock(FixedClock(frozen()));
        let first = serializer.serialize(&set).unwrap();
        let second = serializer.serialize(&set).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_set_renders_feed_only() {
        let set = FilterSet::new(vec!["me@example.com".to_string()]);
        let xml = render(&set);
        assert!(!xml.contains("<entry>"));
        assert!(xml.ends_with("</author>\n</feed>"));
    }
}
