//! 过滤器条目模型
//! 编译器输出的最小单元，一条对应 feed 中的一个 <entry>

/// 单条过滤器
///
/// 词项、标签均保持插入顺序，顺序会直接体现在生成的 XML 文本中。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterEntry {
    /// 正向词项（AND）
    pub has_words: Vec<String>,
    /// 排除词项（OR）
    pub does_not_have_words: Vec<String>,
    pub labels: Vec<String>,
    pub archive: bool,
    pub mark_read: bool,
    pub star: bool,
    pub never_spam: bool,
}

impl FilterEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// hasTheWord 属性值，无正向词项时为 None
    pub fn has_the_word(&self) -> Option<String> {
        if self.has_words.is_empty() {
            None
        } else {
            Some(self.has_words.join(" AND "))
        }
    }

    /// doesNotHaveWord 属性值，无排除词项时为 None
    pub fn does_not_have_word(&self) -> Option<String> {
        if self.does_not_have_words.is_empty() {
            None
        } else {
            Some(self.does_not_have_words.join(" OR "))
        }
    }
}
