//! 过滤器集合
//! 持有身份邮箱与有序条目列表，编译期间只追加，不删除、不重排

use super::entry::FilterEntry;

/// 过滤器集合
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    emails: Vec<String>,
    entries: Vec<FilterEntry>,
}

impl FilterSet {
    /// 创建空集合
    ///
    /// `emails` 由上游保证非空，第一个邮箱作为 feed 作者。
    pub fn new(emails: Vec<String>) -> Self {
        Self {
            emails,
            entries: Vec::new(),
        }
    }

    /// 追加条目，返回其在集合中的下标
    pub fn push(&mut self, entry: FilterEntry) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn emails(&self) -> &[String] {
        &self.emails
    }

    /// 主身份邮箱
    pub fn primary_email(&self) -> &str {
        self.emails.first().map(String::as_str).unwrap_or_default()
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterEntry;
    type IntoIter = std::slice::Iter<'a, FilterEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_preserves_order() {
        let mut set = FilterSet::new(vec!["me@example.com".to_string()]);
        let first = set.push(FilterEntry { star: true, ..FilterEntry::new() });
        let second = set.push(FilterEntry { archive: true, ..FilterEntry::new() });

        assert_eq!((first, second), (0, 1));
        assert_eq!(set.len(), 2);
        assert!(set.entries()[0].star);
        assert!(set.entries()[1].archive);
    }

    #[test]
    fn test_primary_email_is_first() {
        let set = FilterSet::new(vec!["a@example.com".to_string(), "b@example.com".to_string()]);
        assert_eq!(set.primary_email(), "a@example.com");
        assert!(set.is_empty());
    }
}
