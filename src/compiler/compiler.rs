//! 规则编译器核心
//! 仅负责将规则展开为有序的过滤器条目

use std::time::Instant;
use tracing::debug;

use crate::filter::{FilterEntry, FilterSet};
use crate::rule::{ArchiveUnlessDirected, Rule};

/// 规则编译器
pub struct RuleCompiler;

impl RuleCompiler {
    /// 编译规则列表
    ///
    /// 每条规则生成一个主条目；带 archive_unless_directed 的规则紧随其后
    /// 再追加一个派生条目。输入须已通过 [`RuleLoader::validate`] 校验。
    ///
    /// [`RuleLoader::validate`]: crate::rule::RuleLoader::validate
    pub fn compile(rules: &[Rule], emails: &[String]) -> FilterSet {
        let start = Instant::now();
        let mut set = FilterSet::new(emails.to_vec());
        let mut stats = CompileStats::default();

        for rule in rules {
            Self::compile_rule(rule, &mut set, &mut stats);
        }

        debug!("✅ 规则编译完成，总耗时{:?}", start.elapsed());
        debug!(
            "📊 编译统计：规则{}条、主条目{}条、派生条目{}条",
            stats.rule_count,
            stats.primary_count,
            stats.derived_count
        );

        set
    }

    /// 编译单条规则，把产物追加到集合末尾
    fn compile_rule(rule: &Rule, set: &mut FilterSet, stats: &mut CompileStats) {
        stats.rule_count += 1;

        // 1. 主条目
        let primary = Self::primary_entry(rule);

        // 2. 派生条目（依赖主条目的正向词项）
        let derived = rule
            .actions
            .archive_unless_directed
            .map(|opts| Self::derive_archive_unless_directed(&primary, set.emails(), opts));

        set.push(primary);
        stats.primary_count += 1;

        if let Some(derived) = derived {
            debug!("规则 {:?} 追加 archive_unless_directed 派生条目", rule.name);
            set.push(derived);
            stats.derived_count += 1;
        }
    }

    /// 由规则直接构造主条目
    pub fn primary_entry(rule: &Rule) -> FilterEntry {
        let actions = &rule.actions;

        FilterEntry {
            has_words: rule.conditions.has.clone(),
            does_not_have_words: rule.conditions.has_not.clone(),
            labels: actions.label().map(str::to_string).into_iter().collect(),
            archive: actions.archive,
            mark_read: actions.mark_read,
            star: actions.star,
            never_spam: actions.never_spam,
        }
    }

    /// 派生"归档，除非直接发给我"条目
    ///
    /// 复用主条目的正向词项，强制归档；按身份顺序为每个邮箱追加
    /// `to:` 与 `cc:` 两个排除词项。主条目的排除词项和标签不会带过来。
    pub fn derive_archive_unless_directed(
        primary: &FilterEntry,
        emails: &[String],
        opts: ArchiveUnlessDirected,
    ) -> FilterEntry {
        let does_not_have_words = emails
            .iter()
            .flat_map(|email| [format!("to:{}", email), format!("cc:{}", email)])
            .collect();

        FilterEntry {
            has_words: primary.has_words.clone(),
            does_not_have_words,
            archive: true,
            mark_read: opts.mark_read,
            ..FilterEntry::new()
        }
    }

    /// 构造分支条目（"otherwise"）
    ///
    /// 只对上一条目的正向词项逐个取反（`-term`），排除词项与动作均被忽略。
    /// 注意：多词项时得到的是 `-a AND -b`，而不是 `NOT (a AND b)`，
    /// 只有单词项条件的取反语义是准确的。
    pub fn otherwise(previous: &FilterEntry) -> FilterEntry {
        FilterEntry {
            has_words: previous.has_words.iter().map(|w| format!("-{}", w)).collect(),
            ..FilterEntry::new()
        }
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
struct CompileStats {
    rule_count: usize,
    primary_count: usize,
    derived_count: usize,
}
