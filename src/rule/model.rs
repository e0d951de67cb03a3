//! 规则数据模型定义
//! 仅存储规则数据，无任何业务逻辑，从规则文件反序列化

use serde::Deserialize;

/// 完整规则配置（规则文件顶层结构）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleConfig {
    /// 账户身份邮箱，第一个作为 feed 作者
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub filters: Vec<Rule>,
}

/// 单条过滤规则
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub conditions: Conditions,
    #[serde(default)]
    pub actions: Actions,
}

/// 匹配条件
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Conditions {
    /// 必须全部出现（AND）
    #[serde(default)]
    pub has: Vec<String>,
    /// 任一出现即排除（OR）
    #[serde(default)]
    pub has_not: Vec<String>,
}

impl Conditions {
    pub fn is_empty(&self) -> bool {
        self.has.is_empty() && self.has_not.is_empty()
    }
}

/// 规则动作
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Actions {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub archive: bool,
    #[serde(default)]
    pub mark_read: bool,
    #[serde(default)]
    pub star: bool,
    #[serde(default)]
    pub never_spam: bool,
    /// 复合动作：归档所有匹配邮件，除非直接发给/抄送给自己
    #[serde(default)]
    pub archive_unless_directed: Option<ArchiveUnlessDirected>,
}

impl Actions {
    /// 空字符串标签等同于未设置
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref().filter(|l| !l.is_empty())
    }
}

/// archive_unless_directed 参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub struct ArchiveUnlessDirected {
    #[serde(default)]
    pub mark_read: bool,
}
