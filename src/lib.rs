//! rsbritta - 声明式邮件过滤规则 -> Gmail 过滤器导入 XML

// 导出全局错误类型
pub use self::error::{BrittaError, BrittaResult};

// 导出配置模块
pub use self::config::{GlobalConfig, ConfigManager, CustomConfigBuilder};

// 导出规则模块核心接口
pub use self::rule::{
    RuleConfig, Rule, Conditions, Actions, ArchiveUnlessDirected,
    RuleLoader, RuleFileType
};

// 导出过滤器模型
pub use self::filter::{FilterEntry, FilterSet};

// 导出编译模块核心接口
pub use self::compiler::RuleCompiler;

// 导出序列化模块核心接口
pub use self::serializer::{
    Clock, SystemClock, FixedClock, FeedSerializer, FeedWriter, render_feed
};

// 声明所有子模块
pub mod config;
pub mod error;
pub mod rule;
pub mod filter;
pub mod compiler;
pub mod serializer;

/// 编译并序列化规则配置（使用系统时钟）
pub fn generate_xml(config: &RuleConfig) -> BrittaResult<Vec<u8>> {
    generate_xml_with_clock(config, SystemClock)
}

/// 编译并序列化规则配置（注入时间源）
pub fn generate_xml_with_clock<C: Clock>(config: &RuleConfig, clock: C) -> BrittaResult<Vec<u8>> {
    let set = RuleCompiler::compile(&config.filters, &config.emails);
    FeedSerializer::with_clock(clock).serialize(&set)
}

/// 同 [`generate_xml`]，返回字符串
pub fn generate_xml_string(config: &RuleConfig) -> BrittaResult<String> {
    Ok(String::from_utf8(generate_xml(config)?)?)
}
