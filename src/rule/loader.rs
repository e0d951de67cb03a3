//! 规则加载管理器
//! 负责读取规则文件、解析并校验

use std::fs;
use std::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::model::{Rule, RuleConfig};
use crate::error::{BrittaError, BrittaResult};

/// 规则文件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleFileType {
    /// *.yaml / *.yml
    Yaml,
    /// *.json 或未知扩展名
    Json,
    /// *.toml
    Toml,
}

impl RuleFileType {
    /// 按扩展名推断文件类型
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => RuleFileType::Yaml,
            Some(ext) if ext.eq_ignore_ascii_case("toml") => RuleFileType::Toml,
            _ => RuleFileType::Json,
        }
    }
}

/// 规则加载管理器
pub struct RuleLoader;

impl RuleLoader {
    /// 从文件加载规则配置（读取 -> 解析 -> 校验）
    pub fn load_from_file(path: &Path) -> BrittaResult<RuleConfig> {
        let data = fs::read_to_string(path).map_err(|e| {
            BrittaError::RuleLoadError(format!("读取规则文件 {} 失败：{}", path.display(), e))
        })?;

        let rule_type = RuleFileType::from_path(path);
        debug!("加载规则文件 {}，格式 {:?}", path.display(), rule_type);

        match rule_type {
            RuleFileType::Yaml => Self::from_yaml_str(&data),
            RuleFileType::Json => Self::from_json_str(&data),
            RuleFileType::Toml => Self::from_toml_str(&data),
        }
    }

    /// 解析 YAML 格式规则
    pub fn from_yaml_str(data: &str) -> BrittaResult<RuleConfig> {
        let config: RuleConfig = serde_yaml::from_str(data)
            .map_err(|e| BrittaError::RuleParseError(format!("YAML：{}", e)))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// 解析 JSON 格式规则
    pub fn from_json_str(data: &str) -> BrittaResult<RuleConfig> {
        let config: RuleConfig = serde_json::from_str(data)
            .map_err(|e| BrittaError::RuleParseError(format!("JSON：{}", e)))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// 解析 TOML 格式规则
    pub fn from_toml_str(data: &str) -> BrittaResult<RuleConfig> {
        let config: RuleConfig = toml::from_str(data)
            .map_err(|e| BrittaError::RuleParseError(format!("TOML：{}", e)))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// 校验规则配置
    pub fn validate(config: &RuleConfig) -> BrittaResult<()> {
        static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap()
        });

        if config.emails.is_empty() {
            return Err(BrittaError::InvalidConfig("no email addresses specified".to_string()));
        }

        if let Some(bad) = config.emails.iter().find(|e| !EMAIL_REGEX.is_match(e)) {
            return Err(BrittaError::InvalidConfig(format!("invalid email address {:?}", bad)));
        }

        if config.filters.is_empty() {
            return Err(BrittaError::InvalidConfig("no filters specified".to_string()));
        }

        for (index, rule) in config.filters.iter().enumerate() {
            Self::validate_rule(rule, index)?;
        }

        debug!(
            "规则校验通过：身份邮箱{}个、规则{}条",
            config.emails.len(),
            config.filters.len()
        );
        Ok(())
    }

    /// 校验单条规则
    fn validate_rule(rule: &Rule, index: usize) -> BrittaResult<()> {
        if rule.name.is_empty() {
            return Err(BrittaError::InvalidConfig(format!("filter {} has no name", index)));
        }

        if rule.conditions.is_empty() {
            return Err(BrittaError::InvalidConfig(format!("filter {:?} has no conditions", rule.name)));
        }

        Ok(())
    }
}
