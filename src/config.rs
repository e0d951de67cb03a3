//! 全局配置管理,存储所有可配置项

use std::path::PathBuf;

/// 全局配置
#[derive(Debug, Clone)]
pub struct GlobalConfig {
    // 规则文件路径（YAML / JSON / TOML）
    pub rules_path: PathBuf,
    // 输出路径，None 表示写到标准输出
    pub output_path: Option<PathBuf>,
    // 是否启用详细日志
    pub verbose: bool,
}

/// 配置管理器
pub struct ConfigManager;

impl ConfigManager {
    /// 自定义配置，规则文件路径必填
    pub fn custom(rules_path: PathBuf) -> CustomConfigBuilder {
        CustomConfigBuilder::new(rules_path)
    }
}

/// 配置构建器（便于自定义配置）
#[derive(Debug, Clone)]
pub struct CustomConfigBuilder {
    config: GlobalConfig,
}

impl CustomConfigBuilder {
    pub fn new(rules_path: PathBuf) -> Self {
        Self {
            config: GlobalConfig {
                rules_path,
                output_path: None,
                verbose: false,
            },
        }
    }

    pub fn output_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.output_path = path;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn build(self) -> GlobalConfig {
        self.config
    }
}
