//! 全局错误类型定义

use thiserror::Error;
use quick_xml::Error as XmlError;
use std::io::Error as IoError;
use std::string::FromUtf8Error;

#[derive(Error, Debug)]
pub enum BrittaError {
    // 规则相关错误
    #[error("规则加载失败：{0}")]
    RuleLoadError(String),
    #[error("规则解析失败：{0}")]
    RuleParseError(String),
    #[error("配置无效：{0}")]
    InvalidConfig(String),

    // 序列化错误
    #[error("XML编码失败：{0}")]
    Xml(#[from] XmlError),
    #[error("输出不是合法UTF-8：{0}")]
    Utf8(#[from] FromUtf8Error),

    // 基础错误
    #[error("IO操作失败：{0}")]
    Io(#[from] IoError),
}

// 全局Result类型
pub type BrittaResult<T> = Result<T, BrittaError>;
