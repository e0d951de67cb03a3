//! 编译模块：将规则展开为有序的过滤器条目
pub mod compiler;

pub use self::compiler::RuleCompiler;
