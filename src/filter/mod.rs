//! 过滤器模块：编译产物的数据模型
pub mod entry;
pub mod set;

pub use self::entry::FilterEntry;
pub use self::set::FilterSet;
