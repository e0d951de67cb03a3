//! 序列化模块：FilterSet -> Gmail 过滤器 feed XML
pub mod clock;
pub mod feed;

pub use self::clock::{Clock, SystemClock, FixedClock, format_timestamp};
pub use self::feed::{FeedSerializer, FeedWriter, render_feed, entry_properties};
