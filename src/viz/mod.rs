//! 可视化事件记录（用于离线回放一次运行）
//!
//! 用结构化 JSON 事件代替解析文本日志：每次发送、丢包、损坏、到达、
//! 交付和定时器动作各记一条。

mod types;

pub use types::{VizEvent, VizEventKind, VizLogger};
