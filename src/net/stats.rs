//! 统计信息
//!
//! 模拟器一侧的计数器，以及一次运行结束时的汇总。

use serde::{Deserialize, Serialize};

use crate::proto::{ReceiverStats, SenderStats};

/// 模拟器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// 应用层产生的消息数
    pub messages_generated: u64,
    /// 交给信道的包数（两个方向合计）
    pub to_layer3: u64,
    pub lost: u64,
    pub corrupted: u64,
    /// 交付给 B 应用层的载荷数
    pub delivered: u64,
    /// 实际触发的超时次数
    pub timeouts: u64,
    /// 重复启动/停止定时器等错误调用
    pub timer_misuse: u64,
    /// 事件间检查到的协议不变量违例
    pub invariant_violations: u64,
}

/// 一次运行的汇总
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    /// 结束时的仿真时间（时间单位）
    pub end_time: f64,
    pub events: u64,
    pub net: Stats,
    pub sender: SenderStats,
    pub receiver: ReceiverStats,
    /// 被发送方接受的消息数
    pub accepted: u64,
    /// B 收到的载荷序列与 A 接受的消息序列完全一致（恰好一次、按序）
    pub in_order: bool,
}
