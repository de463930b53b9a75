//! 协议统计
//!
//! 两端各自累计的计数器，仅用于诊断与结果汇总，不参与协议决策。

use serde::{Deserialize, Serialize};

/// 发送方（A）统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenderStats {
    /// 窗口已满时到达、被拒绝的应用消息数
    pub window_full: u64,
    /// 收到的未损坏 ACK 总数（新 ACK + 重复 ACK）
    pub acks_received: u64,
    pub new_acks: u64,
    pub duplicate_acks: u64,
    pub corrupted_acks: u64,
    /// 首次发送的数据包数
    pub packets_sent: u64,
    /// 超时重传次数
    pub packets_resent: u64,
    /// 没有未确认包时触发的超时
    pub stray_timeouts: u64,
}

/// 接收方（B）统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiverStats {
    /// 被接受并交付给应用层的数据包数
    pub packets_received: u64,
    /// 序号不符（重复）的未损坏数据包
    pub duplicates: u64,
    pub corrupted: u64,
    pub acks_sent: u64,
}
