use serde::{Deserialize, Serialize};

use crate::net::Corruption;
use crate::proto::Entity;

/// 可视化事件类型
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VizEventKind {
    /// 运行参数（t=0 的第一条事件）
    Meta {
        messages: u64,
        loss_prob: f64,
        corrupt_prob: f64,
        rtt: f64,
        seed: u64,
    },
    /// 应用层消息到达 A；`accepted=false` 表示窗口已满被拒绝
    AppMessage { accepted: bool, payload: String },
    /// 包交给信道（发生在丢包/损坏判定之前）
    Send {
        from: Entity,
        seqnum: i32,
        acknum: i32,
        checksum: i32,
    },
    Lost { from: Entity },
    Corrupt { from: Entity, field: Corruption },
    /// 包到达对端（`corrupted` 为到达时的校验结果）
    Arrive {
        to: Entity,
        seqnum: i32,
        acknum: i32,
        corrupted: bool,
    },
    /// 载荷交付应用层
    Deliver { at: Entity, payload: String },
    TimerStart { entity: Entity, expires_at: f64 },
    TimerStop { entity: Entity },
    Timeout { entity: Entity },
}

/// 一个可回放的事件（JSON）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VizEvent {
    /// 仿真时间（时间单位）
    pub t: f64,
    #[serde(flatten)]
    pub kind: VizEventKind,
}

/// 一个简单的事件收集器（存内存，仿真结束写 JSON 文件）
#[derive(Debug, Default)]
pub struct VizLogger {
    pub events: Vec<VizEvent>,
}

impl VizLogger {
    pub fn push(&mut self, ev: VizEvent) {
        self.events.push(ev);
    }
}
