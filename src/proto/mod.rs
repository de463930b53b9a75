//! 传输层协议模块
//!
//! 交替比特（停等 ARQ）协议：单向数据传输、窗口大小为 1、
//! 一比特序列号、超时重传。信道可能丢包或损坏，但不会乱序。
//!
//! - [`AltBitSender`]：实体 A，接收应用消息、维护唯一的未确认包与重传定时器
//! - [`AltBitReceiver`]：实体 B，校验并按序交付，对每个到达的包回一个 ACK
//!
//! 协议层只通过 [`NetApi`] 与外界交互，不依赖具体的网络模拟器。

mod api;
pub mod checksum;
mod packet;
mod receiver;
mod sender;
mod stats;

pub use api::{Entity, NetApi};
pub use packet::{
    ACK_FILLER, Msg, NOT_IN_USE, PAYLOAD_LEN, Packet, PacketDecodeError, Payload, SeqBit, WIRE_LEN,
};
pub use receiver::{AltBitReceiver, RECEIVER_INITIAL_REPLY_SEQ, RecvOutcome};
pub use sender::{AckOutcome, AltBitSender, SenderState, TimeoutOutcome};
pub use stats::{ReceiverStats, SenderStats};

use crate::sim::SimTime;

/// 协议参数
#[derive(Debug, Clone)]
pub struct ProtoConfig {
    /// 重传定时器时长
    pub rtt: SimTime,
}

impl Default for ProtoConfig {
    fn default() -> Self {
        Self {
            rtt: SimTime::from_units(15),
        }
    }
}

/// 应用消息提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submit {
    /// 已封装为序号 `seq` 的数据包并发出
    Accepted { seq: SeqBit },
    /// 已有未确认包，消息被拒绝；由应用层决定是否重试
    WindowFull,
    /// 该实体不发送应用数据（单向传输中的 B）
    Unsupported,
}

/// 一个协议实体的事件入口，由外部驱动（模拟器或测试）调用。
///
/// 每个入口都必须执行完毕后返回，不能阻塞。
pub trait Endpoint {
    fn entity(&self) -> Entity;

    /// 在其他入口之前调用一次，恢复初始状态。
    fn init(&mut self);

    fn on_app_message(&mut self, msg: Msg, net: &mut dyn NetApi) -> Submit;

    fn on_packet(&mut self, pkt: Packet, net: &mut dyn NetApi);

    fn on_timer(&mut self, net: &mut dyn NetApi);
}
