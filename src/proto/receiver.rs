//! 接收方（实体 B）
//!
//! 只接受序号等于 `expected_seq` 且未损坏的数据包。无论接受与否，
//! 每个到达的包都回且只回一个 ACK：
//! - 接受：ack = `expected_seq`，然后翻转 `expected_seq`
//! - 拒绝：ack = `expected_seq.flip()`，即重新确认上一个已交付的包
//!
//! B 不发送应用数据，也没有自己的定时器。

use tracing::{debug, info, trace};

use super::packet::{Msg, Packet, SeqBit};
use super::stats::ReceiverStats;
use super::{Endpoint, Entity, NetApi, Submit};

/// B 发出的 ACK 包自身的初始序号。
///
/// 与数据序号相互独立，且先行一步。单向传输中发送方不检查 ACK 的 seqnum，
/// 这个值只影响校验和与日志。
pub const RECEIVER_INITIAL_REPLY_SEQ: SeqBit = SeqBit::One;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvOutcome {
    /// 按序到达，载荷已交付应用层
    Delivered { seq: SeqBit },
    /// 未损坏但序号不符（通常是重传造成的重复包）；`seq` 为 `None` 表示头部值不合法
    Duplicate { seq: Option<SeqBit> },
    Corrupted,
}

/// 交替比特接收方
#[derive(Debug, Clone)]
pub struct AltBitReceiver {
    expected_seq: SeqBit,
    reply_seq: SeqBit,
    stats: ReceiverStats,
}

impl Default for AltBitReceiver {
    fn default() -> Self {
        Self {
            expected_seq: SeqBit::Zero,
            reply_seq: RECEIVER_INITIAL_REPLY_SEQ,
            stats: ReceiverStats::default(),
        }
    }
}

impl AltBitReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected_seq(&self) -> SeqBit {
        self.expected_seq
    }

    /// 下一个 ACK 包将使用的 seqnum
    pub fn reply_seq(&self) -> SeqBit {
        self.reply_seq
    }

    pub fn stats(&self) -> &ReceiverStats {
        &self.stats
    }

    /// 处理从信道到达的数据包，并回一个 ACK。
    pub fn on_data(&mut self, pkt: &Packet, net: &mut dyn NetApi) -> RecvOutcome {
        let corrupted = pkt.is_corrupted();
        let outcome = if corrupted {
            RecvOutcome::Corrupted
        } else if pkt.seqnum == self.expected_seq.wire() {
            RecvOutcome::Delivered {
                seq: self.expected_seq,
            }
        } else {
            RecvOutcome::Duplicate {
                seq: pkt.seq_bit(),
            }
        };

        let ack = match outcome {
            RecvOutcome::Delivered { seq } => {
                self.stats.packets_received += 1;
                info!(seq = ?seq, "----B: 数据包正确接收，交付应用层并发送 ACK");
                net.to_layer5(Entity::B, pkt.payload);
                self.expected_seq = seq.flip();
                seq
            }
            RecvOutcome::Duplicate { .. } | RecvOutcome::Corrupted => {
                if corrupted {
                    self.stats.corrupted += 1;
                } else {
                    self.stats.duplicates += 1;
                }
                debug!(
                    seqnum = pkt.seqnum,
                    expected = ?self.expected_seq,
                    corrupted,
                    "----B: 数据包损坏或序号不符，重发上一个 ACK"
                );
                self.expected_seq.flip()
            }
        };

        self.send_ack(ack, net);
        outcome
    }

    fn send_ack(&mut self, ack: SeqBit, net: &mut dyn NetApi) {
        let reply = Packet::ack(self.reply_seq, ack);
        self.reply_seq = self.reply_seq.flip();
        self.stats.acks_sent += 1;
        trace!(seqnum = reply.seqnum, acknum = reply.acknum, "----B: 发送 ACK");
        net.to_layer3(Entity::B, reply);
    }
}

impl Endpoint for AltBitReceiver {
    fn entity(&self) -> Entity {
        Entity::B
    }

    fn init(&mut self) {
        trace!("B_init");
        *self = Self::default();
    }

    fn on_app_message(&mut self, _msg: Msg, _net: &mut dyn NetApi) -> Submit {
        debug!("----B: 单向传输，B 不发送应用数据");
        Submit::Unsupported
    }

    fn on_packet(&mut self, pkt: Packet, net: &mut dyn NetApi) {
        self.on_data(&pkt, net);
    }

    fn on_timer(&mut self, _net: &mut dyn NetApi) {}
}
