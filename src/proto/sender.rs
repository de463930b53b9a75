//! 发送方（实体 A）
//!
//! 两个状态：
//! - `Idle`：没有未确认包，定时器停止，可以接受新消息
//! - `AwaitingAck`：恰有一个未确认包，定时器运行
//!
//! 定时器与未确认包同步：发送时启动，收到匹配的 ACK 才停止，每次重传时重启。
//! 损坏的 ACK 与丢失的 ACK 同等处理，都只能靠超时恢复；本协议没有 NAK 快速路径。

use tracing::{debug, info, trace};

use super::packet::{Msg, Packet, SeqBit};
use super::stats::SenderStats;
use super::{Endpoint, Entity, NetApi, ProtoConfig, Submit};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SenderState {
    Idle,
    AwaitingAck,
}

/// 收到 ACK 后的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// 确认了未确认包，发送方回到 `Idle`
    New { ack: SeqBit },
    /// 与未确认包序号不符，或当前没有未确认包；`ack` 为 `None` 表示头部值不合法
    Duplicate { ack: Option<SeqBit> },
    /// 校验和不符，丢弃
    Corrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutOutcome {
    Retransmitted { seq: SeqBit },
    /// `Idle` 状态下的超时，忽略
    Stray,
}

/// 交替比特发送方
#[derive(Debug, Clone, Default)]
pub struct AltBitSender {
    cfg: ProtoConfig,
    next_seq: SeqBit,
    /// 窗口：容量为 1
    outstanding: Option<Packet>,
    stats: SenderStats,
}

impl AltBitSender {
    pub fn new(cfg: ProtoConfig) -> Self {
        Self {
            cfg,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SenderState {
        if self.outstanding.is_some() {
            SenderState::AwaitingAck
        } else {
            SenderState::Idle
        }
    }

    /// 下一个新数据包将使用的序号
    pub fn next_seq(&self) -> SeqBit {
        self.next_seq
    }

    pub fn outstanding(&self) -> Option<&Packet> {
        self.outstanding.as_ref()
    }

    pub fn stats(&self) -> &SenderStats {
        &self.stats
    }

    /// 接受一条应用消息。窗口已满时返回 [`Submit::WindowFull`]，不排队。
    pub fn submit(&mut self, msg: Msg, net: &mut dyn NetApi) -> Submit {
        if self.outstanding.is_some() {
            self.stats.window_full += 1;
            info!(next_seq = ?self.next_seq, "----A: 新消息到达，发送窗口已满");
            return Submit::WindowFull;
        }

        let seq = self.next_seq;
        let pkt = Packet::data(seq, msg.data);
        self.outstanding = Some(pkt);
        self.stats.packets_sent += 1;

        debug!(seq = ?seq, checksum = pkt.checksum, "----A: 发送窗口未满，发送新数据包");
        net.to_layer3(Entity::A, pkt);
        net.start_timer(Entity::A, self.cfg.rtt);

        self.next_seq = seq.flip();
        Submit::Accepted { seq }
    }

    /// 处理从信道到达的 ACK。
    pub fn on_ack(&mut self, pkt: &Packet, net: &mut dyn NetApi) -> AckOutcome {
        if pkt.is_corrupted() {
            self.stats.corrupted_acks += 1;
            debug!(now = ?net.now(), "----A: 收到损坏的 ACK，忽略");
            return AckOutcome::Corrupted;
        }
        self.stats.acks_received += 1;

        // Idle 时收到的 ACK 必然是重复的：窗口为 1，接受它会让序号失步
        let outstanding_seq = self.outstanding.map(|out| out.seqnum);
        let ack = match pkt.ack_bit() {
            Some(ack) if outstanding_seq == Some(ack.wire()) => ack,
            other => {
                self.stats.duplicate_acks += 1;
                debug!(acknum = pkt.acknum, state = ?self.state(), "----A: 重复 ACK，忽略");
                return AckOutcome::Duplicate { ack: other };
            }
        };

        self.stats.new_acks += 1;
        debug!(ack = ?ack, "----A: 新 ACK，未确认包出窗");
        self.outstanding = None;
        net.stop_timer(Entity::A);
        AckOutcome::New { ack }
    }

    /// 重传定时器超时：原样重传未确认包并重启定时器。
    pub fn on_timeout(&mut self, net: &mut dyn NetApi) -> TimeoutOutcome {
        let Some(pkt) = self.outstanding else {
            self.stats.stray_timeouts += 1;
            debug!(now = ?net.now(), "----A: 没有未确认包时超时，忽略");
            return TimeoutOutcome::Stray;
        };

        self.stats.packets_resent += 1;
        info!(seqnum = pkt.seqnum, now = ?net.now(), "----A: 超时，重传数据包");
        net.to_layer3(Entity::A, pkt);
        net.start_timer(Entity::A, self.cfg.rtt);

        // outstanding 只会由 data() 写入，序号必然合法
        let seq = pkt.seq_bit().unwrap_or(self.next_seq.flip());
        TimeoutOutcome::Retransmitted { seq }
    }
}

impl Endpoint for AltBitSender {
    fn entity(&self) -> Entity {
        Entity::A
    }

    fn init(&mut self) {
        trace!("A_init");
        self.next_seq = SeqBit::Zero;
        self.outstanding = None;
        self.stats = SenderStats::default();
    }

    fn on_app_message(&mut self, msg: Msg, net: &mut dyn NetApi) -> Submit {
        self.submit(msg, net)
    }

    fn on_packet(&mut self, pkt: Packet, net: &mut dyn NetApi) {
        self.on_ack(&pkt, net);
    }

    fn on_timer(&mut self, net: &mut dyn NetApi) {
        self.on_timeout(net);
    }
}
