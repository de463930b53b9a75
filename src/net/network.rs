//! 网络模拟器
//!
//! 持有两端协议实体、信道故障模型、每个实体的定时器和应用层消息源。
//! 同一方向上的包按发送顺序到达：到达时间不早于该方向上一次调度的到达时间。

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, trace, warn};

use super::channel::{ChannelModel, Fate, LossyChannel};
use super::config::EmulatorConfig;
use super::events::{FromLayer3, FromLayer5, TimerInterrupt};
use super::stats::{Stats, Summary};
use crate::proto::{
    AltBitReceiver, AltBitSender, Endpoint, Entity, Msg, Packet, Payload, ProtoConfig, Submit,
};
use crate::sim::{SimTime, Simulator};
use crate::viz::{VizEventKind, VizLogger};

#[derive(Debug, Default, Clone, Copy)]
struct TimerSlot {
    running: bool,
    /// 每次启动/停止都递增，用来识别已失效的超时事件
    generation: u64,
}

/// 网络模拟器
pub struct Network {
    pub cfg: EmulatorConfig,
    pub sender: AltBitSender,
    pub receiver: AltBitReceiver,
    channel: Box<dyn ChannelModel>,
    rng: StdRng,
    timers: [TimerSlot; 2],
    /// 按目的实体记录最近一次调度的到达时间
    last_arrival: [SimTime; 2],
    /// 被 A 接受的消息（按接受顺序）
    pub accepted: Vec<Payload>,
    /// 交付给 B 应用层的载荷（按交付顺序）
    pub delivered: Vec<Payload>,
    pub stats: Stats,
    pub viz: Option<VizLogger>,
}

impl Network {
    pub fn new(cfg: EmulatorConfig, channel: Box<dyn ChannelModel>) -> Self {
        let proto = ProtoConfig {
            rtt: SimTime::from_units_f64(cfg.rtt),
        };
        let rng = StdRng::seed_from_u64(cfg.seed);
        Self {
            cfg,
            sender: AltBitSender::new(proto),
            receiver: AltBitReceiver::new(),
            channel,
            rng,
            timers: [TimerSlot::default(); 2],
            last_arrival: [SimTime::ZERO; 2],
            accepted: Vec::new(),
            delivered: Vec::new(),
            stats: Stats::default(),
            viz: None,
        }
    }

    /// 使用随机丢包/损坏信道；信道随机数与时延随机数使用不同的种子流。
    pub fn lossy(cfg: EmulatorConfig) -> Self {
        let channel = LossyChannel::new(cfg.loss_prob, cfg.corrupt_prob, cfg.seed.wrapping_add(1));
        Self::new(cfg, Box::new(channel))
    }

    /// 初始化两端实体并调度第一条应用消息。
    pub fn start(&mut self, sim: &mut Simulator) {
        self.sender.init();
        self.receiver.init();
        self.emit_viz_meta();
        info!(
            messages = self.cfg.messages,
            loss_prob = self.cfg.loss_prob,
            corrupt_prob = self.cfg.corrupt_prob,
            rtt = self.cfg.rtt,
            "🚦 模拟器启动"
        );
        if self.cfg.messages > 0 {
            let gap = self.message_gap();
            sim.schedule_in(gap, FromLayer5);
        }
    }

    /// 下一条应用消息到达前的间隔：[0, 2 * lambda] 上均匀分布
    pub(crate) fn message_gap(&mut self) -> SimTime {
        let upper = 2.0 * self.cfg.lambda;
        let units = if upper > 0.0 {
            self.rng.gen_range(0.0..=upper)
        } else {
            0.0
        };
        SimTime::from_units_f64(units)
    }

    /// 取出下一条应用消息：第 n 条为 20 个 `'a' + n % 26`。
    pub(crate) fn next_message(&mut self) -> Option<Msg> {
        let n = self.stats.messages_generated;
        if n >= self.cfg.messages {
            return None;
        }
        self.stats.messages_generated += 1;
        Some(Msg::filled(b'a' + (n % 26) as u8))
    }

    pub(crate) fn has_more_messages(&self) -> bool {
        self.stats.messages_generated < self.cfg.messages
    }

    pub(crate) fn record_submit(&mut self, now: SimTime, msg: Msg, outcome: Submit) {
        let accepted = matches!(outcome, Submit::Accepted { .. });
        if accepted {
            self.accepted.push(msg.data);
        }
        self.viz_push(
            now,
            VizEventKind::AppMessage {
                accepted,
                payload: String::from_utf8_lossy(&msg.data).into_owned(),
            },
        );
    }

    /// 把包交给信道：按信道模型丢弃/损坏，否则调度到达事件。
    #[tracing::instrument(skip(self, pkt, sim), fields(from = ?from, seqnum = pkt.seqnum, acknum = pkt.acknum))]
    pub fn to_layer3(&mut self, from: Entity, mut pkt: Packet, sim: &mut Simulator) {
        self.stats.to_layer3 += 1;
        let now = sim.now();
        self.viz_push(
            now,
            VizEventKind::Send {
                from,
                seqnum: pkt.seqnum,
                acknum: pkt.acknum,
                checksum: pkt.checksum,
            },
        );

        match self.channel.fate(from, &pkt) {
            Fate::Lose => {
                self.stats.lost += 1;
                debug!("💥 信道丢包");
                self.viz_push(now, VizEventKind::Lost { from });
                return;
            }
            Fate::Corrupt(how) => {
                self.stats.corrupted += 1;
                how.apply(&mut pkt);
                debug!(corruption = ?how, "⚡ 信道损坏数据包");
                self.viz_push(now, VizEventKind::Corrupt { from, field: how });
            }
            Fate::Deliver => {}
        }

        let to = from.peer();
        let delay = if self.cfg.max_delay > self.cfg.min_delay {
            self.rng.gen_range(self.cfg.min_delay..=self.cfg.max_delay)
        } else {
            self.cfg.min_delay
        };
        let base = now.max(self.last_arrival[to.index()]);
        let arrive = base.saturating_add(SimTime::from_units_f64(delay));
        self.last_arrival[to.index()] = arrive;

        trace!(now = ?now, base = ?base, arrive = ?arrive, "计算到达时间");
        sim.schedule(arrive, FromLayer3 { to, pkt });
    }

    pub fn to_layer5(&mut self, at: Entity, payload: Payload, now: SimTime) {
        self.stats.delivered += 1;
        self.delivered.push(payload);
        debug!(at = ?at, delivered = self.stats.delivered, "📬 载荷交付应用层");
        self.viz_push(
            now,
            VizEventKind::Deliver {
                at,
                payload: String::from_utf8_lossy(&payload).into_owned(),
            },
        );
    }

    pub fn start_timer(&mut self, entity: Entity, increment: SimTime, sim: &mut Simulator) {
        let slot = &mut self.timers[entity.index()];
        if slot.running {
            self.stats.timer_misuse += 1;
            warn!(entity = ?entity, "尝试启动一个已在运行的定时器，忽略");
            return;
        }
        slot.running = true;
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;

        let expires = sim.now().saturating_add(increment);
        trace!(entity = ?entity, expires = ?expires, generation, "启动定时器");
        sim.schedule(expires, TimerInterrupt { entity, generation });
        self.viz_push(
            sim.now(),
            VizEventKind::TimerStart {
                entity,
                expires_at: expires.as_units_f64(),
            },
        );
    }

    pub fn stop_timer(&mut self, entity: Entity, now: SimTime) {
        let slot = &mut self.timers[entity.index()];
        if !slot.running {
            self.stats.timer_misuse += 1;
            warn!(entity = ?entity, "尝试停止一个未运行的定时器，忽略");
            return;
        }
        slot.running = false;
        slot.generation = slot.generation.wrapping_add(1);
        trace!(entity = ?entity, "停止定时器");
        self.viz_push(now, VizEventKind::TimerStop { entity });
    }

    pub fn timer_running(&self, entity: Entity) -> bool {
        self.timers[entity.index()].running
    }

    /// 超时事件到期：仍有效则停止定时器并返回 true；已被停止/重启过则返回 false。
    pub(crate) fn fire_timer(&mut self, entity: Entity, generation: u64, now: SimTime) -> bool {
        let slot = &mut self.timers[entity.index()];
        if !slot.running || slot.generation != generation {
            trace!(entity = ?entity, generation, "过期的定时器事件，忽略");
            return false;
        }
        slot.running = false;
        self.stats.timeouts += 1;
        self.viz_push(now, VizEventKind::Timeout { entity });
        true
    }

    pub(crate) fn note_arrival(&mut self, to: Entity, pkt: &Packet, now: SimTime) {
        self.viz_push(
            now,
            VizEventKind::Arrive {
                to,
                seqnum: pkt.seqnum,
                acknum: pkt.acknum,
                corrupted: pkt.is_corrupted(),
            },
        );
    }

    /// 事件间检查：
    /// - A 的定时器运行当且仅当 A 有未确认包；B 的定时器从不运行
    /// - A 空闲时，A 的下一个序号等于 B 期望的序号
    pub(crate) fn check_invariants(&mut self, now: SimTime) {
        let outstanding = self.sender.outstanding().is_some();
        if self.timer_running(Entity::A) != outstanding {
            self.stats.invariant_violations += 1;
            error!(now = ?now, outstanding, "发送方定时器与未确认包不同步");
        }
        if self.timer_running(Entity::B) {
            self.stats.invariant_violations += 1;
            error!(now = ?now, "接收方定时器不应运行");
        }
        if !outstanding && self.sender.next_seq() != self.receiver.expected_seq() {
            self.stats.invariant_violations += 1;
            error!(
                now = ?now,
                next_seq = ?self.sender.next_seq(),
                expected_seq = ?self.receiver.expected_seq(),
                "发送方与接收方序号失步"
            );
        }
    }

    pub fn summary(&self, sim: &Simulator) -> Summary {
        Summary {
            end_time: sim.now().as_units_f64(),
            events: sim.executed(),
            net: self.stats.clone(),
            sender: self.sender.stats().clone(),
            receiver: self.receiver.stats().clone(),
            accepted: self.accepted.len() as u64,
            in_order: self.accepted == self.delivered,
        }
    }
}
