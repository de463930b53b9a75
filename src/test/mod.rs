use crate::proto::{Entity, NetApi, Packet, Payload};
use crate::sim::SimTime;

mod packet;
mod scenarios;
mod simulator;

/// 记录协议实体所有外部调用的假网络，用于直接驱动单个状态机。
#[derive(Debug, Default)]
struct RecordingNet {
    now: SimTime,
    sent: Vec<(Entity, Packet)>,
    delivered: Vec<(Entity, Payload)>,
    /// 正在运行的定时器（实体，时长）
    timer: Option<(Entity, SimTime)>,
    timer_starts: u32,
    timer_stops: u32,
    timer_misuse: u32,
}

impl RecordingNet {
    /// 模拟定时器到期：返回是否确实有定时器在运行
    fn expire_timer(&mut self) -> bool {
        self.timer.take().is_some()
    }

    fn last_sent(&self) -> Packet {
        self.sent.last().expect("nothing sent").1
    }
}

impl NetApi for RecordingNet {
    fn now(&self) -> SimTime {
        self.now
    }

    fn to_layer3(&mut self, from: Entity, pkt: Packet) {
        self.sent.push((from, pkt));
    }

    fn to_layer5(&mut self, at: Entity, payload: Payload) {
        self.delivered.push((at, payload));
    }

    fn start_timer(&mut self, entity: Entity, increment: SimTime) {
        if self.timer.is_some() {
            self.timer_misuse += 1;
            return;
        }
        self.timer = Some((entity, increment));
        self.timer_starts += 1;
    }

    fn stop_timer(&mut self, _entity: Entity) {
        if self.timer.take().is_none() {
            self.timer_misuse += 1;
            return;
        }
        self.timer_stops += 1;
    }
}
