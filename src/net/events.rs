//! 模拟器事件
//!
//! 驱动协议实体的事件：应用层消息到达 A、包从信道到达、定时器超时。

use tracing::{debug, trace};

use super::net_world::net_world;
use super::network::Network;
use super::proto_bridge::with_endpoint;
use crate::proto::{Entity, Msg, Packet};
use crate::sim::{Event, Simulator, World};

/// 事件：A 的应用层产生一条新消息
#[derive(Debug)]
pub struct FromLayer5;

impl Event for FromLayer5 {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let net = &mut net_world(world).net;
        let Some(msg) = net.next_message() else {
            return;
        };
        if net.has_more_messages() {
            let gap = net.message_gap();
            sim.schedule_in(gap, FromLayer5);
        }

        submit_to_sender(net, sim, msg);
    }
}

/// 事件：把一条指定的消息交给 A（脚本/测试驱动，不经过消息源）
#[derive(Debug)]
pub struct AppSubmit {
    pub msg: Msg,
}

impl Event for AppSubmit {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let net = &mut net_world(world).net;
        submit_to_sender(net, sim, self.msg);
    }
}

fn submit_to_sender(net: &mut Network, sim: &mut Simulator, msg: Msg) {
    let outcome = with_endpoint(net, sim, Entity::A, |ep, api| ep.on_app_message(msg, api));
    debug!(outcome = ?outcome, "应用层消息已提交");
    net.record_submit(sim.now(), msg, outcome);
}

/// 事件：包从信道到达 `to`
#[derive(Debug)]
pub struct FromLayer3 {
    pub to: Entity,
    pub pkt: Packet,
}

impl Event for FromLayer3 {
    #[tracing::instrument(skip(self, sim, world), fields(to = ?self.to, seqnum = self.pkt.seqnum, acknum = self.pkt.acknum))]
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let FromLayer3 { to, pkt } = *self;
        trace!(now = ?sim.now(), "📨 数据包到达");

        let net = &mut net_world(world).net;
        net.note_arrival(to, &pkt, sim.now());
        with_endpoint(net, sim, to, |ep, api| ep.on_packet(pkt, api));
    }
}

/// 事件：`entity` 的定时器到期。`generation` 不匹配说明定时器已被停止或重启。
#[derive(Debug)]
pub struct TimerInterrupt {
    pub entity: Entity,
    pub generation: u64,
}

impl Event for TimerInterrupt {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let TimerInterrupt { entity, generation } = *self;
        let net = &mut net_world(world).net;
        if !net.fire_timer(entity, generation, sim.now()) {
            return;
        }
        debug!(entity = ?entity, now = ?sim.now(), "⏰ 定时器超时");
        with_endpoint(net, sim, entity, |ep, api| ep.on_timer(api));
    }
}
