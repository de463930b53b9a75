//! Helpers for driving protocol endpoints from the simulation world.

use crate::proto::{Endpoint, Entity, NetApi, Packet, Payload};
use crate::sim::{SimTime, Simulator};

use super::Network;

/// [`NetApi`] view of the emulator handed to an endpoint while it runs.
pub(crate) struct NetCtx<'a> {
    net: &'a mut Network,
    sim: &'a mut Simulator,
}

impl NetApi for NetCtx<'_> {
    fn now(&self) -> SimTime {
        self.sim.now()
    }

    fn to_layer3(&mut self, from: Entity, pkt: Packet) {
        self.net.to_layer3(from, pkt, self.sim)
    }

    fn to_layer5(&mut self, at: Entity, payload: Payload) {
        self.net.to_layer5(at, payload, self.sim.now())
    }

    fn start_timer(&mut self, entity: Entity, increment: SimTime) {
        self.net.start_timer(entity, increment, self.sim)
    }

    fn stop_timer(&mut self, entity: Entity) {
        self.net.stop_timer(entity, self.sim.now())
    }
}

/// Run `f` against the endpoint for `entity`.
///
/// The endpoint is moved out of the network for the duration of the call so
/// that it and the network can be borrowed mutably at the same time.
pub(crate) fn with_endpoint<F, R>(net: &mut Network, sim: &mut Simulator, entity: Entity, f: F) -> R
where
    F: FnOnce(&mut dyn Endpoint, &mut dyn NetApi) -> R,
{
    match entity {
        Entity::A => {
            let mut sender = std::mem::take(&mut net.sender);
            let result = f(&mut sender, &mut NetCtx { net: &mut *net, sim });
            net.sender = sender;
            result
        }
        Entity::B => {
            let mut receiver = std::mem::take(&mut net.receiver);
            let result = f(&mut receiver, &mut NetCtx { net: &mut *net, sim });
            net.receiver = receiver;
            result
        }
    }
}
