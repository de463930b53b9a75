//! Network-facing API consumed by the protocol endpoints.
//!
//! The endpoints never see the emulator directly; everything they can do to
//! the outside world goes through [`NetApi`].

use serde::{Deserialize, Serialize};

use crate::sim::SimTime;

use super::packet::{Packet, Payload};

/// The two protocol entities. `A` sends data, `B` only acknowledges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Entity {
    A,
    B,
}

impl Entity {
    pub fn index(self) -> usize {
        match self {
            Entity::A => 0,
            Entity::B => 1,
        }
    }

    /// The entity on the other end of the channel.
    pub fn peer(self) -> Entity {
        match self {
            Entity::A => Entity::B,
            Entity::B => Entity::A,
        }
    }
}

/// Services provided by the network emulator.
pub trait NetApi {
    fn now(&self) -> SimTime;

    /// Hand a packet to the unreliable channel. Loss/corruption is decided
    /// by the emulator and is invisible to the caller.
    fn to_layer3(&mut self, from: Entity, pkt: Packet);

    /// Fire-and-forget delivery of an accepted payload to the application.
    fn to_layer5(&mut self, at: Entity, payload: Payload);

    /// One timer per entity; starting a running timer is a caller bug.
    fn start_timer(&mut self, entity: Entity, increment: SimTime);

    fn stop_timer(&mut self, entity: Entity);
}
