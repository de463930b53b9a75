//! Visualization hooks for the network.

use crate::sim::SimTime;
use crate::viz::{VizEvent, VizEventKind};

use super::Network;

impl Network {
    pub(crate) fn viz_push(&mut self, t: SimTime, kind: VizEventKind) {
        if let Some(v) = &mut self.viz {
            v.push(VizEvent {
                t: t.as_units_f64(),
                kind,
            });
        }
    }

    /// Record the run parameters as the first event.
    pub fn emit_viz_meta(&mut self) {
        if self.viz.is_none() {
            return;
        }
        let kind = VizEventKind::Meta {
            messages: self.cfg.messages,
            loss_prob: self.cfg.loss_prob,
            corrupt_prob: self.cfg.corrupt_prob,
            rtt: self.cfg.rtt,
            seed: self.cfg.seed,
        };
        self.viz_push(SimTime::ZERO, kind);
    }
}
