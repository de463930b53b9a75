//! 网络世界实现
//!
//! 仿真世界（World）持有网络模拟器；每个事件之后检查协议不变量。

use super::network::Network;
use crate::sim::{SimTime, Simulator, World};
use std::any::Any;

pub struct NetWorld {
    pub net: Network,
}

impl NetWorld {
    pub fn new(net: Network) -> Self {
        Self { net }
    }

    /// 初始化并运行到事件队列为空，或到配置的截止时间。
    pub fn run(&mut self, sim: &mut Simulator) {
        self.net.start(sim);
        match self.net.cfg.until {
            Some(until) => sim.run_until(SimTime::from_units_f64(until), self),
            None => sim.run(self),
        }
    }
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, sim: &mut Simulator) {
        self.net.check_invariants(sim.now());
    }
}

pub(crate) fn net_world(world: &mut dyn World) -> &mut NetWorld {
    world
        .as_any_mut()
        .downcast_mut::<NetWorld>()
        .expect("world must be NetWorld")
}
