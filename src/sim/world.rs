//! 世界 trait
//!
//! 仿真世界持有事件要操作的全部状态（这里是网络模拟器和两端协议实体）。

use super::simulator::Simulator;
use std::any::Any;

/// 仿真世界：由业务层实现。
pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每个事件执行完毕后调用一次，可用于检查不变量。
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}
