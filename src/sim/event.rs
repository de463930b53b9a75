//! 事件 trait
//!
//! 定义仿真事件接口。

use super::simulator::Simulator;
use super::world::World;

/// 事件：可被调度执行。使用 `self: Box<Self>` 以便执行时取得事件的所有权
/// （例如把携带的 packet 直接交给协议层）。
pub trait Event: Send + 'static {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);

    /// 事件名称，仅用于日志。
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
