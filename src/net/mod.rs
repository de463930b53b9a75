//! 网络模拟模块
//!
//! 协议核心的外部协作者：不可靠但保序的单向信道、每个实体一个定时器、
//! 应用层消息源与交付端。

mod channel;
mod config;
mod events;
mod net_world;
mod network;
mod network_viz;
mod proto_bridge;
mod stats;

pub use channel::{CORRUPT_FIELD_VALUE, ChannelModel, Corruption, Fate, LossyChannel, ScriptedChannel};
pub use config::{ConfigError, EmulatorConfig};
pub use events::{AppSubmit, FromLayer3, FromLayer5, TimerInterrupt};
pub use net_world::NetWorld;
pub use network::Network;
pub use stats::{Stats, Summary};
