//! 仿真时间类型
//!
//! 仿真以“时间单位”计时（单程时延平均约 5 个单位，RTT 取 15 个单位）。
//! 内部用整数 tick 表示，避免浮点比较带来的事件顺序抖动。

/// 每个时间单位对应的 tick 数。
pub const TICKS_PER_UNIT: u64 = 1_000;

/// 仿真时间（tick，1 个时间单位 = `TICKS_PER_UNIT` tick）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SimTime(pub u64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0);

    pub fn from_units(units: u64) -> SimTime {
        SimTime(units.saturating_mul(TICKS_PER_UNIT))
    }

    /// 从浮点时间单位换算；负数与 NaN 归零，超范围饱和。
    pub fn from_units_f64(units: f64) -> SimTime {
        if units.is_nan() || units <= 0.0 {
            return SimTime::ZERO;
        }
        let ticks = units * TICKS_PER_UNIT as f64;
        if ticks >= u64::MAX as f64 {
            SimTime(u64::MAX)
        } else {
            SimTime(ticks.round() as u64)
        }
    }

    pub fn as_units_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_UNIT as f64
    }

    pub fn saturating_add(self, other: SimTime) -> SimTime {
        SimTime(self.0.saturating_add(other.0))
    }
}
