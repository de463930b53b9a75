//! 信道故障模型
//!
//! 信道按发送顺序交付，但每个包可能被丢弃或损坏。故障的决定与
//! 时延/调度分开：[`ChannelModel`] 只回答“这个包的命运是什么”。

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::proto::{Entity, Packet};

/// 损坏时写入头部字段的值
pub const CORRUPT_FIELD_VALUE: i32 = 999_999;

/// 损坏方式：改写包中的某一个字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corruption {
    /// 载荷首字节改写为 `'Z'`
    Payload,
    SeqNum,
    AckNum,
    /// 翻转校验和的最低位
    Checksum,
}

impl Corruption {
    pub fn apply(self, pkt: &mut Packet) {
        match self {
            Corruption::Payload => pkt.payload[0] = b'Z',
            Corruption::SeqNum => pkt.seqnum = CORRUPT_FIELD_VALUE,
            Corruption::AckNum => pkt.acknum = CORRUPT_FIELD_VALUE,
            Corruption::Checksum => pkt.checksum ^= 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    Deliver,
    Lose,
    Corrupt(Corruption),
}

/// 信道故障模型抽象
pub trait ChannelModel: std::fmt::Debug {
    /// 决定 `from` 发出的这个包的命运
    fn fate(&mut self, from: Entity, pkt: &Packet) -> Fate;
}

/// 随机丢包/损坏
///
/// 先以 `loss_prob` 丢弃；未丢弃的再以 `corrupt_prob` 损坏，
/// 损坏方式：载荷 75%，seqnum 12.5%，acknum 12.5%。
#[derive(Debug)]
pub struct LossyChannel {
    loss_prob: f64,
    corrupt_prob: f64,
    rng: StdRng,
}

impl LossyChannel {
    /// 概率需在 [0, 1] 内（由 `EmulatorConfig::validate` 保证）。
    pub fn new(loss_prob: f64, corrupt_prob: f64, seed: u64) -> Self {
        Self {
            loss_prob,
            corrupt_prob,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ChannelModel for LossyChannel {
    fn fate(&mut self, _from: Entity, _pkt: &Packet) -> Fate {
        if self.rng.gen_bool(self.loss_prob) {
            return Fate::Lose;
        }
        if !self.rng.gen_bool(self.corrupt_prob) {
            return Fate::Deliver;
        }
        let x: f64 = self.rng.gen_range(0.0..1.0);
        let how = if x < 0.75 {
            Corruption::Payload
        } else if x < 0.875 {
            Corruption::SeqNum
        } else {
            Corruption::AckNum
        };
        Fate::Corrupt(how)
    }
}

/// 按脚本决定命运，每个方向一个队列；队列耗尽后一律正常交付。
#[derive(Debug, Default)]
pub struct ScriptedChannel {
    a_to_b: VecDeque<Fate>,
    b_to_a: VecDeque<Fate>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加 A -> B（数据）方向的下一个命运
    pub fn data(mut self, fate: Fate) -> Self {
        self.a_to_b.push_back(fate);
        self
    }

    /// 追加 B -> A（ACK）方向的下一个命运
    pub fn ack(mut self, fate: Fate) -> Self {
        self.b_to_a.push_back(fate);
        self
    }
}

impl ChannelModel for ScriptedChannel {
    fn fate(&mut self, from: Entity, _pkt: &Packet) -> Fate {
        let q = match from {
            Entity::A => &mut self.a_to_b,
            Entity::B => &mut self.b_to_a,
        };
        q.pop_front().unwrap_or(Fate::Deliver)
    }
}
