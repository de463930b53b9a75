//! 数据包与应用消息
//!
//! 线上格式固定：`seqnum | acknum | checksum | payload[20]`。
//! 三个头部字段保留为原始 `i32`，因为信道可以把它们改写成任意值；
//! 协议状态则只使用 [`SeqBit`]。

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::checksum;

/// 载荷长度（字节）
pub const PAYLOAD_LEN: usize = 20;

/// 头部字段未使用时的填充值（数据包的 acknum）
pub const NOT_IN_USE: i32 = -1;

/// ACK 包载荷的填充字节
pub const ACK_FILLER: u8 = b'0';

/// 编码后的固定长度（字节）
pub const WIRE_LEN: usize = 12 + PAYLOAD_LEN;

pub type Payload = [u8; PAYLOAD_LEN];

/// 一比特序列号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeqBit {
    #[default]
    Zero,
    One,
}

impl SeqBit {
    pub fn flip(self) -> SeqBit {
        match self {
            SeqBit::Zero => SeqBit::One,
            SeqBit::One => SeqBit::Zero,
        }
    }

    /// 写入头部字段时的整数值
    pub fn wire(self) -> i32 {
        match self {
            SeqBit::Zero => 0,
            SeqBit::One => 1,
        }
    }

    pub fn from_wire(v: i32) -> Option<SeqBit> {
        match v {
            0 => Some(SeqBit::Zero),
            1 => Some(SeqBit::One),
            _ => None,
        }
    }
}

/// 应用层消息（layer 5 <-> layer 4）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msg {
    pub data: Payload,
}

impl Msg {
    pub fn new(data: Payload) -> Self {
        Self { data }
    }

    /// 用同一个字节填满载荷
    pub fn filled(byte: u8) -> Self {
        Self {
            data: [byte; PAYLOAD_LEN],
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PacketDecodeError {
    #[error("packet must be {expected} bytes, got {got}")]
    Length { expected: usize, got: usize },
}

/// 信道上传输的数据包（layer 4 <-> layer 3）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub seqnum: i32,
    pub acknum: i32,
    pub checksum: i32,
    pub payload: Payload,
}

impl Packet {
    /// 构造数据包：acknum 不使用，校验和按组装好的字段计算。
    pub fn data(seq: SeqBit, payload: Payload) -> Self {
        Self::sealed(seq.wire(), NOT_IN_USE, payload)
    }

    /// 构造 ACK 包：载荷用 [`ACK_FILLER`] 填充。
    pub fn ack(seq: SeqBit, ack: SeqBit) -> Self {
        Self::sealed(seq.wire(), ack.wire(), [ACK_FILLER; PAYLOAD_LEN])
    }

    fn sealed(seqnum: i32, acknum: i32, payload: Payload) -> Self {
        let mut pkt = Packet {
            seqnum,
            acknum,
            checksum: 0,
            payload,
        };
        pkt.checksum = checksum::compute(&pkt);
        pkt
    }

    pub fn seq_bit(&self) -> Option<SeqBit> {
        SeqBit::from_wire(self.seqnum)
    }

    pub fn ack_bit(&self) -> Option<SeqBit> {
        SeqBit::from_wire(self.acknum)
    }

    pub fn is_corrupted(&self) -> bool {
        checksum::is_corrupted(self)
    }

    pub fn encode(&self) -> [u8; WIRE_LEN] {
        let mut buf = [0u8; WIRE_LEN];
        buf[0..4].copy_from_slice(&self.seqnum.to_be_bytes());
        buf[4..8].copy_from_slice(&self.acknum.to_be_bytes());
        buf[8..12].copy_from_slice(&self.checksum.to_be_bytes());
        buf[12..].copy_from_slice(&self.payload);
        buf
    }

    /// 解码不校验 checksum；是否损坏由调用方用 [`Packet::is_corrupted`] 判断。
    pub fn decode(buf: &[u8]) -> Result<Packet, PacketDecodeError> {
        let buf: &[u8; WIRE_LEN] = buf.try_into().map_err(|_| PacketDecodeError::Length {
            expected: WIRE_LEN,
            got: buf.len(),
        })?;
        let field = |at: usize| i32::from_be_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]);
        let mut payload = [0u8; PAYLOAD_LEN];
        payload.copy_from_slice(&buf[12..]);
        Ok(Packet {
            seqnum: field(0),
            acknum: field(4),
            checksum: field(8),
            payload,
        })
    }
}
