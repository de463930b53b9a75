//! 校验和
//!
//! 加法校验和：`seqnum + acknum + Σ payload`。发送方与接收方共用同一实现。
//! 信道的损坏方式是改写某个字段（载荷首字节写成 `'Z'`、序号写成 999999 等），
//! 任何单字段改写都会改变和值，因此足以检测。

use super::packet::Packet;

/// 计算 packet 的校验和（不读取 `checksum` 字段本身）。
pub fn compute(pkt: &Packet) -> i32 {
    pkt.payload
        .iter()
        .fold(pkt.seqnum.wrapping_add(pkt.acknum), |sum, &b| {
            sum.wrapping_add(i32::from(b))
        })
}

/// 重新计算并与收到的 `checksum` 比较；不一致即视为损坏。
pub fn is_corrupted(pkt: &Packet) -> bool {
    pkt.checksum != compute(pkt)
}
