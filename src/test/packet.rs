use crate::proto::{ACK_FILLER, Msg, NOT_IN_USE, PAYLOAD_LEN, Packet, PacketDecodeError, SeqBit, WIRE_LEN};

#[test]
fn seq_bit_alternates_and_maps_to_wire_values() {
    assert_eq!(SeqBit::default(), SeqBit::Zero);
    assert_eq!(SeqBit::Zero.flip(), SeqBit::One);
    assert_eq!(SeqBit::One.flip().flip(), SeqBit::One);
    assert_eq!(SeqBit::Zero.wire(), 0);
    assert_eq!(SeqBit::One.wire(), 1);
    assert_eq!(SeqBit::from_wire(1), Some(SeqBit::One));
    assert_eq!(SeqBit::from_wire(NOT_IN_USE), None);
    assert_eq!(SeqBit::from_wire(999_999), None);
}

#[test]
fn data_packet_leaves_acknum_unused() {
    let pkt = Packet::data(SeqBit::One, Msg::filled(b'A').data);
    assert_eq!(pkt.seqnum, 1);
    assert_eq!(pkt.acknum, NOT_IN_USE);
    assert_eq!(pkt.ack_bit(), None);
    assert_eq!(pkt.seq_bit(), Some(SeqBit::One));
    assert_eq!(pkt.payload, [b'A'; PAYLOAD_LEN]);
    assert!(!pkt.is_corrupted());
}

#[test]
fn ack_packet_carries_filler_payload() {
    let pkt = Packet::ack(SeqBit::One, SeqBit::Zero);
    assert_eq!(pkt.seqnum, 1);
    assert_eq!(pkt.acknum, 0);
    assert!(pkt.payload.iter().all(|&b| b == ACK_FILLER));
    assert!(!pkt.is_corrupted());
}

#[test]
fn encode_uses_fixed_big_endian_layout() {
    let mut data = [b'x'; PAYLOAD_LEN];
    data[0] = b'h';
    let pkt = Packet::data(SeqBit::One, data);
    let buf = pkt.encode();

    assert_eq!(buf.len(), WIRE_LEN);
    assert_eq!(&buf[0..4], &[0, 0, 0, 1]);
    assert_eq!(&buf[4..8], &[0xff, 0xff, 0xff, 0xff]);
    assert_eq!(&buf[8..12], &pkt.checksum.to_be_bytes());
    assert_eq!(buf[12], b'h');
    assert_eq!(Packet::decode(&buf), Ok(pkt));
}

#[test]
fn decode_keeps_corrupted_fields_for_the_validator() {
    let pkt = Packet::ack(SeqBit::Zero, SeqBit::One);
    let mut buf = pkt.encode();
    buf[12] = b'Z';

    let decoded = Packet::decode(&buf).expect("decode");
    assert_eq!(decoded.payload[0], b'Z');
    assert!(decoded.is_corrupted());
}

#[test]
fn decode_rejects_wrong_length() {
    let buf = [0u8; WIRE_LEN - 1];
    assert_eq!(
        Packet::decode(&buf),
        Err(PacketDecodeError::Length {
            expected: WIRE_LEN,
            got: WIRE_LEN - 1
        })
    );
    let err = Packet::decode(&[]).expect_err("empty buffer");
    assert_eq!(err.to_string(), format!("packet must be {WIRE_LEN} bytes, got 0"));
}
