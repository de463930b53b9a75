//! 端到端场景：脚本信道 + 固定单程时延 5、RTT 15（无伪超时）。

use crate::net::{AppSubmit, Corruption, EmulatorConfig, Fate, NetWorld, Network, ScriptedChannel};
use crate::proto::{Entity, Msg, SenderState, SeqBit};
use crate::sim::{SimTime, Simulator};
use crate::viz::{VizEventKind, VizLogger};

fn fixed_delay_cfg(delay: f64) -> EmulatorConfig {
    EmulatorConfig {
        messages: 0,
        min_delay: delay,
        max_delay: delay,
        rtt: 15.0,
        ..EmulatorConfig::default()
    }
}

/// `msgs`：(提交时间, 填充字节)
fn run_script(channel: ScriptedChannel, delay: f64, msgs: &[(u64, u8)]) -> NetWorld {
    let mut sim = Simulator::default();
    let mut world = NetWorld::new(Network::new(fixed_delay_cfg(delay), Box::new(channel)));
    world.net.viz = Some(VizLogger::default());
    for &(t, byte) in msgs {
        sim.schedule(
            SimTime::from_units(t),
            AppSubmit {
                msg: Msg::filled(byte),
            },
        );
    }
    world.run(&mut sim);

    let net = &world.net;
    assert_eq!(net.stats.invariant_violations, 0);
    assert_eq!(net.stats.timer_misuse, 0);
    assert_eq!(net.accepted, net.delivered, "delivery must be exactly-once and in order");
    assert_eq!(net.sender.state(), SenderState::Idle);
    assert_eq!(net.sender.next_seq(), net.receiver.expected_seq());
    world
}

/// A 发出的数据包：(时间, seqnum, checksum)
fn data_sends(world: &NetWorld) -> Vec<(f64, i32, i32)> {
    let events = &world.net.viz.as_ref().expect("viz enabled").events;
    events
        .iter()
        .filter_map(|ev| match ev.kind {
            VizEventKind::Send {
                from: Entity::A,
                seqnum,
                checksum,
                ..
            } => Some((ev.t, seqnum, checksum)),
            _ => None,
        })
        .collect()
}

fn delivered_bytes(world: &NetWorld) -> Vec<u8> {
    world.net.delivered.iter().map(|p| p[0]).collect()
}

#[test]
fn clean_channel_delivers_single_message() {
    let world = run_script(ScriptedChannel::new(), 5.0, &[(0, b'A')]);

    assert_eq!(world.net.delivered, vec![Msg::filled(b'A').data]);
    assert_eq!(world.net.receiver.expected_seq(), SeqBit::One);
    assert_eq!(world.net.sender.next_seq(), SeqBit::One);
    assert_eq!(world.net.stats.to_layer3, 2);
    assert_eq!(world.net.stats.timeouts, 0);
    assert_eq!(world.net.sender.stats().new_acks, 1);
}

#[test]
fn lost_data_packet_is_retransmitted_unchanged() {
    let channel = ScriptedChannel::new().data(Fate::Lose);
    let world = run_script(channel, 5.0, &[(0, b'A')]);

    let sends = data_sends(&world);
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0].0, 0.0);
    assert_eq!(sends[1].0, 15.0);
    assert_eq!((sends[0].1, sends[0].2), (sends[1].1, sends[1].2));
    assert_eq!(sends[1].1, 0);

    assert_eq!(delivered_bytes(&world), b"A".to_vec());
    assert_eq!(world.net.sender.stats().packets_resent, 1);
}

#[test]
fn lost_ack_leads_to_duplicate_that_is_not_redelivered() {
    let channel = ScriptedChannel::new().ack(Fate::Lose);
    let world = run_script(channel, 5.0, &[(0, b'A')]);

    assert_eq!(data_sends(&world).len(), 2);
    assert_eq!(delivered_bytes(&world), b"A".to_vec());
    assert_eq!(world.net.receiver.stats().duplicates, 1);
    assert_eq!(world.net.receiver.stats().acks_sent, 2);
}

#[test]
fn corrupted_ack_for_second_message_does_not_duplicate_delivery() {
    let channel = ScriptedChannel::new()
        .ack(Fate::Deliver)
        .ack(Fate::Corrupt(Corruption::AckNum));
    let world = run_script(channel, 5.0, &[(0, b'A'), (50, b'B')]);

    let seqs: Vec<i32> = data_sends(&world).iter().map(|s| s.1).collect();
    assert_eq!(seqs, vec![0, 1, 1]);
    assert_eq!(delivered_bytes(&world), b"AB".to_vec());
    assert_eq!(world.net.receiver.stats().duplicates, 1);
    assert_eq!(world.net.sender.stats().corrupted_acks, 1);
}

#[test]
fn retransmission_after_corrupted_data_is_a_normal_accept() {
    let channel = ScriptedChannel::new()
        .data(Fate::Deliver)
        .data(Fate::Corrupt(Corruption::Payload));
    let world = run_script(channel, 5.0, &[(0, b'A'), (50, b'B')]);

    let seqs: Vec<i32> = data_sends(&world).iter().map(|s| s.1).collect();
    assert_eq!(seqs, vec![0, 1, 1]);
    assert_eq!(delivered_bytes(&world), b"AB".to_vec());
    assert_eq!(world.net.receiver.stats().corrupted, 1);
    assert_eq!(world.net.receiver.stats().duplicates, 0);
    assert_eq!(world.net.receiver.stats().packets_received, 2);
}

#[test]
fn two_corrupted_acks_cost_two_retransmissions() {
    let channel = ScriptedChannel::new()
        .ack(Fate::Corrupt(Corruption::Payload))
        .ack(Fate::Corrupt(Corruption::Checksum));
    let world = run_script(channel, 5.0, &[(0, b'A')]);

    let sends = data_sends(&world);
    assert_eq!(sends.len(), 3);
    assert!(sends.iter().all(|s| (s.1, s.2) == (sends[0].1, sends[0].2)));
    assert_eq!(delivered_bytes(&world), b"A".to_vec());
    assert_eq!(world.net.sender.stats().packets_resent, 2);
    assert_eq!(world.net.sender.stats().corrupted_acks, 2);
    assert_eq!(world.net.stats.timeouts, 2);
}

#[test]
fn message_submitted_while_waiting_is_rejected() {
    let channel = ScriptedChannel::new().data(Fate::Lose);
    let world = run_script(channel, 5.0, &[(0, b'A'), (3, b'B'), (40, b'C')]);

    assert_eq!(world.net.sender.stats().window_full, 1);
    assert_eq!(delivered_bytes(&world), b"AC".to_vec());
}

#[test]
fn spurious_timeout_only_produces_ignored_duplicate_acks() {
    // 单程时延 10，往返 20 > RTT 15：第一次超时必然是伪超时
    let world = run_script(ScriptedChannel::new(), 10.0, &[(0, b'a'), (22, b'b')]);

    assert_eq!(delivered_bytes(&world), b"ab".to_vec());
    assert_eq!(world.net.sender.stats().packets_resent, 2);
    assert_eq!(world.net.sender.stats().duplicate_acks, 2);
    assert_eq!(world.net.sender.stats().new_acks, 2);
    assert_eq!(world.net.receiver.stats().duplicates, 2);
}
