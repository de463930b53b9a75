use crate::sim::{Event, SimTime, Simulator, World};
use std::any::Any;

#[derive(Default)]
struct LogWorld {
    log: Vec<(u32, SimTime)>,
    ticks: usize,
}

impl World for LogWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, _sim: &mut Simulator) {
        self.ticks += 1;
    }
}

fn log_world(world: &mut dyn World) -> &mut LogWorld {
    world
        .as_any_mut()
        .downcast_mut::<LogWorld>()
        .expect("world must be LogWorld")
}

struct Mark(u32);

impl Event for Mark {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        log_world(world).log.push((self.0, sim.now()));
    }
}

/// 执行时再调度一个事件，`at` 为绝对时间
struct MarkThen {
    id: u32,
    next_id: u32,
    at: SimTime,
}

impl Event for MarkThen {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        log_world(world).log.push((self.id, sim.now()));
        sim.schedule(self.at, Mark(self.next_id));
    }
}

fn ids(world: &LogWorld) -> Vec<u32> {
    world.log.iter().map(|(id, _)| *id).collect()
}

#[test]
fn events_run_in_time_order_then_insertion_order() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime(10), Mark(1));
    sim.schedule(SimTime(5), Mark(2));
    sim.schedule(SimTime(10), Mark(3));
    sim.schedule(SimTime(10), Mark(4));
    assert_eq!(sim.pending(), 4);

    let mut world = LogWorld::default();
    sim.run(&mut world);

    assert_eq!(ids(&world), vec![2, 1, 3, 4]);
    assert_eq!(world.ticks, 4);
    assert_eq!(sim.executed(), 4);
    assert_eq!(sim.pending(), 0);
    assert_eq!(sim.now(), SimTime(10));
}

#[test]
fn event_scheduled_in_the_past_runs_at_current_time() {
    let mut sim = Simulator::default();
    sim.schedule(
        SimTime(20),
        MarkThen {
            id: 1,
            next_id: 2,
            at: SimTime(3),
        },
    );

    let mut world = LogWorld::default();
    sim.run(&mut world);

    assert_eq!(world.log, vec![(1, SimTime(20)), (2, SimTime(20))]);
}

#[test]
fn schedule_in_is_relative_to_now() {
    let mut sim = Simulator::default();
    let mut world = LogWorld::default();

    sim.run_until(SimTime(100), &mut world);
    sim.schedule_in(SimTime(7), Mark(9));
    sim.run(&mut world);

    assert_eq!(world.log, vec![(9, SimTime(107))]);
}

#[test]
fn run_until_stops_before_later_events_and_resumes() {
    let mut sim = Simulator::default();
    sim.schedule(SimTime::ZERO, Mark(1));
    sim.schedule(SimTime(5), Mark(2));
    sim.schedule(SimTime(10), Mark(3));

    let mut world = LogWorld::default();
    sim.run_until(SimTime(5), &mut world);

    assert_eq!(ids(&world), vec![1, 2]);
    assert_eq!(sim.now(), SimTime(5));
    assert_eq!(sim.pending(), 1);

    sim.run(&mut world);
    assert_eq!(ids(&world), vec![1, 2, 3]);
    assert_eq!(world.ticks, 3);
}

#[test]
fn run_until_advances_time_even_if_there_are_no_events() {
    let mut sim = Simulator::default();
    let mut world = LogWorld::default();

    sim.run_until(SimTime(7), &mut world);
    assert_eq!(sim.now(), SimTime(7));
    assert_eq!(world.ticks, 0);
}
