//! End-to-end scheduler tests.

use bf_blocks::{
    ContinuousPlant, DiscretePid, Generator, Junction, NoiseInjector, Sign, Sink, Sum,
};
use bf_core::NodeId;
use bf_graph::{Graph, GraphBuilder, GraphError};
use bf_sim::{SimError, SimOptions, Simulator, simulate};
use proptest::prelude::*;

fn plant() -> ContinuousPlant {
    ContinuousPlant::new(vec![2.0, 5.0], vec![1.0, 3.0, 2.0]).unwrap()
}

/// gen -> sum -> pid -> plant -> sum (negative feedback), plant -> sink
fn closed_loop() -> (Graph, NodeId, NodeId) {
    let mut b = GraphBuilder::new();
    let g = b.add_node("gen", Generator::new(2.0));
    let sum = b.add_node("sum", Sum::new());
    let pid = b.add_node("pid", DiscretePid::new(2.0, 1.0, 0.01, 0.01).unwrap());
    let p = b.add_node("plant", plant());
    let sink = b.add_node("sink", Sink::new());
    b.connect(g, sum)
        .connect(sum, pid)
        .connect(pid, p)
        .connect(p, sum)
        .connect(p, sink);
    b.set_sign(sum, p, Sign::Minus).unwrap();
    (b.build().unwrap(), p, sink)
}

#[test]
fn feedback_loop_through_plant_schedules_and_runs() {
    let (mut graph, p, sink) = closed_loop();
    let out = simulate(&mut graph, SimOptions::default()).unwrap();

    assert!(out.completed);
    assert_eq!(out.order.len(), 5);
    assert_eq!(out.history_of(p).len(), 100);
    let trace = graph.block(sink).unwrap().trace().unwrap();
    assert_eq!(trace.len(), 100);
    assert!(trace.iter().all(|(_, v)| v.is_finite()));
}

#[test]
fn sink_declared_first_still_reads_plant_output() {
    let mut b = GraphBuilder::new();
    let sink = b.add_node("sink", Sink::new());
    let g = b.add_node("gen", Generator::new(2.0));
    let sum = b.add_node("sum", Sum::new());
    let pid = b.add_node("pid", DiscretePid::new(2.0, 1.0, 0.01, 0.01).unwrap());
    let p = b.add_node("plant", plant());
    b.connect(g, sum)
        .connect(sum, pid)
        .connect(pid, p)
        .connect(p, sum)
        .connect(p, sink);
    b.set_sign(sum, p, Sign::Minus).unwrap();
    let mut graph = b.build().unwrap();

    let out = simulate(&mut graph, SimOptions::default()).unwrap();
    assert_eq!(out.order, vec![g, sum, pid, p, sink]);
    let trace = graph.block(sink).unwrap().trace().unwrap();
    assert_eq!(trace.len(), 100);
    assert_eq!(trace[99].0, 1.0);
}

#[test]
fn cycle_without_plant_is_fatal() {
    let mut b = GraphBuilder::new();
    let g = b.add_node("gen", Generator::new(1.0));
    let sum = b.add_node("sum", Sum::new());
    let pid = b.add_node("pid", DiscretePid::default());
    b.connect(g, sum).connect(sum, pid).connect(pid, sum);
    let mut graph = b.build().unwrap();

    match simulate(&mut graph, SimOptions::default()) {
        Err(SimError::CycleDetected { unscheduled }) => {
            assert_eq!(unscheduled, vec!["sum", "pid"]);
        }
        other => panic!("expected cycle error, got {other:?}"),
    }
}

#[test]
fn open_loop_end_to_end() {
    // Generator(2) -> Sum(+) -> PID -> Plant -> Sink
    let mut b = GraphBuilder::new();
    let g = b.add_node("gen", Generator::new(2.0));
    let sum = b.add_node("sum", Sum::new());
    let pid = b.add_node("pid", DiscretePid::new(2.0, 1.0, 0.01, 0.01).unwrap());
    let p = b.add_node("plant", plant());
    let sink = b.add_node("sink", Sink::new());
    b.connect(g, sum)
        .connect(sum, pid)
        .connect(pid, p)
        .connect(p, sink);
    let mut graph = b.build().unwrap();

    let out = simulate(
        &mut graph,
        SimOptions {
            ts: 0.01,
            steps: 100,
            seed: 0,
        },
    )
    .unwrap();
    assert!(out.completed);

    let trace = graph.block(sink).unwrap().trace().unwrap();
    assert_eq!(trace.len(), 100);
    assert!(trace.windows(2).all(|w| w[1].0 > w[0].0));
    assert_eq!(trace[0].0, 0.01);
    assert_eq!(trace[99].0, 1.0);
}

#[test]
fn validation_failure_is_surfaced_before_execution() {
    let mut b = GraphBuilder::new();
    b.add_node("p1", plant());
    b.add_node("p2", plant());
    let mut graph = b.build().unwrap();
    assert_eq!(
        simulate(&mut graph, SimOptions::default()),
        Err(SimError::Graph(GraphError::MultiplePlants { count: 2 }))
    );
}

#[test]
fn run_reinitializes_block_state() {
    let (mut graph, _, sink) = closed_loop();
    let mut sim = Simulator::new(SimOptions::default()).unwrap();
    let first = sim.run(&mut graph).unwrap();
    let first_trace = graph.block(sink).unwrap().trace().unwrap().to_vec();
    let second = sim.run(&mut graph).unwrap();
    let second_trace = graph.block(sink).unwrap().trace().unwrap().to_vec();
    assert_eq!(first, second);
    assert_eq!(first_trace, second_trace);
}

#[test]
fn resume_continues_plant_time() {
    let (mut graph, p, sink) = closed_loop();
    let mut sim = Simulator::new(SimOptions {
        steps: 50,
        ..SimOptions::default()
    })
    .unwrap();
    sim.run(&mut graph).unwrap();
    let out = sim.resume(&mut graph, 50).unwrap();

    assert_eq!(out.steps, 100);
    assert_eq!(out.history_of(p).len(), 100);
    let trace = graph.block(sink).unwrap().trace().unwrap();
    assert_eq!(trace.len(), 100);
    assert_eq!(trace[99].0, 1.0);
}

fn noisy(seed: u64) -> Vec<f64> {
    let mut b = GraphBuilder::new();
    let g = b.add_node("gen", Generator::new(0.0));
    let n = b.add_node("noise", NoiseInjector::new(0.0, 1.0).unwrap());
    let j = b.add_node("j", Junction);
    b.connect(g, n).connect(n, j);
    let mut graph = b.build().unwrap();
    let out = simulate(
        &mut graph,
        SimOptions {
            steps: 20,
            seed,
            ..SimOptions::default()
        },
    )
    .unwrap();
    out.history_of(j).iter().map(|s| s.value).collect()
}

proptest! {
    #[test]
    fn same_seed_reproduces_noise(seed in any::<u64>()) {
        prop_assert_eq!(noisy(seed), noisy(seed));
    }
}
