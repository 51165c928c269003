//! Mason's gain formula scenarios.

use bf_blocks::{ContinuousPlant, DigitalFilter, Generator, Junction, Sign, Sink, Sum};
use bf_core::{NodeId, Tolerances};
use bf_graph::GraphBuilder;
use bf_lti::TransferFunction;
use bf_reduce::{ReduceError, reduce, transfer_function};
use proptest::prelude::*;

fn constant(k: f64) -> DigitalFilter {
    DigitalFilter::new(vec![k], vec![1.0]).unwrap()
}

#[test]
fn unity_chain_has_trivial_determinant() {
    let mut b = GraphBuilder::new();
    let a = b.add_node("a", Junction);
    let m = b.add_node("m", Junction);
    let c = b.add_node("c", Junction);
    b.connect(a, m).connect(m, c);
    let graph = b.build().unwrap();

    let r = reduce(&graph, a, c).unwrap();
    assert_eq!(r.paths.len(), 1);
    assert!(r.loops.is_empty());
    assert!(r.delta.is_equivalent(&TransferFunction::unity(), Tolerances::default()));
    assert!(
        r.transfer_function
            .is_equivalent(&r.paths[0].gain, Tolerances::default())
    );
    assert_eq!(r.transfer_function.eval(0.0), 1.0);
}

#[test]
fn two_node_loop() {
    // F -> G -> F with start F, end G: T = F / (1 - FG)
    let mut b = GraphBuilder::new();
    let f = b.add_node("F", constant(2.0));
    let g = b.add_node("G", constant(0.25));
    b.connect(f, g).connect(g, f);
    let graph = b.build().unwrap();

    let r = reduce(&graph, f, g).unwrap();
    assert_eq!(r.fusions, 0);
    assert_eq!(r.loops.len(), 1);
    assert!((r.loops[0].gain.eval(0.0) - 0.5).abs() < 1e-12);
    assert!((r.delta.eval(0.0) - 0.5).abs() < 1e-12);
    assert!(
        r.transfer_function
            .is_equivalent(&TransferFunction::gain(4.0), Tolerances::default())
    );
}

#[test]
fn negative_feedback_loop_with_plant() {
    // gen -> sum -> K -> plant -> out, plant -(−)-> sum
    // T(gen -> out) = K P / (1 + K P)
    let mut b = GraphBuilder::new();
    let g = b.add_node("gen", Generator::new(1.0));
    let s = b.add_node("sum", Sum::new());
    let k = b.add_node("K", constant(10.0));
    let p = b.add_node(
        "plant",
        ContinuousPlant::new(vec![1.0], vec![1.0, 1.0]).unwrap(),
    );
    let out = b.add_node("out", Sink::new());
    b.connect(g, s)
        .connect(s, k)
        .connect(k, p)
        .connect(p, s)
        .connect(p, out);
    b.set_sign(s, p, Sign::Minus).unwrap();
    let graph = b.build().unwrap();

    let r = reduce(&graph, g, out).unwrap();
    // K and plant fuse: K has one output and plant one input.
    assert_eq!(r.fusions, 1);
    assert_eq!(r.loops.len(), 1);
    assert_eq!(r.paths.len(), 1);

    // 10/(s+1) / (1 + 10/(s+1)) = 10 / (s + 11)
    let expected = TransferFunction::new(vec![10.0], vec![1.0, 11.0]).unwrap();
    assert!(
        r.transfer_function
            .is_equivalent(&expected, Tolerances::loose())
    );
    assert!((r.transfer_function.dc_gain() - 10.0 / 11.0).abs() < 1e-9);
    assert!(r.to_string().contains("loops: 1"));
}

#[test]
fn disconnected_end_gives_zero() {
    let mut b = GraphBuilder::new();
    let a = b.add_node("a", Junction);
    let c = b.add_node("c", Junction);
    let graph = b.build().unwrap();
    let tf = transfer_function(&graph, a, c).unwrap();
    assert_eq!(tf.eval(1.0), 0.0);
}

#[test]
fn unknown_start() {
    let mut b = GraphBuilder::new();
    let a = b.add_node("a", Junction);
    let graph = b.build().unwrap();
    let ghost = NodeId::from_index(7);
    assert_eq!(
        reduce(&graph, ghost, a),
        Err(ReduceError::UnknownNode { node: ghost })
    );
}

proptest! {
    #[test]
    fn filter_cascade_reduces_to_product(
        gains in prop::collection::vec(0.1f64..5.0, 1..5),
    ) {
        let mut b = GraphBuilder::new();
        let start = b.add_node("start", Junction);
        let mut prev = start;
        for (i, k) in gains.iter().enumerate() {
            let f = b.add_node(format!("f{i}"), constant(*k));
            b.connect(prev, f);
            prev = f;
        }
        let end = b.add_node("end", Junction);
        b.connect(prev, end);
        let graph = b.build().unwrap();

        let r = reduce(&graph, start, end).unwrap();
        prop_assert_eq!(r.fusions, gains.len() - 1);
        let expected: f64 = gains.iter().product();
        prop_assert!((r.transfer_function.eval(0.0) - expected).abs() < 1e-9 * expected.max(1.0));
    }
}
