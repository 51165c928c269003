//! Integration tests for bf-graph.

use bf_blocks::{BlockKind, ContinuousPlant, DiscretePid, Generator, Sign, Sink, Sum};
use bf_graph::{GraphBuilder, GraphError, validate_for_simulation};

#[test]
fn feedback_loop_structure() {
    // gen -> sum -> pid -> plant -> sum, plant -> sink
    let mut builder = GraphBuilder::new();
    let gen_id = builder.add_node("gen", Generator::new(2.0));
    let sum = builder.add_node("sum", Sum::new());
    let pid = builder.add_node("pid", DiscretePid::default());
    let plant = builder.add_node(
        "plant",
        ContinuousPlant::new(vec![2.0, 5.0], vec![1.0, 3.0, 2.0]).unwrap(),
    );
    let sink = builder.add_node("sink", Sink::new());
    builder
        .connect(gen_id, sum)
        .connect(sum, pid)
        .connect(pid, plant)
        .connect(plant, sum)
        .connect(plant, sink);
    builder.set_sign(sum, plant, Sign::Minus).unwrap();

    let graph = builder.build().unwrap();
    validate_for_simulation(&graph).unwrap();

    assert_eq!(graph.nodes().len(), 5);
    assert_eq!(graph.edges().len(), 5);
    assert_eq!(graph.in_degree(sum), 2);
    assert_eq!(graph.out_degree(plant), 2);
    assert_eq!(graph.predecessors(sum), vec![gen_id, plant]);
    assert_eq!(graph.successors(plant), vec![sum, sink]);
    assert_eq!(graph.plants(), vec![plant]);
    assert_eq!(graph.find("pid"), Some(pid));
    assert_eq!(graph.find("missing"), None);
    assert_eq!(graph.name(sink), "sink");
    assert_eq!(graph.block(pid).map(|b| b.kind()), Some(BlockKind::DiscretePid));
}

#[test]
fn sink_fan_in_names_node_type() {
    let mut builder = GraphBuilder::new();
    let a = builder.add_node("a", Generator::new(1.0));
    let b = builder.add_node("b", Generator::new(1.0));
    let sink = builder.add_node("scope", Sink::new());
    builder.connect(a, sink).connect(b, sink);
    let graph = builder.build().unwrap();

    match validate_for_simulation(&graph) {
        Err(GraphError::FanIn {
            kind,
            node,
            in_degree,
            ..
        }) => {
            assert_eq!(kind, BlockKind::Sink);
            assert_eq!(node, sink);
            assert_eq!(in_degree, 2);
        }
        other => panic!("expected fan-in error, got {other:?}"),
    }
}

#[test]
fn blocks_are_mutable_after_build() {
    let mut builder = GraphBuilder::new();
    let s = builder.add_node("s", Sink::new());
    let mut graph = builder.build().unwrap();
    let block = graph.block_mut(s).unwrap();
    block.init();
    assert!(block.trace().unwrap().is_empty());
}
