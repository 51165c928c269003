//! Stepping driver.

use std::collections::BTreeMap;

use bf_blocks::{RunContext, Signal};
use bf_core::NodeId;
use bf_graph::{Graph, GraphError, validate_for_simulation};
use tracing::{debug, info, trace};

use crate::error::{SimError, SimResult};
use crate::options::SimOptions;
use crate::progress::{SimPhase, SimProgress, emit_progress};
use crate::schedule::schedule;

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimOutcome {
    /// Execution order used for every step.
    pub order: Vec<NodeId>,
    /// Every signal each node produced, oldest first.
    pub history: BTreeMap<NodeId, Vec<Signal>>,
    /// Latest signal of each node.
    pub last: BTreeMap<NodeId, Signal>,
    /// Total steps executed since the last `run`.
    pub steps: usize,
    pub completed: bool,
}

impl SimOutcome {
    /// Signals produced by one node.
    pub fn history_of(&self, id: NodeId) -> &[Signal] {
        self.history.get(&id).map_or(&[], Vec::as_slice)
    }
}

/// Drives a graph through discrete steps.
///
/// The simulator owns the run-scoped state (random stream, signal map,
/// histories). Block state lives in the graph and is mutated in place.
#[derive(Debug, Clone)]
pub struct Simulator {
    opts: SimOptions,
    ctx: RunContext,
    order: Option<Vec<NodeId>>,
    signals: BTreeMap<NodeId, Signal>,
    history: BTreeMap<NodeId, Vec<Signal>>,
    steps_done: usize,
}

impl Simulator {
    pub fn new(opts: SimOptions) -> SimResult<Self> {
        opts.validate()?;
        Ok(Self {
            ctx: RunContext::seeded(opts.seed),
            opts,
            order: None,
            signals: BTreeMap::new(),
            history: BTreeMap::new(),
            steps_done: 0,
        })
    }

    pub fn options(&self) -> &SimOptions {
        &self.opts
    }

    /// Validate, initialize, schedule and step the graph `opts.steps` times.
    pub fn run(&mut self, graph: &mut Graph) -> SimResult<SimOutcome> {
        self.run_with_progress(graph, None)
    }

    /// Like [`run`](Self::run), reporting each phase and step to `progress_cb`.
    pub fn run_with_progress(
        &mut self,
        graph: &mut Graph,
        mut progress_cb: Option<&mut dyn FnMut(SimProgress)>,
    ) -> SimResult<SimOutcome> {
        let steps = self.opts.steps;
        emit_progress(&mut progress_cb, SimPhase::Init, 0, steps);
        validate_for_simulation(graph)?;

        self.ctx = RunContext::seeded(self.opts.seed);
        self.order = None;
        self.signals.clear();
        self.history.clear();
        self.steps_done = 0;
        for block in graph.blocks_mut() {
            block.init();
            block.set_sampling_period(self.opts.ts);
        }
        debug!(nodes = graph.nodes().len(), ts = self.opts.ts, "graph initialized");

        let order = schedule(graph)?;
        emit_progress(&mut progress_cb, SimPhase::Scheduled, 0, steps);
        self.order = Some(order);

        self.step_n(graph, steps, &mut progress_cb)
    }

    /// Continue stepping `steps` more times without re-initializing.
    ///
    /// Block state, the signal map and the random stream pick up where the
    /// previous call stopped.
    pub fn resume(&mut self, graph: &mut Graph, steps: usize) -> SimResult<SimOutcome> {
        if steps == 0 {
            return Err(SimError::InvalidOption {
                what: "steps must be at least 1",
            });
        }
        self.step_n(graph, steps, &mut None)
    }

    fn step_n(
        &mut self,
        graph: &mut Graph,
        steps: usize,
        progress_cb: &mut Option<&mut dyn FnMut(SimProgress)>,
    ) -> SimResult<SimOutcome> {
        let order = self.order.clone().ok_or(SimError::NotStarted)?;

        for step in 0..steps {
            emit_progress(progress_cb, SimPhase::Stepping, step, steps);
            if let Err(err) = self.step(graph, &order) {
                // Block state is half-stepped; only a fresh run may continue.
                self.order = None;
                return Err(err);
            }
        }
        self.steps_done += steps;
        emit_progress(progress_cb, SimPhase::Done, steps, steps);
        info!(steps = self.steps_done, nodes = order.len(), "simulation complete");

        Ok(SimOutcome {
            order,
            history: self.history.clone(),
            last: self.signals.clone(),
            steps: self.steps_done,
            completed: true,
        })
    }

    fn step(&mut self, graph: &mut Graph, order: &[NodeId]) -> SimResult<()> {
        for &id in order {
            let inputs: Vec<Signal> = graph
                .predecessors(id)
                .into_iter()
                .filter_map(|p| self.signals.get(&p).copied())
                .collect();

            let node = graph
                .node_mut(id)
                .ok_or(SimError::Graph(GraphError::UnknownNode { node: id }))?;
            self.ctx.enter(id);
            let out = node
                .block
                .execute(&inputs, &mut self.ctx)
                .map_err(|source| SimError::Block {
                    node: id,
                    name: node.name.clone(),
                    source,
                })?;
            trace!(node = %node.name, value = out.value, time = ?out.time, "executed");

            self.signals.insert(id, out);
            self.history.entry(id).or_default().push(out);
        }
        Ok(())
    }
}

/// Run `graph` once with `opts`.
pub fn simulate(graph: &mut Graph, opts: SimOptions) -> SimResult<SimOutcome> {
    Simulator::new(opts)?.run(graph)
}
