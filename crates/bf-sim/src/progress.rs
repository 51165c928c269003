//! Run progress reporting.

/// Lifecycle phase of a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Validating the graph and resetting block state.
    Init,
    /// Execution order computed.
    Scheduled,
    /// Executing steps.
    Stepping,
    /// All requested steps executed.
    Done,
}

/// Progress event delivered to a run's callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimProgress {
    pub phase: SimPhase,
    /// Steps executed so far in this call.
    pub step: usize,
    /// Steps requested for this call.
    pub steps: usize,
}

pub(crate) fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(SimProgress)>,
    phase: SimPhase,
    step: usize,
    steps: usize,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(SimProgress { phase, step, steps });
    }
}
