//! Graph determinant.

use bf_core::NodeId;
use bf_lti::TransferFunction;

/// An elementary loop with its gain.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    /// Canonical node sequence, smallest id first.
    pub nodes: Vec<NodeId>,
    pub gain: TransferFunction,
}

/// Check whether two node sets share a node.
pub fn touches(a: &[NodeId], b: &[NodeId]) -> bool {
    a.iter().any(|n| b.contains(n))
}

/// `Δ = 1 - ΣLi + ΣLiLj - ΣLiLjLk + ...` over sets of mutually
/// non-touching loops.
///
/// Sets are grown by backtracking: a set is only extended with loops that
/// touch none of its members, so the work is proportional to the number of
/// non-touching sets rather than to every subset of the loops.
pub fn determinant(loops: &[Loop]) -> TransferFunction {
    let mut terms: Vec<Option<TransferFunction>> = vec![None; loops.len()];
    let mut chosen = Vec::with_capacity(loops.len());
    collect_disjoint(loops, 0, &mut chosen, &TransferFunction::unity(), &mut terms);

    let mut delta = TransferFunction::unity();
    for (size, term) in terms.into_iter().enumerate() {
        let Some(term) = term else {
            break;
        };
        // Set size is `size + 1`; odd sizes subtract.
        let signed = if size % 2 == 0 { term.scale(-1.0) } else { term };
        delta = delta.add(&signed);
    }
    delta
}

/// Add the gain product of every non-touching extension of `chosen` to the
/// term for its set size.
fn collect_disjoint(
    loops: &[Loop],
    start: usize,
    chosen: &mut Vec<usize>,
    product: &TransferFunction,
    terms: &mut [Option<TransferFunction>],
) {
    for i in start..loops.len() {
        if chosen
            .iter()
            .any(|&j| touches(&loops[i].nodes, &loops[j].nodes))
        {
            continue;
        }
        let extended = product.multiply(&loops[i].gain);
        let slot = &mut terms[chosen.len()];
        *slot = Some(match slot.take() {
            Some(t) => t.add(&extended),
            None => extended.clone(),
        });

        chosen.push(i);
        collect_disjoint(loops, i + 1, chosen, &extended, terms);
        chosen.pop();
    }
}
