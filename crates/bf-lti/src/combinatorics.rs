//! Small combinatorics helpers.

/// All `k`-element subsets of `0..n`, in lexicographic order.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut current = Vec::with_capacity(k);
    extend(&mut out, &mut current, n, k, 0);
    out
}

fn extend(out: &mut Vec<Vec<usize>>, current: &mut Vec<usize>, n: usize, k: usize, from: usize) {
    if current.len() == k {
        out.push(current.clone());
        return;
    }
    // Not enough elements left to finish this prefix.
    let needed = k - current.len();
    for i in from..=(n - needed) {
        current.push(i);
        extend(out, current, n, k, i + 1);
        current.pop();
    }
}
