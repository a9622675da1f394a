use crate::graph::Graph;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use tracing::trace;

/// Reorder nodes within their layers to reduce edge crossings
///
/// Alternates a median sweep (downward on even iterations, upward on odd
/// ones) with a transpose pass, keeping the best ordering seen. Returns the
/// kept layers and their crossing count.
pub(super) fn minimize_crossings<V>(
    graph: &Graph<V>,
    layers: Vec<Vec<V>>,
    iterations: usize,
) -> (Vec<Vec<V>>, usize)
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    let mut best_crossings = count_crossings(graph, &layers);
    let mut best = layers.clone();
    let mut current = layers;
    let mut medians = HashMap::new();

    for iteration in 0..iterations {
        if best_crossings == 0 {
            break;
        }
        if iteration % 2 == 0 {
            median_down(graph, &mut current, &mut medians);
        } else {
            median_up(graph, &mut current, &mut medians);
        }
        transpose(graph, &mut current);

        let crossings = count_crossings(graph, &current);
        trace!("Crossing iteration {iteration}: {crossings} crossings");
        if crossings < best_crossings {
            best_crossings = crossings;
            best = current.clone();
        }
    }

    (best, best_crossings)
}

fn positions<V: Copy + Eq + Hash>(layer: &[V]) -> HashMap<V, usize> {
    layer.iter().enumerate().map(|(i, &v)| (v, i)).collect()
}

/// Sorted positions of `neighbours` within the layer indexed by `index`
fn neighbour_positions<V: Copy + Eq + Hash>(
    neighbours: &[V],
    index: &HashMap<V, usize>,
) -> Vec<i64> {
    let mut positions: Vec<i64> = neighbours
        .iter()
        .filter_map(|n| index.get(n).map(|&p| p as i64))
        .collect();
    positions.sort_unstable();
    positions
}

/// Sort each layer by the weighted median of its predecessors' positions
fn median_down<V>(graph: &Graph<V>, layers: &mut [Vec<V>], medians: &mut HashMap<V, i64>)
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    for l in 1..layers.len() {
        let previous = positions(&layers[l - 1]);
        for &node in &layers[l] {
            let p = neighbour_positions(graph.predecessors_of(node), &previous);
            let m = p.len() / 2;
            let median = match p.len() {
                0 => continue,
                1 => -1,
                2 => (p[0] + p[1]) / 2,
                n if n % 2 == 1 => p[m],
                n => {
                    let left = p[m - 1] - p[0];
                    let right = p[n - 1] - p[m];
                    if left + right == 0 {
                        continue;
                    }
                    (p[m - 1] * right + p[m] * left) / (left + right)
                }
            };
            medians.insert(node, median);
        }
        sort_by_median(&mut layers[l], medians);
    }
}

/// Sort each layer, bottom to top, by the median of its successors' positions
fn median_up<V>(graph: &Graph<V>, layers: &mut [Vec<V>], medians: &mut HashMap<V, i64>)
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    for l in (0..layers.len().saturating_sub(1)).rev() {
        let next = positions(&layers[l + 1]);
        for &node in &layers[l] {
            let p = neighbour_positions(graph.successors_of(node), &next);
            let median = match p.len() {
                0 => continue,
                1 => p[0],
                n => {
                    let upper = n.div_ceil(2);
                    (p[upper] + p[upper - 1]) / 2
                }
            };
            medians.insert(node, median);
        }
        sort_by_median(&mut layers[l], medians);
    }
}

fn sort_by_median<V: Copy + Eq + Hash>(layer: &mut [V], medians: &HashMap<V, i64>) {
    layer.sort_by_key(|v| medians.get(v).copied().unwrap_or(-1));
}

/// Swap adjacent nodes while it strictly reduces crossings with the layer above
fn transpose<V>(graph: &Graph<V>, layers: &mut [Vec<V>])
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    let mut improved = true;
    while improved {
        improved = false;
        for l in 0..layers.len().saturating_sub(1) {
            let north = positions(&layers[l]);
            let south = &mut layers[l + 1];
            for i in 0..south.len().saturating_sub(1) {
                let (v, w) = (south[i], south[i + 1]);
                if crossing(graph, &north, v, w) > crossing(graph, &north, w, v) {
                    south.swap(i, i + 1);
                    improved = true;
                }
            }
        }
    }
}

/// Crossings between the incoming edges of `v` and `w` when `v` is placed
/// left of `w`
fn crossing<V>(graph: &Graph<V>, north: &HashMap<V, usize>, v: V, w: V) -> usize
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    let v_parents = neighbour_positions(graph.predecessors_of(v), north);
    let w_parents = neighbour_positions(graph.predecessors_of(w), north);

    w_parents
        .iter()
        .map(|pw| v_parents.iter().filter(|&pv| pw < pv).count())
        .sum()
}

/// Count the number of edge crossings between every pair of adjacent layers
pub(super) fn count_crossings<V>(graph: &Graph<V>, layers: &[Vec<V>]) -> usize
where
    V: Copy + Eq + Hash + fmt::Debug,
{
    let mut crossings = 0;

    for pair in layers.windows(2) {
        let north = positions(&pair[0]);
        let south = &pair[1];
        for (i, &v) in south.iter().enumerate() {
            for &w in &south[i + 1..] {
                crossings += crossing(graph, &north, v, w);
            }
        }
    }

    crossings
}
