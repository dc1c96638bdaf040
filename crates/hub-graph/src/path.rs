use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use hub_core::{Distance, HubId};

use crate::graph::Adjacency;

/// Result of a shortest-path search.
///
/// `nodes` lists the hubs visited after the source, ending with the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResult {
    pub total_distance: Distance,
    pub total_time_minutes: u32,
    pub nodes: Vec<HubId>,
}

impl PathResult {
    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.nodes.len()
    }
}

/// No chain of edges connects the source to the target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no path from {from} to {to}")]
pub struct PathNotFound {
    pub from: HubId,
    pub to: HubId,
}

/// A shortest-path algorithm over an [`Adjacency`].
pub trait PathEngine: Send + Sync {
    fn shortest_path(
        &self,
        graph: &Adjacency,
        from: &HubId,
        to: &HubId,
    ) -> Result<PathResult, PathNotFound>;
}

/// Dijkstra over distance, breaking distance ties on lower travel time.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl PathEngine for Dijkstra {
    fn shortest_path(
        &self,
        graph: &Adjacency,
        from: &HubId,
        to: &HubId,
    ) -> Result<PathResult, PathNotFound> {
        shortest_path(graph, from, to)
    }
}

#[derive(Debug, Clone)]
struct Label {
    distance: Distance,
    time: u32,
    parent: Option<HubId>,
}

impl Label {
    fn cost(&self) -> (Distance, u32) {
        (self.distance, self.time)
    }
}

/// Minimum-distance path from `from` to `to`.
///
/// Labels are compared as (distance, time), so among equally long paths the
/// faster one wins. Fully equal labels keep the first one discovered; the
/// queue pops equal costs in hub-id order, which makes the result a pure
/// function of the adjacency.
///
/// `from == to` is not special-cased and yields an empty zero-length path.
pub fn shortest_path(
    graph: &Adjacency,
    from: &HubId,
    to: &HubId,
) -> Result<PathResult, PathNotFound> {
    let mut labels: HashMap<HubId, Label> = HashMap::new();
    let mut queue: BinaryHeap<Reverse<(Distance, u32, HubId)>> = BinaryHeap::new();

    labels.insert(
        from.clone(),
        Label {
            distance: Distance::ZERO,
            time: 0,
            parent: None,
        },
    );
    queue.push(Reverse((Distance::ZERO, 0, from.clone())));

    while let Some(Reverse((distance, time, hub))) = queue.pop() {
        // Skip entries superseded by a later relaxation.
        if labels.get(&hub).is_some_and(|l| (distance, time) > l.cost()) {
            continue;
        }
        if &hub == to {
            break;
        }

        for edge in graph.edges_from(&hub) {
            let candidate = (
                distance.saturating_add(edge.distance),
                time.saturating_add(edge.time_minutes),
            );
            let improves = labels
                .get(&edge.to)
                .map_or(true, |current| candidate < current.cost());

            if improves {
                labels.insert(
                    edge.to.clone(),
                    Label {
                        distance: candidate.0,
                        time: candidate.1,
                        parent: Some(hub.clone()),
                    },
                );
                queue.push(Reverse((candidate.0, candidate.1, edge.to.clone())));
            }
        }
    }

    let Some(target) = labels.get(to) else {
        return Err(PathNotFound {
            from: from.clone(),
            to: to.clone(),
        });
    };

    Ok(PathResult {
        total_distance: target.distance,
        total_time_minutes: target.time,
        nodes: reconstruct_path(&labels, to),
    })
}

/// Walk parent links back from `target` and return the hubs after the
/// source in travel order.
fn reconstruct_path(labels: &HashMap<HubId, Label>, target: &HubId) -> Vec<HubId> {
    let mut nodes = Vec::new();
    let mut current = target;

    while let Some(parent) = labels.get(current).and_then(|l| l.parent.as_ref()) {
        nodes.push(current.clone());
        current = parent;
    }

    nodes.reverse();
    nodes
}
