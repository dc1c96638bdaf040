use std::collections::HashMap;

use hub_core::{HubId, OutgoingEdge, RouteLeg, RouteRecord};

/// Directed hub graph: source hub → outgoing edges in insertion order.
///
/// At most one edge exists per ordered (source, destination) pair. Hubs
/// without outgoing edges have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjacency {
    outgoing: HashMap<HubId, Vec<OutgoingEdge>>,
}

impl Adjacency {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outgoing edges of `hub`; empty if it has none.
    pub fn edges_from(&self, hub: &HubId) -> &[OutgoingEdge] {
        self.outgoing.get(hub).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The edge for an ordered pair, if present.
    pub fn edge_between(&self, from: &HubId, to: &HubId) -> Option<&OutgoingEdge> {
        self.edges_from(from).iter().find(|e| &e.to == to)
    }

    /// Source hubs with at least one outgoing edge.
    pub fn sources(&self) -> impl Iterator<Item = (&HubId, &[OutgoingEdge])> {
        self.outgoing.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn source_count(&self) -> usize {
        self.outgoing.len()
    }

    pub fn edge_count(&self) -> usize {
        self.outgoing.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.outgoing.is_empty()
    }

    /// Per-leg details for a path that starts at `source` and visits `nodes`
    /// in order. Returns None if any consecutive pair has no edge.
    pub fn legs_along(&self, source: &HubId, nodes: &[HubId]) -> Option<Vec<RouteLeg>> {
        let mut legs = Vec::with_capacity(nodes.len());
        let mut current = source;
        for next in nodes {
            let edge = self.edge_between(current, next)?;
            legs.push(RouteLeg {
                from: current.clone(),
                to: next.clone(),
                distance: edge.distance,
                time_minutes: edge.time_minutes,
            });
            current = next;
        }
        Some(legs)
    }
}

/// Builder for [`Adjacency`].
///
/// Accepts either stored route records or whole per-hub edge lists (as read
/// back from a cache). Later input for an existing pair replaces the earlier
/// edge in place.
#[derive(Debug, Default)]
pub struct AdjacencyBuilder {
    outgoing: HashMap<HubId, Vec<OutgoingEdge>>,
}

impl AdjacencyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a known number of source hubs.
    pub fn with_capacity(sources: usize) -> Self {
        Self {
            outgoing: HashMap::with_capacity(sources),
        }
    }

    /// Seed a builder from stored route records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a RouteRecord>) -> Self {
        let mut builder = Self::new();
        for record in records {
            builder.add_record(record);
        }
        builder
    }

    /// Add one stored record. Self-loops are ignored.
    pub fn add_record(&mut self, record: &RouteRecord) -> &mut Self {
        self.add_edge(record.from.clone(), record.outgoing())
    }

    /// Add one edge from `source`. Self-loops are ignored.
    pub fn add_edge(&mut self, source: HubId, edge: OutgoingEdge) -> &mut Self {
        if edge.to == source {
            return self;
        }
        let edges = self.outgoing.entry(source).or_default();
        match edges.iter_mut().find(|e| e.to == edge.to) {
            Some(existing) => *existing = edge,
            None => edges.push(edge),
        }
        self
    }

    /// Add every edge of one source hub.
    pub fn add_source(&mut self, source: HubId, edges: Vec<OutgoingEdge>) -> &mut Self {
        for edge in edges {
            self.add_edge(source.clone(), edge);
        }
        self
    }

    pub fn build(self) -> Adjacency {
        let outgoing = self
            .outgoing
            .into_iter()
            .filter(|(_, edges)| !edges.is_empty())
            .collect();
        Adjacency { outgoing }
    }
}
