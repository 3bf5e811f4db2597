use std::sync::{Arc, RwLock};

/// Handle of a spot in a [`ModelGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub u32);

/// Handle of a link in a [`ModelGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug)]
pub struct Spot {
    pub label: String,
    pub timepoint: i32,
    pub position: [f64; 3],
    pub radius: f64,
    incoming: Vec<EdgeId>,
    outgoing: Vec<EdgeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    pub source: VertexId,
    pub target: VertexId,
}

/// Tracking graph: spots are detections at a timepoint, links connect a spot
/// to its successor(s) in time.
///
/// Spots and links live in two arenas and are addressed by integer handles;
/// a handle is only ever produced by the graph that owns it.
#[derive(Clone, Debug, Default)]
pub struct ModelGraph {
    spots: Vec<Spot>,
    links: Vec<Link>,
}

/// The graph together with the lock that guards consistent reads.
pub type SharedGraph = Arc<RwLock<ModelGraph>>;

impl ModelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(spots: usize, links: usize) -> Self {
        Self {
            spots: Vec::with_capacity(spots),
            links: Vec::with_capacity(links),
        }
    }

    pub fn into_shared(self) -> SharedGraph {
        Arc::new(RwLock::new(self))
    }

    pub fn add_vertex(&mut self, timepoint: i32, position: [f64; 3], radius: f64) -> VertexId {
        let id = VertexId(self.spots.len() as u32);
        self.spots.push(Spot {
            label: id.0.to_string(),
            timepoint,
            position,
            radius,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        });
        id
    }

    pub fn add_edge(&mut self, source: VertexId, target: VertexId) -> EdgeId {
        let id = EdgeId(self.links.len() as u32);
        self.links.push(Link { source, target });
        self.spots[source.index()].outgoing.push(id);
        self.spots[target.index()].incoming.push(id);
        id
    }

    pub fn set_label(&mut self, vertex: VertexId, label: impl Into<String>) {
        self.spots[vertex.index()].label = label.into();
    }

    pub fn vertex_count(&self) -> usize {
        self.spots.len()
    }

    pub fn edge_count(&self) -> usize {
        self.links.len()
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        vertex.index() < self.spots.len()
    }

    pub fn vertices(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        (0..self.spots.len() as u32).map(VertexId)
    }

    pub fn edges(&self) -> impl ExactSizeIterator<Item = EdgeId> + '_ {
        (0..self.links.len() as u32).map(EdgeId)
    }

    pub fn spot(&self, vertex: VertexId) -> &Spot {
        &self.spots[vertex.index()]
    }

    pub fn link(&self, edge: EdgeId) -> Link {
        self.links[edge.index()]
    }

    pub fn source(&self, edge: EdgeId) -> VertexId {
        self.links[edge.index()].source
    }

    pub fn target(&self, edge: EdgeId) -> VertexId {
        self.links[edge.index()].target
    }

    /// The endpoint of `edge` that is not `vertex`. For a self-link this is
    /// `vertex` itself.
    pub fn opposite(&self, edge: EdgeId, vertex: VertexId) -> VertexId {
        let link = self.links[edge.index()];
        if link.source == vertex {
            link.target
        } else {
            link.source
        }
    }

    pub fn incoming_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.spots[vertex.index()].incoming
    }

    pub fn outgoing_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.spots[vertex.index()].outgoing
    }

    /// Incoming then outgoing edges of `vertex`. A self-link shows up twice.
    pub fn edges_of(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        let spot = &self.spots[vertex.index()];
        spot.incoming.iter().chain(spot.outgoing.iter()).copied()
    }
}
