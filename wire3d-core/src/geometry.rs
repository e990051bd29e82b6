/// Geometry primitives for wireframe rendering
use nalgebra::{Point3, Vector3};
use std::fmt;

/// A 3D vertex. Transforms always produce a new value.
pub type Vertex = Point3<f64>;

/// An undirected edge between two vertex indices, stored smaller index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge(usize, usize);

impl Edge {
    /// Build the canonical key for the unordered pair `{a, b}`
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    pub fn start(&self) -> usize {
        self.0
    }

    pub fn end(&self) -> usize {
        self.1
    }
}

/// A wireframe mesh: ordered vertices, deduplicated edges and a bounding radius
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub edges: Vec<Edge>,
    pub radius: f64,
}

impl Geometry {
    /// Assemble a geometry from raw parts and normalize it into the unit box
    pub fn from_parts(vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        Self {
            vertices,
            edges,
            radius: 1.0,
        }
        .normalized()
    }

    /// Re-center on the origin and rescale so the longest axis spans exactly 2.
    ///
    /// An empty vertex list is returned unchanged. A zero extent (single point)
    /// is treated as 1 to avoid dividing by zero.
    pub fn normalized(self) -> Self {
        if self.vertices.is_empty() {
            return self;
        }

        let Some((min, max)) = bounds(&self.vertices) else {
            return self;
        };
        // Work on halved coordinates so sums and spans of large finite values stay finite
        let (min, max) = (min.coords / 2.0, max.coords / 2.0);
        let center = min + max;
        let half_extent = max - min;
        let half_size = match half_extent.x.max(half_extent.y).max(half_extent.z) {
            s if s == 0.0 => 0.5,
            s => s,
        };

        let vertices = self
            .vertices
            .iter()
            .map(|v| Vertex::from((v.coords / 2.0 - center / 2.0) / half_size * 2.0))
            .collect();

        Self {
            vertices,
            edges: self.edges,
            radius: 1.0,
        }
    }

    /// The default cube shown before any mesh is loaded
    pub fn cube() -> Self {
        let vertices = vec![
            Vertex::new(-1.0, -1.0, -1.0),
            Vertex::new(1.0, -1.0, -1.0),
            Vertex::new(1.0, 1.0, -1.0),
            Vertex::new(-1.0, 1.0, -1.0),
            Vertex::new(-1.0, -1.0, 1.0),
            Vertex::new(1.0, -1.0, 1.0),
            Vertex::new(1.0, 1.0, 1.0),
            Vertex::new(-1.0, 1.0, 1.0),
        ];
        let edges = [
            // back face
            (0, 1), (1, 2), (2, 3), (3, 0),
            // front face
            (4, 5), (5, 6), (6, 7), (7, 4),
            // connecting edges
            (0, 4), (1, 5), (2, 6), (3, 7),
        ]
        .into_iter()
        .map(|(a, b)| Edge::new(a, b))
        .collect();

        Self::from_parts(vertices, edges)
    }

    pub fn status(&self) -> MeshStatus {
        MeshStatus {
            vertex_count: self.vertices.len(),
            edge_count: self.edges.len(),
        }
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::cube()
    }
}

/// Axis-aligned bounding box as `(min, max)` corners, `None` when empty
pub fn bounds(vertices: &[Vertex]) -> Option<(Vertex, Vertex)> {
    let first = vertices.first()?;
    let (min, max) = vertices.iter().skip(1).fold((*first, *first), |(min, max), v| {
        (
            Vertex::new(min.x.min(v.x), min.y.min(v.y), min.z.min(v.z)),
            Vertex::new(max.x.max(v.x), max.y.max(v.y), max.z.max(v.z)),
        )
    });
    Some((min, max))
}

/// Longest side of the bounding box, zero when empty
pub fn longest_extent(vertices: &[Vertex]) -> f64 {
    bounds(vertices)
        .map(|(min, max)| {
            let extent: Vector3<f64> = max - min;
            extent.x.max(extent.y).max(extent.z)
        })
        .unwrap_or(0.0)
}

/// Vertex and edge counts reported to the status display after a load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshStatus {
    pub vertex_count: usize,
    pub edge_count: usize,
}

impl fmt::Display for MeshStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vertices: {} | Edges: {}", self.vertex_count, self.edge_count)
    }
}
