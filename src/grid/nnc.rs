use crate::math::Point3;

use super::FaceType;

/// A non-neighbor connection between two cells that are not adjacent in
/// index space but share flow across a fault.
#[derive(Debug, Clone)]
pub struct NncConnection {
    pub cell1: usize,
    pub cell2: usize,
    /// Face of `cell1` the connection passes through.
    pub face: FaceType,
    /// Overlap polygon between the two cell faces, in model coordinates.
    pub polygon: Vec<Point3>,
    pub transmissibility: f64,
}

/// All non-neighbor connections of a grid.
#[derive(Debug, Clone, Default)]
pub struct NncData {
    connections: Vec<NncConnection>,
}

impl NncData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a connection and returns its index.
    pub fn push(&mut self, connection: NncConnection) -> usize {
        self.connections.push(connection);
        self.connections.len() - 1
    }

    #[must_use]
    pub fn connections(&self) -> &[NncConnection] {
        &self.connections
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&NncConnection> {
        self.connections.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
