//! Distance metric and dense distance matrix.

/// Integer travel cost between two nodes.
pub type Cost = i64;

/// Euclidean distance between two integer points, rounded to the nearest integer.
pub fn rounded_euclidean(from: (i64, i64), to: (i64, i64)) -> Cost {
    let dx = (from.0 - to.0) as f64;
    let dy = (from.1 - to.1) as f64;
    ((dx * dx + dy * dy).sqrt() + 0.5).floor() as Cost
}

/// A dense n×n cost matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    data: Vec<Cost>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the rounded Euclidean matrix of a set of locations.
    pub fn from_locations(locations: &[(i64, i64)]) -> Self {
        let size = locations.len();
        let mut data = vec![0; size * size];

        for i in 0..size {
            for j in (i + 1)..size {
                let d = rounded_euclidean(locations[i], locations[j]);
                data[i * size + j] = d;
                data[j * size + i] = d;
            }
        }

        DistanceMatrix { data, size }
    }

    /// Returns the cost from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> Cost {
        self.data[from * self.size + to]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}
