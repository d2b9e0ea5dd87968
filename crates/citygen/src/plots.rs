//! Candidate building lots and the plot finder.

use crate::claims::ClaimGrid;

/// An axis-aligned rectangle of land, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plot {
    pub x: i32,
    pub z: i32,
    pub width: i32,
    pub depth: i32,
}

impl Plot {
    pub fn new(x: i32, z: i32, width: i32, depth: i32) -> Self {
        Self { x, z, width, depth }
    }

    pub fn area(&self) -> i32 {
        self.width * self.depth
    }

    /// Split across the x axis into a west and an east half.
    pub fn split_width(&self) -> (Plot, Plot) {
        let west = self.width / 2;
        (
            Plot::new(self.x, self.z, west, self.depth),
            Plot::new(self.x + west, self.z, self.width - west, self.depth),
        )
    }

    /// Split across the z axis into a north and a south half.
    pub fn split_depth(&self) -> (Plot, Plot) {
        let north = self.depth / 2;
        (
            Plot::new(self.x, self.z, self.width, north),
            Plot::new(self.x, self.z + north, self.width, self.depth - north),
        )
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.x && x < self.x + self.width && z >= self.z && z < self.z + self.depth
    }
}

/// Grow a rectangle out of the unclaimed seed cell `(x, z)`.
///
/// Each of the four directions advances one cell at a time until the next
/// cell is claimed or the grid edge is reached. The result is the largest
/// unclaimed cross through the seed, not the largest rectangle overall.
pub fn find_plot(grid: &ClaimGrid, x: i32, z: i32) -> Plot {
    let last = grid.size() as i32 - 1;

    let mut x1 = x;
    while x1 > 0 && grid.cell(x1 - 1, z) == 0 {
        x1 -= 1;
    }
    let mut x2 = x;
    while x2 < last && grid.cell(x2 + 1, z) == 0 {
        x2 += 1;
    }

    let mut z1 = z;
    while z1 > 0 && grid.cell(x, z1 - 1) == 0 {
        z1 -= 1;
    }
    let mut z2 = z;
    while z2 < last && grid.cell(x, z2 + 1) == 0 {
        z2 += 1;
    }

    Plot::new(x1, z1, x2 - x1 + 1, z2 - z1 + 1)
}
