//! The claim grid: one bitmask per cell recording what the land is used for.
//!
//! All coordinate access clamps to `[0, size - 1]`. Out-of-range queries
//! therefore see the nearest edge cell instead of failing.

pub const CLAIM_ROAD: u8 = 0b0000_0001;
pub const CLAIM_WALK: u8 = 0b0000_0010;
pub const CLAIM_BUILDING: u8 = 0b0000_0100;
pub const ROAD_NORTH: u8 = 0b0000_1000;
pub const ROAD_EAST: u8 = 0b0001_0000;
pub const ROAD_SOUTH: u8 = 0b0010_0000;
pub const ROAD_WEST: u8 = 0b0100_0000;

/// All four lane-direction markers.
pub const ROAD_DIRECTIONS: u8 = ROAD_NORTH | ROAD_EAST | ROAD_SOUTH | ROAD_WEST;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimGrid {
    cells: Vec<u8>,
    size: usize,
}

impl ClaimGrid {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![0; size * size],
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Raw cells, row-major (`z * size + x`).
    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Clear every claim.
    pub fn reset(&mut self) {
        self.cells.fill(0);
    }

    #[inline]
    fn clamp(&self, v: i32) -> usize {
        v.clamp(0, self.size as i32 - 1) as usize
    }

    #[inline]
    fn index(&self, x: i32, z: i32) -> usize {
        self.clamp(z) * self.size + self.clamp(x)
    }

    /// Flags at a clamped coordinate.
    #[inline]
    pub fn cell(&self, x: i32, z: i32) -> u8 {
        self.cells[self.index(x, z)]
    }

    #[inline]
    pub fn has(&self, x: i32, z: i32, flag: u8) -> bool {
        self.cell(x, z) & flag != 0
    }

    /// OR `flags` into every cell of the rectangle.
    pub fn claim(&mut self, x: i32, z: i32, width: i32, depth: i32, flags: u8) {
        for zz in z..z + depth {
            for xx in x..x + width {
                let idx = self.index(xx, zz);
                self.cells[idx] |= flags;
            }
        }
    }

    /// True if any cell of the rectangle carries any flag.
    pub fn is_claimed(&self, x: i32, z: i32, width: i32, depth: i32) -> bool {
        for zz in z..z + depth {
            for xx in x..x + width {
                if self.cell(xx, zz) != 0 {
                    return true;
                }
            }
        }
        false
    }

    pub fn unclaimed_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 0).count()
    }

    pub fn count_with(&self, flag: u8) -> usize {
        self.cells.iter().filter(|&&c| c & flag != 0).count()
    }
}
