//! ASCII map rendering for the claim grid.
//!
//! Provides two views:
//! - **Overview** (64x64): each character stands for a square block of cells
//! - **Detail** (full resolution): 1 character per cell inside a window
//!
//! Maps are built on demand from `&ClaimGrid`; no per-frame systems needed.

use crate::claims::{ClaimGrid, CLAIM_BUILDING, CLAIM_ROAD, CLAIM_WALK};

// -----------------------------------------------------------------------
// Character encoding
// -----------------------------------------------------------------------

/// Convert one cell's claim flags to a character.
///
/// Priority: Road > Sidewalk > Building > unclaimed.
pub fn cell_to_char(flags: u8) -> char {
    if flags & CLAIM_ROAD != 0 {
        '='
    } else if flags & CLAIM_WALK != 0 {
        ':'
    } else if flags & CLAIM_BUILDING != 0 {
        '#'
    } else {
        '.'
    }
}

/// Higher value wins an overview block.
fn char_priority(ch: char) -> u8 {
    match ch {
        '=' => 3,
        ':' => 2,
        '#' => 1,
        _ => 0,
    }
}

// -----------------------------------------------------------------------
// Overview map
// -----------------------------------------------------------------------

const OVERVIEW: usize = 64;

/// Build a 64x64 overview of the whole grid (or fewer characters when the
/// grid is smaller). Rows run along z, columns along x.
pub fn build_overview_map(grid: &ClaimGrid) -> String {
    let size = grid.size();
    let block = size.div_ceil(OVERVIEW).max(1);
    let cols = size.div_ceil(block);

    let mut lines: Vec<String> = Vec::with_capacity(cols + 6);
    for row in 0..cols {
        let real_row = row * block;
        let mut line = if row % 4 == 0 {
            format!("{real_row:>5} | ")
        } else {
            "      | ".to_string()
        };
        for col in 0..cols {
            line.push(dominant_char(grid, col * block, real_row, block));
        }
        lines.push(line);
    }

    lines.push(String::new());
    append_legend(&mut lines, block);
    lines.join("\n")
}

/// Strongest character in a `block x block` region starting at `(x, z)`.
fn dominant_char(grid: &ClaimGrid, x: usize, z: usize, block: usize) -> char {
    let size = grid.size();
    let mut best = '.';
    for dz in 0..block {
        for dx in 0..block {
            let (cx, cz) = (x + dx, z + dz);
            if cx < size && cz < size {
                let ch = cell_to_char(grid.cell(cx as i32, cz as i32));
                if char_priority(ch) > char_priority(best) {
                    best = ch;
                }
            }
        }
    }
    best
}

// -----------------------------------------------------------------------
// Detail map
// -----------------------------------------------------------------------

/// Full-resolution view of the window at `(x0, z0)`, cut to the grid.
pub fn build_detail_map(grid: &ClaimGrid, x0: usize, z0: usize, width: usize, depth: usize) -> String {
    let size = grid.size();
    if x0 >= size || z0 >= size || width == 0 || depth == 0 {
        return "(window outside the grid)".to_string();
    }
    let x1 = (x0 + width).min(size);
    let z1 = (z0 + depth).min(size);

    let mut lines: Vec<String> = Vec::with_capacity(z1 - z0 + 4);
    for z in z0..z1 {
        let mut line = format!("{z:>5} | ");
        for x in x0..x1 {
            line.push(cell_to_char(grid.cell(x as i32, z as i32)));
        }
        lines.push(line);
    }

    lines.push(String::new());
    append_legend(&mut lines, 1);
    lines.join("\n")
}

fn append_legend(lines: &mut Vec<String>, block: usize) {
    lines.push(format!("Legend ({block}x{block} cells per char):"));
    lines.push("  ==Road  :=Sidewalk  #=Building  .=Unclaimed".to_string());
}
