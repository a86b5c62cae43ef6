//! CSG cell membership and per-cell surface-distance lookup, grounded on
//! `Cell::checkPoint`/`Cell::intersect`.

use super::{Coordinate, Direction, MaterialIx, Surface, SurfaceIx};

/// A single `(surface, required sense)` entry in a cell's bounding list.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct CellSurface {
    pub surface: SurfaceIx,
    /// The sense a point must have w.r.t. `surface` to satisfy this entry, absent
    /// the cell's `negated` flag.
    pub sense: bool,
}

/// A CSG cell: ordinarily the intersection of half-spaces named by `surfaces`, or,
/// when `negated` is set, its complement (any point failing at least one entry is
/// inside).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub id: u64,
    pub surfaces: Vec<CellSurface>,
    pub negated: bool,
    pub material: MaterialIx,
}

impl Cell {
    pub fn new(id: u64, surfaces: Vec<CellSurface>, material: MaterialIx) -> Self {
        Cell {
            id,
            surfaces,
            negated: false,
            material,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negated = true;
        self
    }

    /// True if this cell contains `pos`, without skipping any surface.
    pub fn contains(&self, pos: Coordinate, surface_table: &[Surface]) -> bool {
        self.contains_skip(pos, surface_table, None)
    }

    /// `contains`, but a surface index in `skip` is treated as "just crossed": the
    /// point is taken to already be outside on that surface without re-evaluating
    /// its sense function, avoiding round-off flip-flopping right at a boundary.
    pub fn contains_skip(
        &self,
        pos: Coordinate,
        surface_table: &[Surface],
        skip: Option<SurfaceIx>,
    ) -> bool {
        if self.negated {
            for entry in &self.surfaces {
                if Some(entry.surface) == skip {
                    return true;
                }
                if surface_table[entry.surface].sense(pos) != entry.sense {
                    return true;
                }
            }
            false
        } else {
            for entry in &self.surfaces {
                if Some(entry.surface) == skip {
                    continue;
                }
                if surface_table[entry.surface].sense(pos) != entry.sense {
                    return false;
                }
            }
            true
        }
    }

    /// Nearest surface this cell's boundary is hit along `dir` from `pos`, with the
    /// sense the point held on that surface just before crossing. `None` if the ray
    /// never exits through any bounding surface (a geometry error for a bounded
    /// cell, expected for an open one).
    pub fn intersect(
        &self,
        pos: Coordinate,
        dir: Direction,
        surface_table: &[Surface],
    ) -> Option<(SurfaceIx, bool, f64)> {
        let mut best: Option<(SurfaceIx, bool, f64)> = None;
        for entry in &self.surfaces {
            if let Some(d) = surface_table[entry.surface].intersect(pos, dir) {
                if best.map(|(_, _, bd)| d < bd).unwrap_or(true) {
                    best = Some((entry.surface, entry.sense, d));
                }
            }
        }
        best
    }
}
