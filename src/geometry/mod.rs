//! # Geometry Module - CSG Cells, Surfaces and the Cell Walker
//!
//! This module implements the constructive-solid-geometry model the random walk
//! ray-traces against: implicit `Surface`s, `Cell`s defined as a half-space
//! intersection (or its complement) over an ordered list of surfaces, and the
//! `CellWalker` that resolves surface crossings against their boundary condition.
//!
//! Geometry is stored in arena form — flat `Vec`s of surfaces and cells addressed by
//! `SurfaceIx`/`CellIx` indices — rather than as a graph of `Rc`/`RefCell` nodes with
//! cyclic cell<->surface back-references. A surface's neighbour cells on each side
//! are themselves just index lists, so traversal is index arithmetic and the whole
//! tree can be shared read-only across worker threads without any interior
//! mutability.
//!
//! ## Submodules
//!
//! - [`surface`]: implicit surface kinds and their sense/intersection functions
//! - [`cell`]: CSG cell membership and per-cell surface distance lookup
//! - [`walker`]: the boundary-crossing resolver used by the particle history

pub mod cell;
pub mod surface;
pub mod tests;
pub mod walker;

use crate::vector::Vec3;

/// A point in 3-space. Alias kept distinct from [`Direction`] for API clarity even
/// though both are represented by the same `Vec3` machinery.
pub type Coordinate = Vec3;
/// A direction cosine vector; invariant `‖dir‖₂ = 1` within 1 ULP after any
/// rotation.
pub type Direction = Vec3;

/// Index of a surface within a [`Geometry`]'s surface arena.
pub type SurfaceIx = usize;
/// Index of a cell within a [`Geometry`]'s cell arena.
pub type CellIx = usize;
/// Index of a material within the caller's material table. `None` denotes void.
pub type MaterialIx = Option<usize>;

/// Boundary nudge applied after a surface crossing to avoid re-intersecting the
/// surface just crossed due to floating point round-off.
pub const NUDGE_EPSILON: f64 = 1e-12;

pub use cell::Cell;
pub use surface::{BoundaryCondition, Surface};

/// Arena-backed CSG geometry: the full set of surfaces and cells for a run.
///
/// Read-only for the duration of a run; shared across worker threads behind an
/// `Arc` with no interior mutability.
#[derive(Debug, Clone)]
pub struct Geometry {
    surfaces: Vec<Surface>,
    cells: Vec<Cell>,
}

impl Geometry {
    pub fn new(surfaces: Vec<Surface>, cells: Vec<Cell>) -> Self {
        Geometry { surfaces, cells }
    }

    pub fn surface(&self, ix: SurfaceIx) -> &Surface {
        &self.surfaces[ix]
    }

    pub fn cell(&self, ix: CellIx) -> &Cell {
        &self.cells[ix]
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Full surface arena, for callers (the walker) that need to resolve a whole
    /// cell's surface list at once rather than one index at a time.
    pub(crate) fn surfaces_slice(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Point location: returns the unique cell containing `pos`, if any.
    ///
    /// At most one cell should claim a given point; we return the first match,
    /// which is the cell the caller should treat as authoritative if geometry
    /// construction ever produces overlapping cells (a bug in geometry
    /// construction, not something the walker can repair at runtime).
    pub fn find_cell(&self, pos: Coordinate) -> Option<CellIx> {
        self.cells
            .iter()
            .position(|cell| cell.contains(pos, &self.surfaces))
    }
}
