//! The cell walker: surface-crossing resolution and the void-skipping loop,
//! grounded on the free function `nonVoid` and the surface-crossing steps of
//! `KeffSimulation::cycle` in `Environment/Simulation.cpp`.

use super::{CellIx, Coordinate, Direction, Geometry, NUDGE_EPSILON, SurfaceIx};
use crate::error::GeometryError;

/// Result of moving a particle to the next surface it crosses in its current cell.
#[derive(Debug, Clone, Copy)]
pub struct Crossing {
    pub surface: SurfaceIx,
    /// Sense the particle held just before crossing.
    pub sense_in: bool,
    pub distance: f64,
}

/// Finds the nearest surface of `cell` a particle at `pos` travelling along `dir`
/// will cross.
pub fn nearest_surface(
    geometry: &Geometry,
    cell: CellIx,
    pos: Coordinate,
    dir: Direction,
) -> Result<Crossing, GeometryError> {
    geometry
        .cell(cell)
        .intersect(pos, dir, geometry.surfaces_slice())
        .map(|(surface, sense_in, distance)| Crossing {
            surface,
            sense_in,
            distance,
        })
        .ok_or(GeometryError::NoExit(cell))
}

/// Moves a particle to the surface identified by `crossing`, applies its boundary
/// condition (possibly mutating `dir` in place for a reflection), and returns the
/// new cell and the nudged position just past the surface, or `None` if the
/// particle has left the system through a vacuum boundary. `cell` is the cell the
/// particle is leaving, used only to name the hole in the deck if the required
/// neighbour for a `Transmission`/`Reflecting` surface was never registered.
pub fn cross(
    geometry: &Geometry,
    crossing: Crossing,
    cell: CellIx,
    pos: Coordinate,
    dir: &mut Direction,
) -> Result<Option<(CellIx, Coordinate)>, GeometryError> {
    let surface = geometry.surface(crossing.surface);
    let boundary_pos = pos + *dir * crossing.distance;
    match surface.cross(boundary_pos, dir, crossing.sense_in, cell)? {
        None => Ok(None),
        Some(next_cell) => {
            let nudged = boundary_pos + *dir * NUDGE_EPSILON;
            Ok(Some((next_cell, nudged)))
        }
    }
}

/// Walks a particle through any run of void cells (cells with no material) it
/// crosses into, stopping as soon as it reaches a material-bearing cell or leaves
/// the system. `pos`/`dir` are updated in place to the entry point of the returned
/// cell.
///
/// Mirrors the original's `nonVoid` loop: a transport step with no collision
/// physics, repeated until a material is found.
pub fn advance_through_void(
    geometry: &Geometry,
    mut cell: CellIx,
    pos: &mut Coordinate,
    dir: &mut Direction,
) -> Result<Option<CellIx>, GeometryError> {
    while geometry.cell(cell).material.is_none() {
        let crossing = nearest_surface(geometry, cell, *pos, *dir)?;
        match cross(geometry, crossing, cell, *pos, dir)? {
            None => return Ok(None),
            Some((next_cell, next_pos)) => {
                *pos = next_pos;
                cell = next_cell;
            }
        }
    }
    Ok(Some(cell))
}
