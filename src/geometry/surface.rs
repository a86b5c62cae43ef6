//! Implicit oriented surfaces: `f(x) = 0`, sense `= sign(f(x)) >= 0`, and the
//! per-kind distance-to-intersection formula, expressed as a closed tagged enum
//! instead of virtual dispatch since the set of surface kinds this engine needs
//! (planar, spherical, cylindrical) is fixed.

use super::{CellIx, Coordinate, Direction};
use crate::error::GeometryError;

/// What happens to a particle crossing this surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BoundaryCondition {
    /// Ordinary interface: the particle continues into the neighbour cell.
    Transmission,
    /// Specular reflection: direction is mirrored about the surface normal.
    Reflecting,
    /// Outer boundary of the simulable domain: the particle leaks out.
    Vacuum,
}

/// The closed set of implicit surface kinds this engine supports.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SurfaceKind {
    /// `f(x) = dot(normal, x) - d`
    Plane { normal: Direction, d: f64 },
    /// `f(x) = |x - center|^2 - r^2`
    Sphere { center: Coordinate, radius: f64 },
    /// Infinite cylinder about an axis through `center` parallel to `axis`
    /// (`axis` must be a unit vector): `f(x) = |perp(x - center)|^2 - r^2`.
    Cylinder {
        center: Coordinate,
        axis: Direction,
        radius: f64,
    },
}

/// An oriented surface: its implicit function plus the neighbour cells on each side
/// and the boundary condition applied when a particle crosses it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Surface {
    pub id: u64,
    pub kind: SurfaceKind,
    pub boundary: BoundaryCondition,
    /// Neighbour cell when approached with sense `true` (positive side).
    pub neighbor_pos: Option<CellIx>,
    /// Neighbour cell when approached with sense `false` (negative side).
    pub neighbor_neg: Option<CellIx>,
}

impl Surface {
    pub fn plane(id: u64, normal: Direction, d: f64, boundary: BoundaryCondition) -> Self {
        Surface {
            id,
            kind: SurfaceKind::Plane {
                normal: normal.normalize(),
                d,
            },
            boundary,
            neighbor_pos: None,
            neighbor_neg: None,
        }
    }

    pub fn sphere(id: u64, center: Coordinate, radius: f64, boundary: BoundaryCondition) -> Self {
        Surface {
            id,
            kind: SurfaceKind::Sphere { center, radius },
            boundary,
            neighbor_pos: None,
            neighbor_neg: None,
        }
    }

    pub fn cylinder(
        id: u64,
        center: Coordinate,
        axis: Direction,
        radius: f64,
        boundary: BoundaryCondition,
    ) -> Self {
        Surface {
            id,
            kind: SurfaceKind::Cylinder {
                center,
                axis: axis.normalize(),
                radius,
            },
            boundary,
            neighbor_pos: None,
            neighbor_neg: None,
        }
    }

    pub fn with_neighbors(mut self, pos: Option<CellIx>, neg: Option<CellIx>) -> Self {
        self.neighbor_pos = pos;
        self.neighbor_neg = neg;
        self
    }

    /// The implicit function `f(x)`.
    fn function(&self, pos: Coordinate) -> f64 {
        match self.kind {
            SurfaceKind::Plane { normal, d } => normal.dot(&pos) - d,
            SurfaceKind::Sphere { center, radius } => {
                (pos - center).norm_squared() - radius * radius
            }
            SurfaceKind::Cylinder {
                center,
                axis,
                radius,
            } => {
                let rel = pos - center;
                let along = rel.dot(&axis);
                let perp_sq = rel.norm_squared() - along * along;
                perp_sq - radius * radius
            }
        }
    }

    /// Sense of `pos` with respect to this surface: `true` iff `f(pos) >= 0`.
    #[inline]
    pub fn sense(&self, pos: Coordinate) -> bool {
        self.function(pos) >= 0.0
    }

    /// Outward unit normal at a point assumed to lie on the surface.
    pub fn normal(&self, pos: Coordinate) -> Direction {
        match self.kind {
            SurfaceKind::Plane { normal, .. } => normal,
            SurfaceKind::Sphere { center, .. } => (pos - center).normalize(),
            SurfaceKind::Cylinder { center, axis, .. } => {
                let rel = pos - center;
                let along = rel.dot(&axis);
                (rel - axis * along).normalize()
            }
        }
    }

    /// Distance to intersection with `dir` from `pos`, if any positive root
    /// exists. Returns `None` for a miss or a purely backward/tangential hit.
    pub fn intersect(&self, pos: Coordinate, dir: Direction) -> Option<f64> {
        match self.kind {
            SurfaceKind::Plane { normal, d } => {
                let denom = normal.dot(&dir);
                if denom.abs() < f64::EPSILON {
                    return None;
                }
                let t = (d - normal.dot(&pos)) / denom;
                positive(t)
            }
            SurfaceKind::Sphere { center, radius } => {
                let rel = pos - center;
                let b = rel.dot(&dir);
                let c = rel.norm_squared() - radius * radius;
                smallest_positive_root(1.0, b, c)
            }
            SurfaceKind::Cylinder {
                center,
                axis,
                radius,
            } => {
                let rel = pos - center;
                let dir_perp = dir - axis * dir.dot(&axis);
                let rel_perp = rel - axis * rel.dot(&axis);
                let a = dir_perp.norm_squared();
                if a < f64::EPSILON {
                    return None; // travelling parallel to the axis: never crosses
                }
                let b = rel_perp.dot(&dir_perp);
                let c = rel_perp.norm_squared() - radius * radius;
                smallest_positive_root(a, b, c)
            }
        }
    }

    /// Resolves a crossing of this surface, applying its boundary condition.
    ///
    /// `sense_in` is the sense the particle held just before crossing, i.e. the side
    /// it is leaving. On `Transmission` the neighbour on the *opposite* side is
    /// returned; `dir` is left untouched by the caller. On `Reflecting` `dir` is
    /// mirrored in place about the surface normal and the particle stays in the
    /// same cell. On `Vacuum` `Ok(None)` signals the particle has genuinely left
    /// the domain. A `Transmission`/`Reflecting` surface whose required-side
    /// neighbour was never registered is a hole in the geometry deck, not a
    /// leak, and is reported as [`GeometryError::DanglingNeighbor`] instead of
    /// being silently treated as one.
    pub fn cross(
        &self,
        pos: Coordinate,
        dir: &mut Direction,
        sense_in: bool,
        leaving_cell: CellIx,
    ) -> Result<Option<CellIx>, GeometryError> {
        match self.boundary {
            BoundaryCondition::Vacuum => Ok(None),
            BoundaryCondition::Transmission => {
                let neighbor = if sense_in { self.neighbor_neg } else { self.neighbor_pos };
                neighbor.map(Some).ok_or(GeometryError::DanglingNeighbor {
                    surface: self.id as usize,
                    target: leaving_cell,
                })
            }
            BoundaryCondition::Reflecting => {
                let n = self.normal(pos);
                let d = *dir;
                *dir = d - n * (2.0 * d.dot(&n));
                let neighbor = if sense_in { self.neighbor_pos } else { self.neighbor_neg };
                neighbor.map(Some).ok_or(GeometryError::DanglingNeighbor {
                    surface: self.id as usize,
                    target: leaving_cell,
                })
            }
        }
    }
}

/// Smallest strictly-positive root of `a*t^2 + 2*b*t + c = 0` (quadratic in the
/// "half-b" form that falls out of sphere/cylinder intersections), or `None`.
fn smallest_positive_root(a: f64, b: f64, c: f64) -> Option<f64> {
    let disc = b * b - a * c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t1 = (-b - sq) / a;
    let t2 = (-b + sq) / a;
    match (positive(t1), positive(t2)) {
        (Some(t1), Some(t2)) => Some(t1.min(t2)),
        (Some(t), None) | (None, Some(t)) => Some(t),
        (None, None) => None,
    }
}

#[inline]
fn positive(t: f64) -> Option<f64> {
    if t > 0.0 && t.is_finite() {
        Some(t)
    } else {
        None
    }
}
