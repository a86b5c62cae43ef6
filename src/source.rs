//! Initial-particle samplers, grounded on `ParticleSource.hpp`'s external
//! `sample(rng) -> (CellRef, Particle)` contract. The engine treats the source
//! as an external collaborator; this module supplies two reference
//! implementations so the crate runs end to end without a real input deck.

use crate::geometry::Coordinate;
use crate::particle::{CellParticle, Particle};
use crate::physics::reaction::isotropic;
use crate::physics::Energy;
use crate::rng::Rng;
use crate::world::World;

/// Produces an initial weight-1 particle for the first inactive cycle's fission
/// bank. `None` signals the sampler could not place a particle inside a
/// material-bearing cell within its attempt budget.
pub trait Source: Send + Sync {
    fn sample(&self, world: &World, rng: &mut Rng) -> Option<CellParticle>;
}

/// A fixed point, monoenergetic source. Fails only if the point itself lies
/// outside every cell or inside a void one.
pub struct PointSource {
    pub position: Coordinate,
    pub energy: Energy,
}

impl Source for PointSource {
    fn sample(&self, world: &World, rng: &mut Rng) -> Option<CellParticle> {
        let cell = world.geometry.find_cell(self.position)?;
        world.geometry.cell(cell).material?;
        let dir = isotropic(rng);
        Some(CellParticle::new(
            cell,
            Particle::new(self.position, dir, self.energy, 1.0),
        ))
    }
}

/// A uniform distribution over an axis-aligned box, monoenergetic, rejecting
/// points that fall outside the geometry or into a void cell up to
/// `max_attempts` times.
pub struct BoxSource {
    pub min: Coordinate,
    pub max: Coordinate,
    pub energy: Energy,
    pub max_attempts: usize,
}

impl Source for BoxSource {
    fn sample(&self, world: &World, rng: &mut Rng) -> Option<CellParticle> {
        for _ in 0..self.max_attempts {
            let pos = Coordinate::new(
                uniform_between(self.min.x, self.max.x, rng),
                uniform_between(self.min.y, self.max.y, rng),
                uniform_between(self.min.z, self.max.z, rng),
            );
            let Some(cell) = world.geometry.find_cell(pos) else {
                continue;
            };
            if world.geometry.cell(cell).material.is_none() {
                continue;
            }
            let dir = isotropic(rng);
            return Some(CellParticle::new(cell, Particle::new(pos, dir, self.energy, 1.0)));
        }
        None
    }
}

fn uniform_between(lo: f64, hi: f64, rng: &mut Rng) -> f64 {
    lo + (hi - lo) * rng.uniform()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::surface::BoundaryCondition;
    use crate::geometry::{cell::CellSurface, Cell, Geometry, Surface};
    use crate::physics::grid::MasterGrid;

    fn unit_sphere_world() -> World {
        let surfaces = vec![Surface::sphere(0, Coordinate::zero(), 1.0, BoundaryCondition::Vacuum)];
        let cells = vec![Cell::new(
            0,
            vec![CellSurface { surface: 0, sense: false }],
            None,
        )];
        World::new(
            Geometry::new(surfaces, cells),
            Vec::new(),
            MasterGrid::build([[1e-11, 20.0].as_slice()]),
            400.0,
            1.0,
        )
    }

    #[test]
    fn point_source_outside_geometry_yields_none() {
        let world = unit_sphere_world();
        let source = PointSource {
            position: Coordinate::new(5.0, 0.0, 0.0),
            energy: 2.0,
        };
        let mut rng = Rng::new(7);
        assert!(source.sample(&world, &mut rng).is_none());
    }

    #[test]
    fn box_source_gives_up_after_max_attempts_outside_geometry() {
        let world = unit_sphere_world();
        let source = BoxSource {
            min: Coordinate::new(5.0, 5.0, 5.0),
            max: Coordinate::new(6.0, 6.0, 6.0),
            energy: 2.0,
            max_attempts: 10,
        };
        let mut rng = Rng::new(8);
        assert!(source.sample(&world, &mut rng).is_none());
    }
}
