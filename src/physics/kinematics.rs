//! Elastic-scattering kinematics: two-body collision in the center-of-mass frame
//! with isotropic CM scattering, optionally against a thermally-moving free-gas
//! target rather than one at rest. The free/at-rest choice is made by the caller
//! via [`super::uses_free_gas`]; this module only does the vector algebra once
//! that choice is made.
//!
//! The target velocity sampling here sample each target velocity component
//! independently from a Maxwellian at the material temperature. Production
//! free-gas treatments additionally weight target speed by the neutron-target
//! relative speed (faster-moving targets are hit more often); we do not apply
//! that correction, which matters most very close to the free-gas threshold.

use rand::distr::Distribution;
use rand_distr::StandardNormal;

use crate::geometry::Direction;
use crate::physics::grid::Energy;
use crate::physics::reaction::isotropic;
use crate::physics::BOLTZMANN_MEV_PER_K;
use crate::rng::Rng;

/// Samples a target velocity (in the same speed units as `sqrt(energy)`) from an
/// isotropic Maxwellian at `temperature` for a nuclide of mass ratio `awr`.
pub fn sample_free_gas_velocity(awr: f64, temperature: f64, rng: &mut Rng) -> Direction {
    let sigma = (BOLTZMANN_MEV_PER_K * temperature / awr).sqrt();
    let gaussian = |rng: &mut Rng| -> f64 { StandardNormal.sample(rng) };
    Direction::new(gaussian(rng), gaussian(rng), gaussian(rng)) * sigma
}

/// Scatters a neutron elastically off a target of mass ratio `awr`, returning the
/// post-collision (energy, direction). `free_gas` selects whether the target is
/// given a sampled thermal velocity or treated as at rest.
pub fn elastic_scatter(
    dir: Direction,
    energy: Energy,
    awr: f64,
    temperature: f64,
    free_gas: bool,
    rng: &mut Rng,
) -> (Energy, Direction) {
    let speed_n = energy.max(0.0).sqrt();
    let v_n = dir * speed_n;
    let v_t = if free_gas {
        sample_free_gas_velocity(awr, temperature, rng)
    } else {
        Direction::zero()
    };

    let v_rel = v_n - v_t;
    let speed_rel = v_rel.norm();
    if speed_rel < 1e-12 {
        return (energy, dir);
    }

    let v_cm = (v_n + v_t * awr) / (1.0 + awr);
    let new_rel_dir = isotropic(rng);
    let new_v_n = v_cm + new_rel_dir * (speed_rel * awr / (1.0 + awr));

    let new_energy = new_v_n.norm_squared();
    let new_dir = new_v_n.normalize();
    (new_energy, new_dir)
}
