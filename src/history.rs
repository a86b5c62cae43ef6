//! Single-neutron random walk from birth to death, grounded on
//! `KeffSimulation::cycle` in `Environment/Simulation.cpp`: the Transport/Collide
//! state machine that ray-traces through the CSG tree, samples an interaction
//! distance, resolves the reaction channel, and banks fission progeny.

use crate::error::{NumericError, TransportError};
use crate::geometry::{walker, CellIx};
use crate::particle::{CellParticle, Particle};
use crate::physics::kinematics::elastic_scatter;
use crate::physics::reaction::{MT_N2N, MT_N3N, MT_N4N};
use crate::physics::uses_free_gas;
use crate::rng::Rng;
use crate::tally::{ChildTally, TallyKind};
use crate::world::World;

/// Runs one neutron history to completion, accumulating leakage/absorption/
/// reaction/k-eff estimators into `tally` and appending any banked fission
/// secondaries to `progeny`. Returns the scalar population contribution (number
/// of secondaries banked) the cycle controller sums into the cycle total.
pub fn run_history(
    world: &World,
    cycle: u64,
    keff: f64,
    rng: &mut Rng,
    start: CellParticle,
    tally: &mut ChildTally,
    progeny: &mut Vec<CellParticle>,
) -> Result<f64, TransportError> {
    let mut cell = start.cell;
    let mut particle = start.particle;
    let mut population = 0.0;

    while particle.is_alive() {
        if world.geometry.cell(cell).material.is_none() {
            match enter_non_void(world, &mut cell, &mut particle)? {
                Some(()) => {}
                None => {
                    tally.add(TallyKind::Leakage, particle.weight);
                    particle.kill();
                    break;
                }
            }
        }

        let mut material = world
            .material(world.geometry.cell(cell).material)
            .expect("enter_non_void guarantees a material-bearing cell");
        let mut crossing = walker::nearest_surface(&world.geometry, cell, particle.pos, particle.dir)?;
        let mut mfp = material.mean_free_path(&world.master_grid, particle.energy);
        let mut collision_distance = sample_flight_distance(rng, mfp);

        let collided = loop {
            let step = collision_distance.min(crossing.distance);
            if material.is_fissile() {
                let nu_fission = material.nu_fission_macro_xs(&world.master_grid, particle.energy);
                tally.add(TallyKind::KeffTrk, particle.weight * step * nu_fission);
            }

            if collision_distance < crossing.distance {
                break true;
            }

            match walker::cross(&world.geometry, crossing, cell, particle.pos, &mut particle.dir)? {
                None => {
                    tally.add(TallyKind::Leakage, particle.weight);
                    particle.kill();
                    break false;
                }
                Some((next_cell, next_pos)) => {
                    particle.pos = next_pos;
                    collision_distance -= crossing.distance;
                    cell = next_cell;

                    if world.geometry.cell(cell).material.is_none() {
                        match enter_non_void(world, &mut cell, &mut particle)? {
                            Some(()) => {}
                            None => {
                                tally.add(TallyKind::Leakage, particle.weight);
                                particle.kill();
                                break false;
                            }
                        }
                    }

                    let next_material = world
                        .material(world.geometry.cell(cell).material)
                        .expect("enter_non_void guarantees a material-bearing cell");
                    crossing =
                        walker::nearest_surface(&world.geometry, cell, particle.pos, particle.dir)?;
                    if !std::ptr::eq(next_material, material) {
                        mfp = next_material.mean_free_path(&world.master_grid, particle.energy);
                        collision_distance = sample_flight_distance(rng, mfp);
                    }
                    material = next_material;
                }
            }
        };

        if !collided {
            break;
        }

        particle.pos = particle.pos + particle.dir * collision_distance;
        check_finite(&particle, cell, cycle)?;

        if material.is_fissile() {
            let fission_macro = material.fission_macro_xs(&world.master_grid, particle.energy);
            let nu_fission_macro = material.nu_fission_macro_xs(&world.master_grid, particle.energy);
            let nubar_material = if fission_macro > 0.0 {
                nu_fission_macro / fission_macro
            } else {
                0.0
            };
            tally.add(TallyKind::KeffCol, particle.weight * nubar_material);
        }

        let master_idx = world.master_grid.locate(particle.energy);
        let isotope = material.sample_isotope(&world.master_grid, particle.energy, rng);
        let pa = isotope.absorption_prob(master_idx, particle.energy);
        let pe = isotope.elastic_prob(master_idx, particle.energy);
        let xi = rng.uniform();

        if xi < pa {
            tally.add(TallyKind::Absorption, particle.weight);
            if isotope.is_fissile() {
                let pf = isotope.fission_prob(master_idx, particle.energy);
                let nubar = isotope.nu(particle.energy);
                if pa > 0.0 {
                    tally.add(TallyKind::KeffAbs, particle.weight * (pf / pa) * nubar);
                }
                if xi > pa - pf {
                    if let Some(reaction) = isotope.fission_reaction() {
                        let mu = nubar * particle.weight / keff;
                        let floor = mu.floor();
                        let count = if rng.uniform() < mu - floor {
                            floor as u64 + 1
                        } else {
                            floor as u64
                        };
                        let chance_xs = isotope.chance_fission_xs(master_idx, particle.energy);
                        for _ in 0..count {
                            if let Some((energy, dir)) = reaction.sample_fission(&chance_xs, rng) {
                                let child = Particle::new(particle.pos, dir, energy, 1.0);
                                progeny.push(CellParticle::new(cell, child));
                                population += 1.0;
                            }
                        }
                    }
                }
            }
            particle.kill();
            break;
        }

        if xi - pa <= pe {
            scatter(world, material, isotope.awr, &mut particle, rng);
        } else {
            let mt = isotope.sample_inelastic(master_idx, particle.energy, rng);
            let kind = match mt {
                MT_N2N => Some(TallyKind::N2N),
                MT_N3N => Some(TallyKind::N3N),
                MT_N4N => Some(TallyKind::N4N),
                _ => None,
            };
            if let Some(kind) = kind {
                tally.add(kind, particle.weight);
            }
            scatter(world, material, isotope.awr, &mut particle, rng);
        }
        check_finite(&particle, cell, cycle)?;
    }

    Ok(population)
}

/// Draws `-ln(xi) * mfp`, the exponential flight distance to the next collision.
fn sample_flight_distance(rng: &mut Rng, mfp: f64) -> f64 {
    -(rng.uniform().max(f64::MIN_POSITIVE)).ln() * mfp
}

/// Walks a particle through a void cell into the next material-bearing one,
/// updating `cell` in place. `Ok(None)` means the particle leaked out of the
/// system instead.
fn enter_non_void(
    world: &World,
    cell: &mut CellIx,
    particle: &mut Particle,
) -> Result<Option<()>, TransportError> {
    match walker::advance_through_void(&world.geometry, *cell, &mut particle.pos, &mut particle.dir)? {
        None => Ok(None),
        Some(next_cell) => {
            *cell = next_cell;
            Ok(Some(()))
        }
    }
}

/// Applies elastic-like scattering kinematics (shared by true elastic collisions
/// and the analog (n,xn) channels, which change energy and direction in the lab
/// frame but keep a single tracked neutron in this core).
fn scatter(
    world: &World,
    material: &crate::physics::Material,
    awr: f64,
    particle: &mut Particle,
    rng: &mut Rng,
) {
    let free_gas = uses_free_gas(
        particle.energy,
        awr,
        material.temperature(),
        world.energy_freegas_threshold,
        world.awr_freegas_threshold,
    );
    let (energy, dir) = elastic_scatter(
        particle.dir,
        particle.energy,
        awr,
        material.temperature(),
        free_gas,
        rng,
    );
    particle.energy = energy;
    particle.dir = dir;
}

fn check_finite(particle: &Particle, cell: CellIx, cycle: u64) -> Result<(), TransportError> {
    let Some(field) = particle.first_non_finite_field() else {
        return Ok(());
    };
    let value = match field {
        "pos" => particle.pos.x,
        "dir" => particle.dir.x,
        "energy" => particle.energy,
        "weight" => particle.weight,
        _ => f64::NAN,
    };
    Err(TransportError::Numeric(NumericError {
        field,
        value,
        cell,
        cycle,
    }))
}
