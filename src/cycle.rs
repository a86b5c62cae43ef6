//! The cycle controller: drives one generation over the fission bank, advances
//! the master RNG, updates k-eff, and swaps banks between generations. Grounded
//! on `KeffSimulation::launch`/`KeffSimulation::source` in
//! `Environment/Simulation.cpp`.

use crate::driver::Driver;
use crate::error::TransportError;
use crate::particle::CellParticle;
use crate::rng::Rng;
use crate::source::Source;
use crate::tally::TallySet;
use crate::world::World;

/// Whether a cycle's results feed the running statistics or are discarded while
/// the fission-source distribution and k-eff are still settling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleType {
    Inactive,
    Active,
}

/// What the caller needs to report after one cycle completes.
#[derive(Debug, Clone, Copy)]
pub struct CycleReport {
    pub cycle: u64,
    pub cycle_type: CycleType,
    pub keff: f64,
    pub population: usize,
}

/// Owns everything that carries state across cycles: the parent tallies, the
/// current fission bank, the k-eff estimate and the master RNG. Per-cycle
/// scratch (the local bank, per-worker child tallies) lives in
/// [`crate::driver::Driver`] instead, since it never needs to survive past one
/// cycle's join.
pub struct CycleController {
    tallies: TallySet,
    bank: Vec<CellParticle>,
    keff: f64,
    master: Rng,
    max_rng_per_history: u64,
    n_particles: usize,
    cycle: u64,
}

impl CycleController {
    /// Builds the initial fission bank by sampling `n_particles` times from
    /// `source`, each assigned weight = k-eff (1.0 at the start of a run), per
    /// the rule that only the very first inactive cycle's source particles get
    /// this treatment; every later cycle's bank already carries correct weight
    /// from banked fission progeny.
    ///
    /// The source draws reserve `max_source_samples` RNG calls per bank slot,
    /// a reservation distinct from `max_rng_per_history`'s per-history transport
    /// budget used by every later cycle.
    pub fn new(
        world: &World,
        source: &dyn Source,
        seed: u64,
        max_rng_per_history: u64,
        max_source_samples: u64,
        n_particles: usize,
    ) -> Result<Self, TransportError> {
        let mut master = Rng::new(seed);
        let keff = 1.0;
        let mut bank = Vec::with_capacity(n_particles);
        for slot in 0..n_particles {
            let mut rng = master.derive(slot as u64, max_source_samples);
            let mut sourced = source.sample(world, &mut rng).ok_or_else(|| {
                crate::error::ConfigError::MissingKey("source produced no particle".to_string())
            })?;
            sourced.particle.weight = keff;
            bank.push(sourced);
        }
        master.jump(n_particles as u64 * max_source_samples);

        Ok(CycleController {
            tallies: TallySet::new(),
            bank,
            keff,
            master,
            max_rng_per_history,
            n_particles,
            cycle: 0,
        })
    }

    pub fn tallies(&self) -> &TallySet {
        &self.tallies
    }

    pub fn keff(&self) -> f64 {
        self.keff
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn bank_size(&self) -> usize {
        self.bank.len()
    }

    /// Runs one cycle: fans the current bank's histories over `driver`, advances
    /// the master RNG past the reserved span regardless of how the work was
    /// scheduled, updates k-eff, joins tallies if this is an active cycle, and
    /// replaces the bank with the flattened progeny of this cycle.
    pub fn run_cycle(
        &mut self,
        world: &World,
        driver: &Driver,
        cycle_type: CycleType,
    ) -> Result<CycleReport, TransportError> {
        let n_bank = self.bank.len();
        let outcome = driver.run_cycle(
            world,
            &self.bank,
            &self.master,
            self.keff,
            self.cycle,
            self.max_rng_per_history,
        )?;

        self.master.jump(n_bank as u64 * self.max_rng_per_history);
        self.keff = outcome.population / self.n_particles as f64;

        if cycle_type == CycleType::Active {
            let mut children = outcome.children;
            self.tallies.join_and_accumulate(&mut children, n_bank);
        }

        self.bank = outcome.local_bank.into_iter().flatten().collect();

        let report = CycleReport {
            cycle: self.cycle,
            cycle_type,
            keff: self.keff,
            population: self.bank.len(),
        };
        self.cycle += 1;
        Ok(report)
    }
}
