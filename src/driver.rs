//! Parallel driver: fans one cycle's histories over a thread pool under a
//! work-partition policy, borrowing a [`ChildTally`] per worker from a shared
//! pool. All three policies are behaviorally identical: every history derives
//! its RNG stream as `master.derive(slot, max_rng_per_history)`, a pure function
//! of its bank slot, so results never depend on how work was partitioned or in
//! what order it completed — only the policy names differ, grounded on the
//! `Simulation::launch` thread-count-independence contract.

use rayon::prelude::*;

use crate::error::TransportError;
use crate::history::run_history;
use crate::particle::CellParticle;
use crate::rng::Rng;
use crate::tally::pool::TallyPool;
use crate::tally::ChildTally;
use crate::world::World;

/// How a cycle's histories are partitioned across threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPolicy {
    /// Runs every history on the calling thread, one borrowed tally for the
    /// whole cycle. Useful for debugging and for reproducibility tests that
    /// compare against a multithreaded run.
    Single,
    /// One rayon task per history, each borrowing its own child tally.
    Rayon,
    /// Histories grouped into fixed-size chunks, one rayon task and one
    /// borrowed tally per chunk, to cut pool contention under high thread
    /// counts.
    RayonChunked,
}

impl std::str::FromStr for SchedulerPolicy {
    type Err = crate::error::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(SchedulerPolicy::Single),
            "rayon" => Ok(SchedulerPolicy::Rayon),
            "rayon_chunked" => Ok(SchedulerPolicy::RayonChunked),
            other => Err(crate::error::ConfigError::UnknownScheduler(other.to_string())),
        }
    }
}

const CHUNK_SIZE: usize = 64;

/// The result of running one cycle's worth of histories: the summed population
/// contribution, each slot's banked progeny (in slot order, so the next bank's
/// slot assignment is deterministic regardless of scheduling), and every
/// borrowed tally that was touched.
pub struct CycleOutcome {
    pub population: f64,
    pub local_bank: Vec<Vec<CellParticle>>,
    pub children: Vec<ChildTally>,
}

pub struct Driver {
    policy: SchedulerPolicy,
    pool: TallyPool,
}

impl Driver {
    pub fn new(policy: SchedulerPolicy) -> Self {
        Driver {
            policy,
            pool: TallyPool::new(),
        }
    }

    pub fn run_cycle(
        &self,
        world: &World,
        bank: &[CellParticle],
        master: &Rng,
        keff: f64,
        cycle: u64,
        max_rng_per_history: u64,
    ) -> Result<CycleOutcome, TransportError> {
        match self.policy {
            SchedulerPolicy::Single => {
                self.run_single(world, bank, master, keff, cycle, max_rng_per_history)
            }
            SchedulerPolicy::Rayon => {
                self.run_rayon(world, bank, master, keff, cycle, max_rng_per_history)
            }
            SchedulerPolicy::RayonChunked => {
                self.run_rayon_chunked(world, bank, master, keff, cycle, max_rng_per_history)
            }
        }
    }

    fn run_single(
        &self,
        world: &World,
        bank: &[CellParticle],
        master: &Rng,
        keff: f64,
        cycle: u64,
        max_rng_per_history: u64,
    ) -> Result<CycleOutcome, TransportError> {
        let mut child = self.pool.borrow();
        let mut population = 0.0;
        let mut local_bank = Vec::with_capacity(bank.len());
        for (slot, start) in bank.iter().enumerate() {
            let mut rng = master.derive(slot as u64, max_rng_per_history);
            let mut progeny = Vec::new();
            population += run_history(world, cycle, keff, &mut rng, *start, &mut child, &mut progeny)?;
            local_bank.push(progeny);
        }
        Ok(CycleOutcome {
            population,
            local_bank,
            children: vec![*child],
        })
    }

    fn run_rayon(
        &self,
        world: &World,
        bank: &[CellParticle],
        master: &Rng,
        keff: f64,
        cycle: u64,
        max_rng_per_history: u64,
    ) -> Result<CycleOutcome, TransportError> {
        let results: Vec<(f64, Vec<CellParticle>, ChildTally)> = bank
            .par_iter()
            .enumerate()
            .map(|(slot, start)| -> Result<_, TransportError> {
                let mut rng = master.derive(slot as u64, max_rng_per_history);
                let mut child = self.pool.borrow();
                let mut progeny = Vec::new();
                let population =
                    run_history(world, cycle, keff, &mut rng, *start, &mut child, &mut progeny)?;
                Ok((population, progeny, *child))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut population = 0.0;
        let mut local_bank = Vec::with_capacity(results.len());
        let mut children = Vec::with_capacity(results.len());
        for (p, progeny, child) in results {
            population += p;
            local_bank.push(progeny);
            children.push(child);
        }
        Ok(CycleOutcome {
            population,
            local_bank,
            children,
        })
    }

    fn run_rayon_chunked(
        &self,
        world: &World,
        bank: &[CellParticle],
        master: &Rng,
        keff: f64,
        cycle: u64,
        max_rng_per_history: u64,
    ) -> Result<CycleOutcome, TransportError> {
        let chunk_results: Vec<(f64, Vec<Vec<CellParticle>>, ChildTally)> = bank
            .chunks(CHUNK_SIZE)
            .collect::<Vec<_>>()
            .into_par_iter()
            .enumerate()
            .map(|(chunk_idx, chunk)| -> Result<_, TransportError> {
                let base_slot = chunk_idx * CHUNK_SIZE;
                let mut child = self.pool.borrow();
                let mut population = 0.0;
                let mut local_bank = Vec::with_capacity(chunk.len());
                for (offset, start) in chunk.iter().enumerate() {
                    let slot = (base_slot + offset) as u64;
                    let mut rng = master.derive(slot, max_rng_per_history);
                    let mut progeny = Vec::new();
                    population +=
                        run_history(world, cycle, keff, &mut rng, *start, &mut child, &mut progeny)?;
                    local_bank.push(progeny);
                }
                Ok((population, local_bank, *child))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut population = 0.0;
        let mut local_bank = Vec::with_capacity(bank.len());
        let mut children = Vec::with_capacity(chunk_results.len());
        for (p, mut chunk_local, child) in chunk_results {
            population += p;
            local_bank.append(&mut chunk_local);
            children.push(child);
        }
        Ok(CycleOutcome {
            population,
            local_bank,
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_policy_parses_known_names() {
        assert_eq!("single".parse::<SchedulerPolicy>().unwrap(), SchedulerPolicy::Single);
        assert_eq!("rayon".parse::<SchedulerPolicy>().unwrap(), SchedulerPolicy::Rayon);
        assert_eq!(
            "rayon_chunked".parse::<SchedulerPolicy>().unwrap(),
            SchedulerPolicy::RayonChunked
        );
        assert!("bogus".parse::<SchedulerPolicy>().is_err());
    }
}
