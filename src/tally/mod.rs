//! # Tally Module - Parent/Child Accumulation
//!
//! The eight running estimators a criticality run reports, grounded on the
//! `Tally`/`ChildTally` pair in `Environment/Simulation.cpp` (`KeffSimulation`'s
//! constructor lists the eight by name; `getTallies`/`setTallies` implement the
//! pooled borrow/return the driver uses).
//!
//! The original gives each metric its own `ChildTally` object and borrows a
//! `vector<ChildTally*>` sized to the metric count. Here one [`ChildTally`] is a
//! fixed-size array covering all eight metrics, so a worker borrows a single
//! value from the pool instead of a vector of them — same borrow/return
//! discipline, one fewer allocation per borrow.

pub mod pool;

/// The eight fixed estimators a run reports. Order matches the constructor in
/// `KeffSimulation::KeffSimulation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TallyKind {
    Leakage,
    Absorption,
    N2N,
    N3N,
    N4N,
    KeffAbs,
    KeffCol,
    KeffTrk,
}

pub const NUM_TALLIES: usize = 8;

impl TallyKind {
    pub const ALL: [TallyKind; NUM_TALLIES] = [
        TallyKind::Leakage,
        TallyKind::Absorption,
        TallyKind::N2N,
        TallyKind::N3N,
        TallyKind::N4N,
        TallyKind::KeffAbs,
        TallyKind::KeffCol,
        TallyKind::KeffTrk,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TallyKind::Leakage => "leakage",
            TallyKind::Absorption => "absorption",
            TallyKind::N2N => "(n,2n)",
            TallyKind::N3N => "(n,3n)",
            TallyKind::N4N => "(n,4n)",
            TallyKind::KeffAbs => "keff (abs)",
            TallyKind::KeffCol => "keff (col)",
            TallyKind::KeffTrk => "keff (trk)",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A per-worker scratch accumulator for all eight metrics. Cleared and handed
/// back to the pool at the end of a cycle.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChildTally {
    values: [f64; NUM_TALLIES],
}

impl ChildTally {
    pub fn add(&mut self, kind: TallyKind, value: f64) {
        self.values[kind.index()] += value;
    }

    fn clear(&mut self) {
        self.values = [0.0; NUM_TALLIES];
    }
}

/// One metric's running statistics across completed active cycles: count, sum and
/// sum-of-squares of the per-source-particle value, so mean and standard error
/// are available at any point without replaying history.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: u64,
    sum: f64,
    sum_sq: f64,
}

impl Tally {
    /// Folds one cycle's total (summed over all joined children) into the running
    /// statistics, normalized by the number of source particles in the cycle.
    fn accumulate(&mut self, cycle_total: f64, n_source: usize) {
        let per_source = cycle_total / n_source as f64;
        self.count += 1;
        self.sum += per_source;
        self.sum_sq += per_source * per_source;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    fn stderr(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let n = self.count as f64;
        let mean = self.mean();
        let variance = (self.sum_sq / n - mean * mean).max(0.0) * n / (n - 1.0);
        (variance / n).sqrt()
    }
}

/// The mean and standard error of one tallied metric.
#[derive(Debug, Clone, Copy)]
pub struct TallyReport {
    pub kind: TallyKind,
    pub mean: f64,
    pub stderr: f64,
}

/// The parent tallies for a whole run: one running statistic per metric.
#[derive(Debug, Clone, Default)]
pub struct TallySet {
    parents: [Tally; NUM_TALLIES],
}

impl TallySet {
    pub fn new() -> Self {
        TallySet::default()
    }

    /// Joins every child in `children` into the parents and accumulates the
    /// cycle's per-source value, then clears the children for reuse. Mirrors
    /// `KeffSimulation::launch`'s active-cycle join/accumulate loop.
    pub fn join_and_accumulate(&mut self, children: &mut [ChildTally], n_source: usize) {
        for kind in TallyKind::ALL {
            let cycle_total: f64 = children.iter().map(|c| c.values[kind.index()]).sum();
            self.parents[kind.index()].accumulate(cycle_total, n_source);
        }
        for child in children.iter_mut() {
            child.clear();
        }
    }

    pub fn report(&self) -> Vec<TallyReport> {
        TallyKind::ALL
            .iter()
            .map(|&kind| TallyReport {
                kind,
                mean: self.parents[kind.index()].mean(),
                stderr: self.parents[kind.index()].stderr(),
            })
            .collect()
    }
}
