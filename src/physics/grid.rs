//! Master/child energy grid: a shared, sorted union of every isotope's tabulation
//! points so a single binary search locates the bin for all isotopes at once, with
//! each isotope's child grid mapping a master index straight to its own local
//! index in O(1).

use crate::error::PhysicsError;

/// Energy in MeV, matching the ACE convention the original physics tables use.
pub type Energy = f64;

/// The sorted union of tabulation points across every isotope loaded into a run.
#[derive(Debug, Clone)]
pub struct MasterGrid {
    energies: Vec<Energy>,
}

impl MasterGrid {
    /// Builds the master grid as the sorted, deduplicated union of the given
    /// per-isotope energy grids.
    pub fn build<'a>(isotope_grids: impl IntoIterator<Item = &'a [Energy]>) -> Self {
        let mut energies: Vec<Energy> = isotope_grids.into_iter().flatten().copied().collect();
        energies.sort_by(|a, b| a.partial_cmp(b).expect("non-finite energy in grid"));
        energies.dedup();
        MasterGrid { energies }
    }

    /// Locates the bin containing `energy`: the largest index `i` with
    /// `energies[i] <= energy`, clamped to `len - 2` so `i + 1` stays in range.
    pub fn locate(&self, energy: Energy) -> usize {
        match self
            .energies
            .binary_search_by(|probe| probe.partial_cmp(&energy).unwrap())
        {
            Ok(i) => i.min(self.energies.len().saturating_sub(2)),
            Err(i) => i.saturating_sub(1).min(self.energies.len().saturating_sub(2)),
        }
    }

    /// Builds a child grid mapping every master-grid index to the corresponding
    /// local index into `isotope_energies`.
    pub fn push_child(
        &self,
        isotope_name: &str,
        isotope_energies: &[Energy],
    ) -> Result<ChildGrid, PhysicsError> {
        if isotope_energies.len() < 2 {
            return Err(PhysicsError::InvalidGrid {
                isotope: isotope_name.to_string(),
            });
        }
        let offsets = self
            .energies
            .iter()
            .map(|&e| local_index(isotope_energies, e))
            .collect();
        Ok(ChildGrid { offsets })
    }
}

/// Largest index `i` with `grid[i] <= e`, clamped to `len - 2`.
fn local_index(grid: &[Energy], e: Energy) -> usize {
    match grid.binary_search_by(|probe| probe.partial_cmp(&e).unwrap()) {
        Ok(i) => i.min(grid.len() - 2),
        Err(i) => i.saturating_sub(1).min(grid.len() - 2),
    }
}

/// A per-isotope precomputed map from master-grid index to local grid index,
/// avoiding a second binary search once the master index is known.
#[derive(Debug, Clone)]
pub struct ChildGrid {
    offsets: Vec<usize>,
}

impl ChildGrid {
    /// Returns the isotope-local `(index, interpolation factor)` for a lookup
    /// already located at `master_index` in the master grid, given the isotope's
    /// own energy tabulation and the original energy.
    pub fn index(&self, master_index: usize, energies: &[Energy], energy: Energy) -> (usize, f64) {
        let idx = self.offsets[master_index];
        let (e0, e1) = (energies[idx], energies[idx + 1]);
        let factor = if e1 > e0 { (energy - e0) / (e1 - e0) } else { 0.0 };
        (idx, factor.clamp(0.0, 1.0))
    }
}

/// Linear interpolation of `table` at `(idx, factor)` as produced by
/// [`ChildGrid::index`].
#[inline]
pub fn lerp(table: &[f64], idx: usize, factor: f64) -> f64 {
    factor * (table[idx + 1] - table[idx]) + table[idx]
}
