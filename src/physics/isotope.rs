//! Continuous-energy physics view of a single isotope, grounded on
//! `AceIsotopeBase` in `AceIsotope.cpp`: total/absorption/elastic/fission cross
//! sections sharing one child-grid lookup, reaction-channel sampling, and the
//! composite-vs-chance fission setup logic of `setFissionReaction`.

use log::warn;

use crate::error::PhysicsError;
use crate::physics::grid::{lerp, ChildGrid, Energy, MasterGrid};
use crate::physics::nu::NuSampler;
use crate::physics::reaction::Reaction;
use crate::rng::Rng;

/// Raw per-isotope tabulation as it would arrive from a parsed continuous-energy
/// table: the external collaborator this module treats as already loaded.
#[derive(Debug, Clone)]
pub struct IsotopeSpec {
    pub name: String,
    pub awr: f64,
    pub energies: Vec<Energy>,
    pub total_xs: Vec<f64>,
    pub elastic_xs: Vec<f64>,
    /// Empty if the isotope has no absorption cross section (e.g. free hydrogen
    /// scatterers in the original's 1002 special case).
    pub absorption_xs: Vec<f64>,
    /// `Some` when this isotope has a single composite MT=18 fission cross
    /// section; see `chance_fission_xs` for the split-chance case.
    pub fission_xs: Option<Vec<f64>>,
    /// `(mt, xs)` for first/second/third/fourth-chance fission (19, 20, 21, 38),
    /// used instead of `fission_xs` when the table splits fission by chance.
    pub chance_fission_xs: Vec<(u32, Vec<f64>)>,
    /// Non-elastic, non-fission secondary-particle channels, e.g. (n,2n).
    pub inelastic_channels: Vec<(u32, Vec<f64>)>,
    pub nu: Option<NuSampler>,
}

/// The read-only physics view the transport loop queries during a collision.
#[derive(Debug, Clone)]
pub struct IsotopeView {
    pub name: String,
    pub awr: f64,
    energies: Vec<Energy>,
    child_grid: ChildGrid,
    total_xs: Vec<f64>,
    elastic_xs: Vec<f64>,
    absorption_xs: Vec<f64>,
    fission_xs: Vec<f64>,
    inelastic_channels: Vec<(u32, Vec<f64>)>,
    chance_fission_tables: Vec<(u32, Vec<f64>)>,
    fission_reaction: Option<Reaction>,
    nu: Option<NuSampler>,
    fissile: bool,
}

impl IsotopeView {
    pub fn build(spec: IsotopeSpec, master_grid: &MasterGrid) -> Result<Self, PhysicsError> {
        if spec.energies.len() < 2 || spec.energies.len() != spec.total_xs.len() {
            return Err(PhysicsError::InvalidGrid {
                isotope: spec.name.clone(),
            });
        }
        let child_grid = master_grid.push_child(&spec.name, &spec.energies)?;

        let absorption_xs = if spec.absorption_xs.is_empty() {
            vec![0.0; spec.total_xs.len()]
        } else {
            spec.absorption_xs
        };

        let (fissile, fission_xs, fission_reaction) = Self::build_fission(&spec)?;
        let chance_fission_tables = spec.chance_fission_xs;

        Ok(IsotopeView {
            name: spec.name,
            awr: spec.awr,
            energies: spec.energies,
            child_grid,
            total_xs: spec.total_xs,
            elastic_xs: spec.elastic_xs,
            absorption_xs,
            fission_xs,
            inelastic_channels: spec.inelastic_channels,
            chance_fission_tables,
            fission_reaction,
            nu: spec.nu,
            fissile,
        })
    }

    /// Mirrors `AceIsotopeBase::setFissionReaction`: prefer a single composite
    /// MT=18 cross section; otherwise synthesize one from whichever
    /// first/second/third/fourth-chance channels are present, summing their cross
    /// sections. A fissile isotope with no NU data is demoted to non-fissile with
    /// a warning, matching the original's compatibility behaviour.
    fn build_fission(
        spec: &IsotopeSpec,
    ) -> Result<(bool, Vec<f64>, Option<Reaction>), PhysicsError> {
        let n = spec.total_xs.len();

        if let Some(fission_xs) = &spec.fission_xs {
            if fission_xs.len() != n {
                return Err(PhysicsError::InvalidGrid {
                    isotope: spec.name.clone(),
                });
            }
            return match &spec.nu {
                Some(_) => Ok((
                    true,
                    fission_xs.clone(),
                    Some(Reaction::Fission {
                        spectrum: crate::physics::reaction::FissionSpectrum::thermal_u235(),
                    }),
                )),
                None => {
                    warn!(
                        "isotope {} has a fission cross section but no NU block; demoting to non-fissile",
                        spec.name
                    );
                    Ok((false, vec![0.0; n], None))
                }
            };
        }

        if !spec.chance_fission_xs.is_empty() {
            let mut composite = vec![0.0; n];
            for (_, xs) in &spec.chance_fission_xs {
                if xs.len() != n {
                    return Err(PhysicsError::InvalidGrid {
                        isotope: spec.name.clone(),
                    });
                }
                for (c, x) in composite.iter_mut().zip(xs) {
                    *c += x;
                }
            }
            return match &spec.nu {
                Some(_) => {
                    let chances = spec
                        .chance_fission_xs
                        .iter()
                        .map(|(mt, _)| (*mt, crate::physics::reaction::FissionSpectrum::thermal_u235()))
                        .collect();
                    Ok((
                        true,
                        composite,
                        Some(Reaction::ChanceFission { chances }),
                    ))
                }
                None => {
                    warn!(
                        "isotope {} has chance-fission cross sections but no NU block; demoting to non-fissile",
                        spec.name
                    );
                    Ok((false, vec![0.0; n], None))
                }
            };
        }

        Ok((false, vec![0.0; n], None))
    }

    pub fn is_fissile(&self) -> bool {
        self.fissile
    }

    fn locate(&self, master_idx: usize, energy: Energy) -> (usize, f64) {
        self.child_grid.index(master_idx, &self.energies, energy)
    }

    fn prob(&self, table: &[f64], master_idx: usize, energy: Energy) -> f64 {
        let (idx, factor) = self.locate(master_idx, energy);
        let value = lerp(table, idx, factor);
        let total = lerp(&self.total_xs, idx, factor);
        if total > 0.0 { value / total } else { 0.0 }
    }

    pub fn total_xs(&self, master_idx: usize, energy: Energy) -> f64 {
        let (idx, factor) = self.locate(master_idx, energy);
        lerp(&self.total_xs, idx, factor)
    }

    pub fn fission_xs(&self, master_idx: usize, energy: Energy) -> f64 {
        let (idx, factor) = self.locate(master_idx, energy);
        lerp(&self.fission_xs, idx, factor)
    }

    pub fn absorption_prob(&self, master_idx: usize, energy: Energy) -> f64 {
        self.prob(&self.absorption_xs, master_idx, energy)
    }

    pub fn fission_prob(&self, master_idx: usize, energy: Energy) -> f64 {
        self.prob(&self.fission_xs, master_idx, energy)
    }

    pub fn elastic_prob(&self, master_idx: usize, energy: Energy) -> f64 {
        self.prob(&self.elastic_xs, master_idx, energy)
    }

    pub fn nu(&self, energy: Energy) -> f64 {
        self.nu.as_ref().map(|s| s.nu(energy)).unwrap_or(0.0)
    }

    pub fn fission_reaction(&self) -> Option<&Reaction> {
        self.fission_reaction.as_ref()
    }

    /// Cross sections of each chance-fission channel at `energy`, in declaration
    /// order, for weighting which chance fires. Empty for composite (non-chance)
    /// fission.
    pub fn chance_fission_xs(&self, master_idx: usize, energy: Energy) -> Vec<f64> {
        let (idx, factor) = self.locate(master_idx, energy);
        self.chance_fission_tables
            .iter()
            .map(|(_, xs)| lerp(xs, idx, factor))
            .collect()
    }

    /// Samples a non-elastic, non-fission channel's MT proportional to each
    /// channel's cross section at `energy`, mirroring `AceIsotopeBase::inelastic`'s
    /// use of a secondary-reaction sampler over the channels that carry angular
    /// data. Falls back to elastic scattering if no such channel exists.
    pub fn sample_inelastic(&self, master_idx: usize, energy: Energy, rng: &mut Rng) -> u32 {
        if self.inelastic_channels.is_empty() {
            return 2; // elastic MT, matching the original's fallback
        }
        let (idx, factor) = self.locate(master_idx, energy);
        let values: Vec<f64> = self
            .inelastic_channels
            .iter()
            .map(|(_, xs)| lerp(xs, idx, factor))
            .collect();
        let total: f64 = values.iter().sum();
        if total <= 0.0 {
            return 2;
        }
        let mut target = rng.uniform() * total;
        for ((mt, _), v) in self.inelastic_channels.iter().zip(&values) {
            if target < *v {
                return *mt;
            }
            target -= v;
        }
        self.inelastic_channels.last().map(|(mt, _)| *mt).unwrap_or(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_spec(name: &str, fissile: bool) -> IsotopeSpec {
        IsotopeSpec {
            name: name.to_string(),
            awr: 235.0,
            energies: vec![1e-11, 1.0, 20.0],
            total_xs: vec![10.0, 5.0, 2.0],
            elastic_xs: vec![4.0, 2.0, 1.0],
            absorption_xs: vec![5.0, 2.5, 0.9],
            fission_xs: if fissile {
                Some(vec![1.0, 0.5, 0.1])
            } else {
                None
            },
            chance_fission_xs: Vec::new(),
            inelastic_channels: Vec::new(),
            nu: if fissile {
                Some(NuSampler::Fixed(2.43))
            } else {
                None
            },
        }
    }

    #[test]
    fn probability_closure_holds_at_grid_points() {
        let spec = toy_spec("U235", true);
        let grid = MasterGrid::build([spec.energies.as_slice()]);
        let view = IsotopeView::build(spec, &grid).unwrap();
        for &e in &[1e-11, 1.0, 19.999] {
            let idx = grid.locate(e);
            let pa = view.absorption_prob(idx, e);
            let pe = view.elastic_prob(idx, e);
            assert!((pa + pe - 1.0).abs() < 1e-9, "pa={pa} pe={pe} at e={e}");
        }
    }

    #[test]
    fn missing_nu_block_demotes_to_non_fissile() {
        let mut spec = toy_spec("Weird", true);
        spec.nu = None;
        let grid = MasterGrid::build([spec.energies.as_slice()]);
        let view = IsotopeView::build(spec, &grid).unwrap();
        assert!(!view.is_fissile());
    }

    #[test]
    fn non_fissile_isotope_has_zero_fission_prob() {
        let spec = toy_spec("O16", false);
        let grid = MasterGrid::build([spec.energies.as_slice()]);
        let view = IsotopeView::build(spec, &grid).unwrap();
        assert_eq!(view.fission_prob(0, 1e-11), 0.0);
    }
}
