//! A material: an unordered mixture of isotopes at atomic density, exposing the
//! macroscopic cross sections and mean free path the transport loop samples
//! against. Grounded loosely on the `Material`/`getMeanFreePath`/`sampleIsotope`
//! surface implied throughout `Simulation.cpp`'s `cycle`/`nonVoid`.

use crate::error::PhysicsError;
use crate::physics::grid::{Energy, MasterGrid};
use crate::physics::isotope::IsotopeView;
use crate::rng::Rng;

/// One constituent of a material: an isotope and its atomic density in
/// atoms/barn-cm.
pub struct Nuclide {
    pub isotope: IsotopeView,
    pub density: f64,
}

/// A homogeneous mixture of nuclides. Materials are built once at startup and
/// shared read-only across worker threads for the rest of the run.
pub struct Material {
    pub name: String,
    nuclides: Vec<Nuclide>,
    fissile: bool,
    /// Material temperature in Kelvin, used for the free-gas threshold and
    /// thermal target-velocity sampling during elastic scattering.
    temperature: f64,
}

impl Material {
    pub fn build(
        name: impl Into<String>,
        nuclides: Vec<Nuclide>,
        temperature: f64,
    ) -> Result<Self, PhysicsError> {
        let name = name.into();
        if nuclides.is_empty() {
            return Err(PhysicsError::EmptyMaterial(name));
        }
        let fissile = nuclides.iter().any(|n| n.isotope.is_fissile());
        Ok(Material {
            name,
            nuclides,
            fissile,
            temperature,
        })
    }

    pub fn is_fissile(&self) -> bool {
        self.fissile
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn nuclides(&self) -> &[Nuclide] {
        &self.nuclides
    }

    /// Σ_t(E): the sum of each nuclide's microscopic total cross section weighted
    /// by its atomic density.
    pub fn total_macro_xs(&self, master_grid: &MasterGrid, energy: Energy) -> f64 {
        let idx = master_grid.locate(energy);
        self.nuclides
            .iter()
            .map(|n| n.density * n.isotope.total_xs(idx, energy))
            .sum()
    }

    /// Σ_f(E), zero for a non-fissile material.
    pub fn fission_macro_xs(&self, master_grid: &MasterGrid, energy: Energy) -> f64 {
        let idx = master_grid.locate(energy);
        self.nuclides
            .iter()
            .filter(|n| n.isotope.is_fissile())
            .map(|n| n.density * n.isotope.fission_xs(idx, energy))
            .sum()
    }

    /// ν̄Σ_f(E): fission macroscopic cross section weighted by each fissile
    /// nuclide's own ν̄(E).
    pub fn nu_fission_macro_xs(&self, master_grid: &MasterGrid, energy: Energy) -> f64 {
        let idx = master_grid.locate(energy);
        self.nuclides
            .iter()
            .filter(|n| n.isotope.is_fissile())
            .map(|n| n.density * n.isotope.fission_xs(idx, energy) * n.isotope.nu(energy))
            .sum()
    }

    /// 1 / Σ_t(E), the mean free path at `energy`.
    pub fn mean_free_path(&self, master_grid: &MasterGrid, energy: Energy) -> f64 {
        let sigma_t = self.total_macro_xs(master_grid, energy);
        if sigma_t > 0.0 { 1.0 / sigma_t } else { f64::INFINITY }
    }

    /// Samples which nuclide a collision occurs on, proportional to
    /// `density * total_xs(E)`, then returns a reference to its physics view.
    pub fn sample_isotope(
        &self,
        master_grid: &MasterGrid,
        energy: Energy,
        rng: &mut Rng,
    ) -> &IsotopeView {
        let idx = master_grid.locate(energy);
        let weights: Vec<f64> = self
            .nuclides
            .iter()
            .map(|n| n.density * n.isotope.total_xs(idx, energy))
            .collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return &self.nuclides[0].isotope;
        }
        let mut target = rng.uniform() * total;
        for (nuclide, w) in self.nuclides.iter().zip(&weights) {
            if target < *w {
                return &nuclide.isotope;
            }
            target -= w;
        }
        &self.nuclides.last().unwrap().isotope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::nu::NuSampler;

    fn fissile_isotope() -> IsotopeView {
        use crate::physics::isotope::IsotopeSpec;
        let spec = IsotopeSpec {
            name: "U235".into(),
            awr: 235.0,
            energies: vec![1e-11, 1.0, 20.0],
            total_xs: vec![10.0, 5.0, 2.0],
            elastic_xs: vec![4.0, 2.0, 1.0],
            absorption_xs: vec![5.0, 2.5, 0.9],
            fission_xs: Some(vec![1.0, 0.5, 0.1]),
            chance_fission_xs: Vec::new(),
            inelastic_channels: Vec::new(),
            nu: Some(NuSampler::Fixed(2.43)),
        };
        let grid = MasterGrid::build([spec.energies.as_slice()]);
        IsotopeView::build(spec, &grid).unwrap()
    }

    #[test]
    fn mean_free_path_is_reciprocal_of_total_xs() {
        let grid = MasterGrid::build([[1e-11, 1.0, 20.0].as_slice()]);
        let material = Material::build(
            "fuel",
            vec![Nuclide {
                isotope: fissile_isotope(),
                density: 1.0,
            }],
            300.0,
        )
        .unwrap();
        let sigma_t = material.total_macro_xs(&grid, 1e-11);
        let mfp = material.mean_free_path(&grid, 1e-11);
        assert!((sigma_t * mfp - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_material_is_rejected() {
        assert!(Material::build("empty", vec![], 300.0).is_err());
    }
}
