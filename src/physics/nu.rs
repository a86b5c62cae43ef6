//! Samplers for ν̄(E), the mean number of neutrons released per fission, grounded
//! on `NuSampler.hpp`'s `FixedNu`/`TabularNu` plus the polynomial form selected by
//! `buildNuSampler` in `AceIsotope.cpp`.

use super::grid::Energy;

/// The three forms a ν̄ distribution can take in a continuous-energy table.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum NuSampler {
    /// Energy-independent yield.
    Fixed(f64),
    /// `nu(E) = sum(coeffs[i] * E^i)`.
    Polynomial { coeffs: Vec<f64> },
    /// Energy-tabulated, linearly interpolated between points.
    Tabular { energies: Vec<Energy>, nu: Vec<f64> },
}

impl NuSampler {
    pub fn nu(&self, energy: Energy) -> f64 {
        match self {
            NuSampler::Fixed(n) => *n,
            NuSampler::Polynomial { coeffs } => coeffs
                .iter()
                .rev()
                .fold(0.0, |acc, c| acc * energy + c),
            NuSampler::Tabular { energies, nu } => {
                let idx = match energies.binary_search_by(|p| p.partial_cmp(&energy).unwrap()) {
                    Ok(i) => i.min(energies.len() - 2),
                    Err(i) => i.saturating_sub(1).min(energies.len() - 2),
                };
                let (e0, e1) = (energies[idx], energies[idx + 1]);
                let factor = if e1 > e0 {
                    ((energy - e0) / (e1 - e0)).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                factor * (nu[idx + 1] - nu[idx]) + nu[idx]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_nu_ignores_energy() {
        let s = NuSampler::Fixed(2.43);
        assert_eq!(s.nu(0.0), 2.43);
        assert_eq!(s.nu(14.0), 2.43);
    }

    #[test]
    fn polynomial_evaluates_in_energy() {
        // nu(E) = 2.0 + 0.1*E
        let s = NuSampler::Polynomial {
            coeffs: vec![2.0, 0.1],
        };
        assert!((s.nu(1.0) - 2.1).abs() < 1e-12);
    }

    #[test]
    fn tabular_interpolates_linearly() {
        let s = NuSampler::Tabular {
            energies: vec![0.0, 1.0, 2.0],
            nu: vec![2.0, 2.5, 3.0],
        };
        assert!((s.nu(0.5) - 2.25).abs() < 1e-12);
    }
}
