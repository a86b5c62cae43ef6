//! Reaction channels as a closed tagged enum, dispatched by match instead of the
//! original's virtual `Reaction` hierarchy (`GenericReaction`/`Fission`/
//! `ChanceFission` in `FissionReaction.cpp`). Each isotope owns one `Reaction` per
//! MT it exposes; the isotope view samples a channel, the channel supplies
//! post-collision kinematics.

use crate::geometry::Direction;
use crate::physics::grid::Energy;
use crate::rng::Rng;

/// (n,2n), (n,3n), (n,4n) per §4.4; any other inelastic channel is tracked only as
/// its MT for reaction tallying, the kinematics being elastic-like scattering in
/// the lab frame for this analog core.
pub const MT_N2N: u32 = 16;
pub const MT_N3N: u32 = 17;
pub const MT_N4N: u32 = 37;
pub const MT_FISSION: u32 = 18;

/// One reaction channel available on an isotope.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum Reaction {
    Elastic,
    Inelastic { mt: u32 },
    /// A single composite fission cross section (MT 18 present directly).
    Fission { spectrum: FissionSpectrum },
    /// Fission synthesised from first/second/third/fourth-chance cross sections
    /// (MTs 19, 20, 21, 38), each weighted by its own σ at the collision energy.
    ChanceFission {
        chances: Vec<(u32, FissionSpectrum)>,
    },
}

impl Reaction {
    /// The MT recorded in reaction tallies for this channel.
    pub fn mt(&self) -> u32 {
        match self {
            Reaction::Elastic => 2,
            Reaction::Inelastic { mt } => *mt,
            Reaction::Fission { .. } => MT_FISSION,
            Reaction::ChanceFission { .. } => MT_FISSION,
        }
    }

    /// Samples a fission spectrum for this channel. For chance fission, first
    /// picks the chance proportional to the per-chance cross sections supplied by
    /// the caller (already evaluated at the collision energy), then samples that
    /// chance's spectrum.
    pub fn sample_fission(
        &self,
        chance_xs: &[f64],
        rng: &mut Rng,
    ) -> Option<(Energy, Direction)> {
        match self {
            Reaction::Fission { spectrum } => Some((spectrum.sample(rng), isotropic(rng))),
            Reaction::ChanceFission { chances } => {
                debug_assert_eq!(chances.len(), chance_xs.len());
                let total: f64 = chance_xs.iter().sum();
                if total <= 0.0 {
                    return chances
                        .first()
                        .map(|(_, s)| (s.sample(rng), isotropic(rng)));
                }
                let mut target = rng.uniform() * total;
                for ((_, spectrum), &xs) in chances.iter().zip(chance_xs) {
                    if target < xs {
                        return Some((spectrum.sample(rng), isotropic(rng)));
                    }
                    target -= xs;
                }
                chances
                    .last()
                    .map(|(_, s)| (s.sample(rng), isotropic(rng)))
            }
            _ => None,
        }
    }
}

/// A Watt fission spectrum, `f(E) ~ exp(-E/a) * sinh(sqrt(b*E))`, sampled by the
/// standard Cashwell-Everett rejection method. The original ACE tables carry
/// richer energy-dependent laws; a Watt spectrum is the simplest physically
/// faithful stand-in that still needs a real sampler rather than a constant.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct FissionSpectrum {
    pub a: f64,
    pub b: f64,
}

impl FissionSpectrum {
    pub fn thermal_u235() -> Self {
        FissionSpectrum { a: 0.988, b: 2.249 }
    }

    pub fn sample(&self, rng: &mut Rng) -> Energy {
        loop {
            let x = -(rng.uniform().max(f64::MIN_POSITIVE)).ln() * self.a;
            let y = -(rng.uniform().max(f64::MIN_POSITIVE)).ln();
            let cond = (y - self.b * x / 4.0).powi(2);
            if cond <= self.b * x {
                return x;
            }
        }
    }
}

/// A uniformly sampled direction on the unit sphere.
pub fn isotropic(rng: &mut Rng) -> Direction {
    let mu = 2.0 * rng.uniform() - 1.0;
    let phi = 2.0 * std::f64::consts::PI * rng.uniform();
    let sin_theta = (1.0 - mu * mu).max(0.0).sqrt();
    Direction::new(sin_theta * phi.cos(), sin_theta * phi.sin(), mu)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isotropic_direction_is_unit_length() {
        let mut rng = Rng::new(1);
        for _ in 0..100 {
            let d = isotropic(&mut rng);
            assert!((d.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn watt_spectrum_samples_are_positive_and_finite() {
        let spectrum = FissionSpectrum::thermal_u235();
        let mut rng = Rng::new(2);
        for _ in 0..1000 {
            let e = spectrum.sample(&mut rng);
            assert!(e > 0.0 && e.is_finite());
        }
    }
}
