use crate::flds::fft_nd::FftNd;
use crate::flds::field::{PhysicalField, SpectralField};
use crate::flds::random_modes::{
    normalise_joint, random_velocity, superpose, Mode2, Mode3, ModeRange,
};
use crate::flds::SpectralOps;
use crate::{Domain, Float, RandomParams, DIV_TOL, PI};
use anyhow::{bail, Result};
use itertools::Itertools;
use rand::Rng;
use rayon::prelude::*;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Width of the gaussian blob the passive scalar starts as.
const SCALAR_STD: Float = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    VortexPair,
    ShearLayer,
    Turbulence2d,
    TaylorGreen2d,
    Turbulence3d,
    TaylorGreen3d,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::VortexPair,
        Preset::ShearLayer,
        Preset::Turbulence2d,
        Preset::TaylorGreen2d,
        Preset::Turbulence3d,
        Preset::TaylorGreen3d,
    ];

    pub fn from_id(id: u32) -> Option<Preset> {
        Preset::ALL.iter().copied().find(|p| p.id() == id)
    }

    pub fn id(self) -> u32 {
        match self {
            Preset::VortexPair => 0,
            Preset::ShearLayer => 1,
            Preset::Turbulence2d => 2,
            Preset::TaylorGreen2d => 3,
            Preset::Turbulence3d => 4,
            Preset::TaylorGreen3d => 5,
        }
    }

    pub fn ndim(self) -> usize {
        match self {
            Preset::Turbulence3d | Preset::TaylorGreen3d => 3,
            _ => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::VortexPair => "coalescing vortices",
            Preset::ShearLayer => "Kelvin-Helmholtz instability",
            Preset::Turbulence2d => "decaying turbulence (2D)",
            Preset::TaylorGreen2d => "Taylor-Green vortex (2D)",
            Preset::Turbulence3d => "decaying turbulence (3D)",
            Preset::TaylorGreen3d => "Taylor-Green vortex (3D)",
        }
    }

    /// One-line hint listing the valid preset ids.
    pub fn usage() -> String {
        format!(
            "give one of [{}]",
            Preset::ALL.iter().map(|p| p.id()).join(", ")
        )
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id(), self.name())
    }
}

impl FromStr for Preset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Preset> {
        s.trim()
            .parse::<u32>()
            .ok()
            .and_then(Preset::from_id)
            .ok_or_else(|| anyhow::Error::msg(Preset::usage()))
    }
}

/// Velocity components in coordinate order plus the passive scalar, all on
/// the physical grid.
pub struct InitialFields {
    pub velocity: Vec<PhysicalField>,
    pub scalar: PhysicalField,
}

impl InitialFields {
    /// File stems the solver expects, in the order of `fields()`.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = vec!["ux", "uy", "uz"];
        names.truncate(self.velocity.len());
        names.push("sc");
        names
    }

    pub fn fields(&self) -> Vec<&PhysicalField> {
        self.velocity
            .iter()
            .chain(std::iter::once(&self.scalar))
            .collect()
    }

    /// Forward transforms of every field, tagged with its name. The fields
    /// are independent so they're transformed in parallel.
    pub fn to_spectral(&self, fft: &FftNd) -> Vec<(&'static str, SpectralField)> {
        let spectral: Vec<SpectralField> = self
            .fields()
            .par_iter()
            .map(|fld| fft.to_spectral(fld))
            .collect();
        self.names().into_iter().zip(spectral).collect()
    }
}

/// Normal distribution density with mean `mu` and standard deviation
/// `sigma`, evaluated at `s`.
#[inline(always)]
pub fn gauss(s: Float, mu: Float, sigma: Float) -> Float {
    let factor = 1.0 / (sigma * (2.0 * PI).sqrt());
    factor * (-(s - mu) * (s - mu) / (2.0 * sigma * sigma)).exp()
}

/// A gaussian blob slightly off the box centre, rescaled to [0, 1] and
/// then shifted to zero mean.
pub fn passive_scalar(domain: &Domain) -> PhysicalField {
    let lengths = domain.lengths();
    let mut sc = PhysicalField::from_fn(domain, |r| {
        r.iter()
            .zip(lengths.iter())
            .map(|(&s, &l)| gauss(s, 0.45 * l, SCALAR_STD))
            .product()
    });

    let min = sc.min();
    let max = sc.max();
    if !(max > min) {
        warn!("passive scalar is uniform, leaving it at zero");
        return PhysicalField::zeros(sc.dim().clone());
    }
    for v in sc.data.iter_mut() {
        *v = (*v - min) / (max - min);
    }
    let mean = sc.mean();
    for v in sc.data.iter_mut() {
        *v -= mean;
    }
    sc
}

fn vortex_pair(domain: &Domain, ops: &SpectralOps) -> Vec<PhysicalField> {
    let sigma = 0.3;
    let (lx, ly) = (domain.lengths()[0], domain.lengths()[1]);
    let psi = PhysicalField::from_fn(domain, |r| {
        1.0 + 3.0 * gauss(r[0], 0.4 * lx, sigma) * gauss(r[1], 0.4 * ly, sigma)
            + 3.0 * gauss(r[0], 0.6 * lx, sigma) * gauss(r[1], 0.6 * ly, sigma)
    });
    ops.streamfunction_to_velocity(&psi)
}

fn shear_layer(domain: &Domain, ops: &SpectralOps) -> Vec<PhysicalField> {
    let sigma = 0.1;
    let ly = domain.lengths()[1];
    // the sin(x) perturbation is in box units, not scaled by the length
    let psi = PhysicalField::from_fn(domain, |r| {
        let perturb = 1.0 + 0.01 * r[0].sin();
        2.0 * perturb * gauss(r[1], 0.25 * ly, sigma)
            - 2.0 * perturb * gauss(r[1], 0.75 * ly, sigma)
    });
    ops.streamfunction_to_velocity(&psi)
}

fn range_from(bounds: [i64; 2]) -> Result<ModeRange> {
    ModeRange::new(bounds[0], bounds[1])
}

/// Checks the mode count and range `preset` draws from against `domain`.
/// Needs no transforms, so `run` calls it before planning any.
pub fn check_params(preset: Preset, domain: &Domain, params: &RandomParams) -> Result<()> {
    let (n_modes, bounds) = match preset {
        Preset::Turbulence2d => (params.modes_2d, params.range_2d),
        Preset::Turbulence3d => (params.modes_3d, params.range_3d),
        Preset::TaylorGreen2d | Preset::TaylorGreen3d => (1, [1, 1]),
        Preset::VortexPair | Preset::ShearLayer => return Ok(()),
    };
    if n_modes == 0 {
        bail!("Preset {} needs at least one mode", preset);
    }
    range_from(bounds)?.check_resolution(domain)
}

/// Builds the velocity of `preset` and the passive scalar on `domain`.
pub fn initialise<R: Rng + ?Sized>(
    preset: Preset,
    domain: &Domain,
    ops: &SpectralOps,
    params: &RandomParams,
    rng: &mut R,
) -> Result<InitialFields> {
    if domain.ndim() != preset.ndim() {
        bail!(
            "Preset {} needs a {}D domain, got {}D",
            preset,
            preset.ndim(),
            domain.ndim()
        );
    }
    check_params(preset, domain, params)?;
    info!("{}", preset.name());

    let velocity = match preset {
        Preset::VortexPair => vortex_pair(domain, ops),
        Preset::ShearLayer => shear_layer(domain, ops),
        Preset::Turbulence2d => {
            let range = range_from(params.range_2d)?;
            random_velocity::<Mode2, _>(domain, params.modes_2d, &range, rng)?
        }
        Preset::TaylorGreen2d => {
            let mut u = superpose(domain, &[Mode2::taylor_green(domain)]);
            normalise_joint(&mut u);
            u
        }
        Preset::Turbulence3d => {
            let range = range_from(params.range_3d)?;
            random_velocity::<Mode3, _>(domain, params.modes_3d, &range, rng)?
        }
        Preset::TaylorGreen3d => {
            let mut u = superpose(domain, &[Mode3::taylor_green(domain)]);
            normalise_joint(&mut u);
            u
        }
    };

    Ok(InitialFields {
        velocity,
        scalar: passive_scalar(domain),
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldStats {
    pub max: Float,
    pub min: Float,
    pub sum: Float,
}

impl FieldStats {
    fn of(fld: &PhysicalField) -> FieldStats {
        FieldStats {
            max: fld.max(),
            min: fld.min(),
            sum: fld.sum(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Metrics {
    pub max_divergence: Float,
    pub divergence_scale: Float,
    pub stats: Vec<(&'static str, FieldStats)>,
}

impl Metrics {
    pub fn divergence_bound(&self) -> Float {
        DIV_TOL * self.divergence_scale.max(1.0)
    }

    /// Errors out if the velocity is not divergence-free to round-off.
    pub fn verify(&self) -> Result<()> {
        if !(self.max_divergence <= self.divergence_bound()) {
            bail!(
                "Velocity is not divergence free: max |k.u| = {:.3e} exceeds {:.3e}",
                self.max_divergence,
                self.divergence_bound()
            );
        }
        Ok(())
    }
}

/// Recomputes the spectral divergence of the velocity and collects extrema
/// and sums of every field. Everything is logged as well.
pub fn check_metrics(ops: &SpectralOps, fields: &InitialFields) -> Metrics {
    let max_divergence = ops.max_divergence(&fields.velocity);
    let divergence_scale = ops.divergence_scale(&fields.velocity);
    info!("maximum divergence: {:.1e}", max_divergence);

    let stats = fields
        .names()
        .into_iter()
        .zip(fields.fields())
        .map(|(name, fld)| {
            let s = FieldStats::of(fld);
            info!(
                "{}: (max: {:.1e}), (min: {:.1e}), (sum: {:.1e})",
                name, s.max, s.min, s.sum
            );
            (name, s)
        })
        .collect();

    Metrics {
        max_divergence,
        divergence_scale,
        stats,
    }
}
