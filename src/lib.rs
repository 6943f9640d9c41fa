use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub mod domain;
pub mod flds;
pub mod init;
pub mod save;

pub use crate::domain::Domain;
use crate::flds::SpectralOps;
use crate::init::Preset;

// We use a type alias for f64/Float to easily support
// double and single precision.
#[cfg(feature = "dprec")]
pub type Float = f64;

#[cfg(not(feature = "dprec"))]
pub type Float = f32;

pub const PI: Float = std::f64::consts::PI as Float;

/// Largest spectral divergence accepted, relative to
/// `SpectralOps::divergence_scale`.
#[cfg(feature = "dprec")]
pub const DIV_TOL: Float = 1E-10;

#[cfg(not(feature = "dprec"))]
pub const DIV_TOL: Float = 1E-4;

#[cfg(all(test, feature = "dprec"))]
pub(crate) const E_TOL: Float = 1E-10;

#[cfg(all(test, not(feature = "dprec")))]
pub(crate) const E_TOL: Float = 1E-4;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub domain_2d: DomainParams,
    pub domain_3d: DomainParams,
    pub random: RandomParams,
    pub output: Output,
}

/// Grid sizes and box lengths in coordinate order, x first.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DomainParams {
    pub sizes: Vec<usize>,
    pub lengths: Vec<Float>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RandomParams {
    pub seed: u64,
    pub modes_2d: usize,
    pub modes_3d: usize,
    pub range_2d: [i64; 2],
    pub range_3d: [i64; 2],
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Output {
    pub root: String,
    pub write_output: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            domain_2d: DomainParams {
                sizes: vec![256, 256],
                lengths: vec![2.0 * PI, 2.0 * PI],
            },
            domain_3d: DomainParams {
                sizes: vec![64, 64, 64],
                lengths: vec![2.0 * PI, 2.0 * PI, 2.0 * PI],
            },
            random: RandomParams::default(),
            output: Output::default(),
        }
    }
}

impl Default for RandomParams {
    fn default() -> RandomParams {
        RandomParams {
            seed: 0,
            modes_2d: 100,
            modes_3d: 10,
            range_2d: [4, 11],
            range_3d: [1, 3],
        }
    }
}

impl Default for Output {
    fn default() -> Output {
        Output {
            root: "output".to_string(),
            write_output: true,
        }
    }
}

impl Config {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Could not open the config file {}", path.display()))?;
        toml::from_str(&contents).with_context(|| "Could not parse Config file")
    }

    /// The box a `ndim` dimensional preset runs on.
    pub fn domain(&self, ndim: usize) -> Result<Domain> {
        let params = match ndim {
            2 => &self.domain_2d,
            3 => &self.domain_3d,
            _ => return Err(anyhow::Error::msg("Only 2D and 3D domains are supported")),
        };
        if params.sizes.len() != ndim {
            return Err(anyhow::Error::msg(format!(
                "The {}D domain is configured with {} grid sizes",
                ndim,
                params.sizes.len()
            )));
        }
        Domain::new(params.sizes.clone(), params.lengths.clone())
            .with_context(|| format!("Invalid {}D domain", ndim))
    }
}

pub fn run(cfg: &Config, preset: Preset) -> Result<()> {
    let domain = cfg.domain(preset.ndim())?;
    info!(
        "initialising {} on {:?} cells, box {:?}",
        preset.name(),
        domain.sizes(),
        domain.lengths()
    );

    init::check_params(preset, &domain, &cfg.random)?;
    let ops = SpectralOps::new(&domain);
    let mut rng = Pcg64Mcg::seed_from_u64(cfg.random.seed);
    let fields = init::initialise(preset, &domain, &ops, &cfg.random, &mut rng)?;

    let metrics = init::check_metrics(&ops, &fields);
    metrics.verify()?;

    if domain.ndim() == 2 {
        // what a plot of the flow would show
        let omega = ops.vorticity_2d(&fields.velocity[0], &fields.velocity[1], true);
        info!(
            "dealiased vorticity: (max: {:.1e}), (min: {:.1e})",
            omega.max(),
            omega.min()
        );
    }

    if cfg.output.write_output {
        let spectral = fields.to_spectral(&ops.fft);
        save::save_snapshot(Path::new(&cfg.output.root), &domain, &spectral)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn build_test_domain() -> Domain {
    // A small, non-square box used across the unit tests
    Domain::new(vec![24, 12], vec![2.0 * PI, 2.0 * PI]).unwrap()
}

#[cfg(test)]
pub(crate) fn build_test_domain_3d() -> Domain {
    Domain::new(vec![8, 6, 5], vec![2.0 * PI, PI, 3.0]).unwrap()
}
