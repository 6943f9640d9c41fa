use crate::flds::field::PhysicalField;
use crate::{Domain, Float, PI};
use anyhow::{bail, Result};
use rand::Rng;
use tracing::debug;

/// Inclusive range of integer mode numbers a random mode is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeRange {
    min: i64,
    max: i64,
}

impl ModeRange {
    pub fn new(min: i64, max: i64) -> Result<ModeRange> {
        if min > max {
            bail!("Empty mode range {}..={}", min, max);
        }
        if min <= 0 && max >= 0 {
            bail!("Mode range {}..={} contains the zero mode", min, max);
        }
        Ok(ModeRange { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    /// Every mode in range must sit strictly below n / 2 on each axis, or its
    /// spectral derivative is no longer exact.
    pub fn check_resolution(&self, domain: &Domain) -> Result<()> {
        let m = self.min.unsigned_abs().max(self.max.unsigned_abs());
        for (coord, &n) in domain.sizes().iter().enumerate() {
            if m >= (n / 2) as u64 {
                bail!(
                    "Mode {} is not resolved along axis {} with {} cells, need at least {}",
                    m,
                    coord,
                    n,
                    2 * m + 2
                );
            }
        }
        Ok(())
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.gen_range(self.min..=self.max)
    }
}

fn phase<R: Rng + ?Sized>(rng: &mut R) -> Float {
    rng.gen_range(-PI..PI)
}

fn wave_vector(domain: &Domain, m: &[i64]) -> Vec<Float> {
    m.iter()
        .zip(domain.lengths().iter())
        .map(|(&m, &l)| 2.0 * PI / l * m as Float)
        .collect()
}

/// A single divergence-free Fourier mode.
pub trait Mode: Sized {
    const NDIM: usize;

    /// Draws a mode. The order in which numbers are taken from `rng` is
    /// fixed, so a seed reproduces the same field.
    fn draw<R: Rng + ?Sized>(domain: &Domain, range: &ModeRange, rng: &mut R) -> Self;

    /// Adds the velocity of this mode at `r` (coordinate order) to `u`.
    fn add_velocity(&self, r: &[Float], u: &mut [Float]);
}

/// `u_x = k_y/|k| cos(psi_x) sin(psi_y)`, `u_y = -k_x/|k| sin(psi_x) cos(psi_y)`
/// with `psi = k r + phase`.
#[derive(Clone, Debug, PartialEq)]
pub struct Mode2 {
    m: [i64; 2],
    k: [Float; 2],
    phase: [Float; 2],
}

impl Mode2 {
    pub fn new(domain: &Domain, m: [i64; 2], phase: [Float; 2]) -> Mode2 {
        let k = wave_vector(domain, &m);
        Mode2 {
            m,
            k: [k[0], k[1]],
            phase,
        }
    }

    /// The lowest mode with no phase shift.
    pub fn taylor_green(domain: &Domain) -> Mode2 {
        Mode2::new(domain, [1, 1], [0.0, 0.0])
    }

    pub fn m(&self) -> [i64; 2] {
        self.m
    }

    pub fn phase(&self) -> [Float; 2] {
        self.phase
    }
}

impl Mode for Mode2 {
    const NDIM: usize = 2;

    fn draw<R: Rng + ?Sized>(domain: &Domain, range: &ModeRange, rng: &mut R) -> Mode2 {
        let m_x = range.sample(rng);
        let m_y = range.sample(rng);
        let phase_x = phase(rng);
        let phase_y = phase(rng);
        Mode2::new(domain, [m_x, m_y], [phase_x, phase_y])
    }

    #[inline(always)]
    fn add_velocity(&self, r: &[Float], u: &mut [Float]) {
        let [kx, ky] = self.k;
        let norm = (kx * kx + ky * ky).sqrt();
        let (sx, cx) = (kx * r[0] + self.phase[0]).sin_cos();
        let (sy, cy) = (ky * r[1] + self.phase[1]).sin_cos();
        u[0] += ky / norm * cx * sy;
        u[1] -= kx / norm * sx * cy;
    }
}

/// Three-dimensional mode with amplitudes `a_d / k_d`. The amplitudes sum to
/// zero, which is what makes the mode divergence-free.
#[derive(Clone, Debug, PartialEq)]
pub struct Mode3 {
    m: [i64; 3],
    k: [Float; 3],
    phase: [Float; 3],
    amp: [Float; 3],
}

impl Mode3 {
    pub fn new(domain: &Domain, m: [i64; 3], phase: [Float; 3], amp: [Float; 3]) -> Mode3 {
        let k = wave_vector(domain, &m);
        Mode3 {
            m,
            k: [k[0], k[1], k[2]],
            phase,
            amp,
        }
    }

    /// Amplitudes `sin(theta + 2 pi d / 3)`, d = 0, 1, 2.
    pub fn amplitudes(theta: Float) -> [Float; 3] {
        let mut amp = [0.0; 3];
        for (d, a) in amp.iter_mut().enumerate() {
            *a = (theta + 2.0 * PI * d as Float / 3.0).sin();
        }
        amp
    }

    /// `u = sin x cos y cos z`, `v = -cos x sin y cos z`, `w = 0` on a cube.
    /// On other boxes the amplitudes pick up `1 / k_d` like any other mode.
    pub fn taylor_green(domain: &Domain) -> Mode3 {
        let k = wave_vector(domain, &[1, 1, 1]);
        Mode3::new(domain, [1, 1, 1], [0.0; 3], [k[0], -k[1], 0.0])
    }

    pub fn m(&self) -> [i64; 3] {
        self.m
    }

    pub fn phase(&self) -> [Float; 3] {
        self.phase
    }
}

impl Mode for Mode3 {
    const NDIM: usize = 3;

    fn draw<R: Rng + ?Sized>(domain: &Domain, range: &ModeRange, rng: &mut R) -> Mode3 {
        let m = [range.sample(rng), range.sample(rng), range.sample(rng)];
        let phases = [phase(rng), phase(rng), phase(rng)];
        let theta = phase(rng);
        Mode3::new(domain, m, phases, Mode3::amplitudes(theta))
    }

    #[inline(always)]
    fn add_velocity(&self, r: &[Float], u: &mut [Float]) {
        let (sx, cx) = (self.k[0] * r[0] + self.phase[0]).sin_cos();
        let (sy, cy) = (self.k[1] * r[1] + self.phase[1]).sin_cos();
        let (sz, cz) = (self.k[2] * r[2] + self.phase[2]).sin_cos();
        u[0] += self.amp[0] / self.k[0] * sx * cy * cz;
        u[1] += self.amp[1] / self.k[1] * cx * sy * cz;
        u[2] += self.amp[2] / self.k[2] * cx * cy * sz;
    }
}

/// Draws `n_modes` modes after checking `range` against the grid.
pub fn draw_modes<M, R>(
    domain: &Domain,
    n_modes: usize,
    range: &ModeRange,
    rng: &mut R,
) -> Result<Vec<M>>
where
    M: Mode,
    R: Rng + ?Sized,
{
    if domain.ndim() != M::NDIM {
        bail!(
            "{}D modes can't live on a {}D domain",
            M::NDIM,
            domain.ndim()
        );
    }
    if n_modes == 0 {
        bail!("At least one mode is needed");
    }
    range.check_resolution(domain)?;
    Ok((0..n_modes).map(|_| M::draw(domain, range, rng)).collect())
}

/// Velocity of the sum of `modes`, one field per component. Modes are added
/// in order.
pub fn superpose<M: Mode>(domain: &Domain, modes: &[M]) -> Vec<PhysicalField> {
    assert_eq!(domain.ndim(), M::NDIM);
    let dim = domain.physical_dim();
    let mut u = vec![PhysicalField::zeros(dim.clone()); M::NDIM];
    let mut u_loc = vec![0.0; M::NDIM];
    for flat in 0..dim.len() {
        let r = domain.position(flat);
        for v in u_loc.iter_mut() {
            *v = 0.0;
        }
        for mode in modes {
            mode.add_velocity(&r, &mut u_loc);
        }
        for (comp, &v) in u.iter_mut().zip(u_loc.iter()) {
            comp.data[flat] = v;
        }
    }
    u
}

/// Scales all `fields` by one common factor so that the largest magnitude
/// among them becomes 1. Returns the factor; an all-zero set is left alone.
pub fn normalise_joint(fields: &mut [PhysicalField]) -> Float {
    let peak = fields.iter().map(|f| f.max_abs()).fold(0.0, Float::max);
    if peak == 0.0 {
        return 1.0;
    }
    let factor = 1.0 / peak;
    for fld in fields.iter_mut() {
        fld.scale(factor);
    }
    factor
}

/// A normalised sum of `n_modes` random modes.
pub fn random_velocity<M, R>(
    domain: &Domain,
    n_modes: usize,
    range: &ModeRange,
    rng: &mut R,
) -> Result<Vec<PhysicalField>>
where
    M: Mode,
    R: Rng + ?Sized,
{
    let modes: Vec<M> = draw_modes(domain, n_modes, range, rng)?;
    debug!(
        "superposing {} modes in {}..={}",
        modes.len(),
        range.min(),
        range.max()
    );
    let mut u = superpose(domain, &modes);
    normalise_joint(&mut u);
    Ok(u)
}
